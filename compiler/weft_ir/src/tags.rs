//! Tag descriptor table.
//!
//! Every built-in tag has a descriptor naming the attributes it requires and
//! the ones it understands. The table is consulted by `Node::validate()`;
//! missing required attributes are validation errors, never parse failures.

/// Attribute contract of one logical tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagDescriptor {
    pub tag: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl TagDescriptor {
    /// Whether `attr` is part of this tag's contract.
    pub fn knows(&self, attr: &str) -> bool {
        self.required.contains(&attr) || self.optional.contains(&attr)
    }

    /// Validation messages for every required attribute `present` rejects.
    pub fn missing_required(&self, present: impl Fn(&str) -> bool) -> Vec<String> {
        self.required
            .iter()
            .filter(|attr| !present(attr))
            .map(|attr| format!("<{}> is missing required attribute `{attr}`", self.tag))
            .collect()
    }
}

const fn tag(
    tag: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
) -> TagDescriptor {
    TagDescriptor {
        tag,
        required,
        optional,
    }
}

static DESCRIPTORS: &[TagDescriptor] = &[
    tag("application", &["id"], &["type"]),
    tag("component", &["name"], &["description"]),
    tag("job", &["name"], &["schedule"]),
    tag("param", &["name"], &["type", "default", "required", "value"]),
    tag("set", &["name"], &["value", "scope", "type", "operation"]),
    tag("if", &["condition"], &["test"]),
    tag("elseif", &["condition"], &["test"]),
    tag("else", &[], &[]),
    tag(
        "loop",
        &["var"],
        &["type", "from", "to", "step", "items", "delimiter", "index"],
    ),
    tag("function", &["name"], &["returns"]),
    tag("call", &["function"], &["result"]),
    tag("return", &[], &["value"]),
    tag("import", &["component"], &["from", "as"]),
    tag("slot", &[], &["name"]),
    tag("query", &["name"], &["datasource", "source"]),
    tag("data", &["name"], &["source", "path"]),
    tag("log", &["message"], &["level"]),
];

/// Descriptor for a logical (prefix-stripped) tag name.
pub fn descriptor(tag: &str) -> Option<&'static TagDescriptor> {
    DESCRIPTORS.iter().find(|d| d.tag == tag)
}

/// All descriptors, in table order.
pub fn descriptors() -> &'static [TagDescriptor] {
    DESCRIPTORS
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup() {
        let set = descriptor("set").unwrap();
        assert_eq!(set.required, &["name"]);
        assert!(set.knows("scope"));
        assert!(!set.knows("colour"));
        assert!(descriptor("blink").is_none());
    }

    #[test]
    fn test_missing_required() {
        let loop_tag = descriptor("loop").unwrap();
        let errors = loop_tag.missing_required(|_| false);
        assert_eq!(errors, vec!["<loop> is missing required attribute `var`"]);
        assert!(loop_tag.missing_required(|_| true).is_empty());
    }

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<_> = descriptors().iter().map(|d| d.tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), descriptors().len());
    }
}
