//! Output-side nodes: component calls, slots, generic elements, text.

use serde_json::Value as Json;

use super::record::Record;
use super::Node;
use crate::Attributes;

/// Invocation of another component, inferred from an uppercase tag.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentCallNode {
    pub component_name: String,
    /// The element's attributes verbatim; values are not converted.
    pub props: Attributes,
    /// Slot content handed to the callee.
    pub children: Vec<Node>,
}

impl ComponentCallNode {
    pub(super) fn check(&self, errors: &mut Vec<String>) {
        if self.component_name.contains(['/', '\\']) {
            errors.push(format!(
                "<{}> is not a valid component name",
                self.component_name
            ));
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("component_call")
            .field("component_name", self.component_name.as_str())
            .attrs("props", &self.props)
            .children(&self.children)
    }
}

/// Placeholder filled by the caller's content; its own children are the fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotNode {
    pub name: Option<String>,
    pub children: Vec<Node>,
}

impl SlotNode {
    pub(super) fn to_dict(&self) -> Json {
        Record::new("slot")
            .opt("name", self.name.as_deref())
            .children(&self.children)
    }
}

/// Unregistered lowercase tag, passed through to output as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl ElementNode {
    pub(super) fn to_dict(&self) -> Json {
        Record::new("element")
            .field("tag", self.tag.as_str())
            .attrs("attrs", &self.attrs)
            .children(&self.children)
    }
}

/// A text run. `databound` when it contains a `{...}` expression.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub content: String,
    pub databound: bool,
}

impl TextNode {
    /// Classify a text run by whether it embeds a binding.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let databound = has_binding(&content);
        TextNode { content, databound }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("text")
            .field("content", self.content.as_str())
            .field("databound", self.databound)
            .finish()
    }
}

/// Whether `text` contains a `{` followed later by a `}`.
pub(crate) fn has_binding(text: &str) -> bool {
    text.find('{')
        .is_some_and(|open| text[open + 1..].contains('}'))
}
