//! Markup reader: source text to a plain element tree.
//!
//! Only well-formedness is checked here. Tag names keep their namespace
//! prefix (`q:set`); the document parser strips it when dispatching. Prefixes
//! need no `xmlns` declaration since no namespace resolution is performed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;
use weft_ir::Attributes;

use crate::ParseError;

/// One element of the source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written, prefix included.
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<Content>,
}

/// Child of an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    /// Text run with entities already resolved. Never whitespace-only.
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Tag name without its namespace prefix: `ns:set` -> `set`.
    pub fn local_name(&self) -> &str {
        logical_name(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(el) => Some(el),
            Content::Text(_) => None,
        })
    }

    /// Concatenated direct text, trimmed.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            if let Content::Text(run) = child {
                text.push_str(run);
            }
        }
        text.trim().to_string()
    }
}

/// Strip any namespace prefix from a tag name.
pub fn logical_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Read `src` into its single root element.
pub fn read(src: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(src);
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| markup_error(&reader, e))?;
        match event {
            Event::Start(start) => open.push(element(&reader, &start)?),
            Event::Empty(start) => {
                let el = element(&reader, &start)?;
                close(&reader, &mut open, &mut root, el)?;
            }
            Event::End(_) => {
                let Some(el) = open.pop() else {
                    return Err(markup_error(&reader, "unexpected closing tag"));
                };
                close(&reader, &mut open, &mut root, el)?;
            }
            Event::Text(text) => {
                let run = text.unescape().map_err(|e| markup_error(&reader, e))?;
                push_text(&reader, &mut open, &run)?;
            }
            Event::CData(data) => {
                let run = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&reader, &mut open, &run)?;
            }
            Event::Eof => break,
            // Comments, declarations, processing instructions, doctypes.
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(markup_error(
            &reader,
            format!("unclosed element <{}>", unclosed.name),
        ));
    }
    root.ok_or(ParseError::EmptyDocument)
}

fn element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| markup_error(reader, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| markup_error(reader, e))?
            .into_owned();
        el.attrs.insert(key, value);
    }
    trace!(tag = %el.name, attrs = el.attrs.len(), "read element");
    Ok(el)
}

/// Attach a finished element to its parent, or make it the root.
fn close(
    reader: &Reader<&[u8]>,
    open: &mut [Element],
    root: &mut Option<Element>,
    el: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Content::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(markup_error(
            reader,
            format!("second root element <{}>", el.name),
        ));
    }
    *root = Some(el);
    Ok(())
}

fn push_text(reader: &Reader<&[u8]>, open: &mut [Element], run: &str) -> Result<(), ParseError> {
    if run.trim().is_empty() {
        return Ok(());
    }
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Content::Text(run.to_string()));
            Ok(())
        }
        None => Err(markup_error(reader, "text outside the root element")),
    }
}

fn markup_error(reader: &Reader<&[u8]>, err: impl ToString) -> ParseError {
    ParseError::Markup {
        position: u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX),
        message: err.to_string(),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_nested() {
        let root = read(r#"<q:component name="A"><set name="x" value="1"/>hi</q:component>"#)
            .unwrap();
        assert_eq!(root.name, "q:component");
        assert_eq!(root.local_name(), "component");
        assert_eq!(root.attr("name"), Some("A"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.elements().count(), 1);
        assert_eq!(root.text(), "hi");
    }

    #[test]
    fn test_whitespace_runs_dropped_and_entities_resolved() {
        let root = read("<p>\n  <b>a &amp; b</b>\n</p>").unwrap();
        assert_eq!(root.children.len(), 1);
        let b = root.elements().next().unwrap();
        assert_eq!(b.text(), "a & b");
    }

    #[test]
    fn test_cdata_is_text() {
        let root = read("<query name=\"q\"><![CDATA[SELECT * FROM t WHERE a < 3]]></query>")
            .unwrap();
        assert_eq!(root.text(), "SELECT * FROM t WHERE a < 3");
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(
            read("<a><b></a>"),
            Err(ParseError::Markup { .. })
        ));
    }

    #[test]
    fn test_unclosed_element() {
        let err = read("<a><b>").unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_two_roots() {
        assert!(read("<a/><b/>").is_err());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(read("  <!-- nothing -->  "), Err(ParseError::EmptyDocument));
    }

    #[test]
    fn test_logical_name() {
        assert_eq!(logical_name("ns:set"), "set");
        assert_eq!(logical_name("set"), "set");
    }
}
