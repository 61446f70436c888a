//! Parsers for output-side tags.

use weft_ir::{ElementNode, Node, SlotNode};

use super::optional;
use crate::markup::Element;
use crate::{DocumentParser, ParseError, TagParser};

pub struct SlotParser;

impl TagParser for SlotParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Slot(SlotNode {
            name: optional(el, "name"),
            children: parser.parse_children(el)?,
        }))
    }
}

/// Fallback for unregistered lowercase tags: pass the element through.
pub struct GenericElementParser;

impl TagParser for GenericElementParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Element(ElementNode {
            tag: el.local_name().to_string(),
            attrs: el.attrs.clone(),
            children: parser.parse_children(el)?,
        }))
    }
}
