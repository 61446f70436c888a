//! Document parser: recursive descent over the element tree.

use tracing::trace;
use weft_ir::{ComponentCallNode, Node, TextNode};
use weft_stack::ensure_sufficient_stack;

use crate::markup::{Content, Element};
use crate::{ParseError, ParserRegistry};

/// Walks an element tree, dispatching each element through a registry.
#[derive(Clone, Copy, Debug)]
pub struct DocumentParser<'r> {
    registry: &'r ParserRegistry,
}

impl<'r> DocumentParser<'r> {
    pub fn new(registry: &'r ParserRegistry) -> Self {
        DocumentParser { registry }
    }

    pub fn registry(&self) -> &'r ParserRegistry {
        self.registry
    }

    /// Parse one element. Dispatch order, first match wins:
    ///
    /// 1. a parser registered for the prefix-stripped tag name
    /// 2. an uppercase-initial tag becomes a component call
    /// 3. the generic-element fallback
    /// 4. otherwise `ParseError::NoParser`
    pub fn parse_element(&self, element: &Element) -> Result<Node, ParseError> {
        ensure_sufficient_stack(|| self.dispatch(element))
    }

    fn dispatch(&self, element: &Element) -> Result<Node, ParseError> {
        let tag = element.local_name();
        if let Some(parser) = self.registry.get(tag) {
            trace!(tag, "registered parser");
            return parser.parse(element, self);
        }
        if tag.chars().next().is_some_and(char::is_uppercase) {
            trace!(tag, "component call");
            return self.component_call(element);
        }
        if let Some(generic) = self.registry.generic() {
            trace!(tag, "generic element");
            return generic.parse(element, self);
        }
        Err(ParseError::NoParser {
            tag: tag.to_string(),
        })
    }

    fn component_call(&self, element: &Element) -> Result<Node, ParseError> {
        Ok(Node::ComponentCall(ComponentCallNode {
            component_name: element.local_name().to_string(),
            props: element.attrs.clone(),
            children: self.parse_children(element)?,
        }))
    }

    /// Parse all children of `element` in order.
    pub fn parse_children(&self, element: &Element) -> Result<Vec<Node>, ParseError> {
        self.parse_content(&element.children)
    }

    /// Parse a run of mixed content. Text becomes literal or databound text.
    pub fn parse_content(&self, content: &[Content]) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::with_capacity(content.len());
        for item in content {
            match item {
                Content::Element(el) => nodes.push(self.parse_element(el)?),
                Content::Text(text) => nodes.push(Node::Text(TextNode::new(text.as_str()))),
            }
        }
        Ok(nodes)
    }
}
