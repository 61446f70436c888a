//! Whole-tree validation.

use std::fmt;

use weft_ir::{visitor, Node};

/// One non-fatal problem found in a parsed tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// Tag name of the offending node.
    pub tag: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>: {}", self.tag, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Run `Node::validate` on every node, in document order.
pub fn validate_tree(root: &Node) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    visitor::walk(root, |node| {
        for message in node.validate() {
            errors.push(ValidationError {
                tag: node.tag_name().to_string(),
                message,
            });
        }
    });
    errors
}
