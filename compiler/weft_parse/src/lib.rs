//! Weft parser: markup text to a typed AST.
//!
//! Parsing happens in two passes:
//!
//! 1. [`markup::read`] checks well-formedness and builds a plain element tree
//! 2. [`DocumentParser`] dispatches each element through a [`ParserRegistry`]
//!
//! Validation runs afterwards over the finished tree and never fails the
//! parse; its findings travel alongside the root in [`ParseOutput`].

mod document;
mod error;
pub mod markup;
pub mod parsers;
mod registry;
mod validate;

pub use document::DocumentParser;
pub use error::ParseError;
pub use markup::{Content, Element};
pub use registry::{builtin_registry, ParserRegistry, TagParser};
pub use validate::{validate_tree, ValidationError};

use tracing::debug;
use weft_ir::Node;

/// A parsed document together with its validation findings.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub root: Node,
    pub errors: Vec<ValidationError>,
}

impl ParseOutput {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse with the built-in registry.
pub fn parse_document(src: &str) -> Result<ParseOutput, ParseError> {
    parse_document_with(builtin_registry(), src)
}

pub fn parse_document_with(
    registry: &ParserRegistry,
    src: &str,
) -> Result<ParseOutput, ParseError> {
    let element = markup::read(src)?;
    let root = DocumentParser::new(registry).parse_element(&element)?;
    let errors = validate_tree(&root);
    debug!(
        root = root.tag_name(),
        validation_errors = errors.len(),
        "parsed document"
    );
    Ok(ParseOutput { root, errors })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
