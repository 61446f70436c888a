//! Parser registry: logical tag name to the parser responsible for it.
//!
//! New constructs are added by registration, never by editing the
//! dispatcher. The registry also holds the single generic-element fallback
//! used for unregistered lowercase tags.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use weft_ir::Node;

use crate::document::DocumentParser;
use crate::markup::Element;
use crate::{parsers, ParseError};

/// Turns one element into a node.
///
/// Receives the document parser so implementations can recurse into their
/// children through the same registry.
pub trait TagParser: Send + Sync {
    fn parse(&self, element: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError>;
}

impl<F> TagParser for F
where
    F: Fn(&Element, &DocumentParser<'_>) -> Result<Node, ParseError> + Send + Sync,
{
    fn parse(&self, element: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        self(element, parser)
    }
}

/// Global registry with every built-in tag and the generic fallback.
static BUILTIN_REGISTRY: OnceLock<ParserRegistry> = OnceLock::new();

/// Name-keyed parser table plus optional generic fallback.
pub struct ParserRegistry {
    parsers: FxHashMap<String, Box<dyn TagParser>>,
    generic: Option<Box<dyn TagParser>>,
}

impl ParserRegistry {
    /// Create an empty registry with no fallback.
    pub fn new() -> Self {
        ParserRegistry {
            parsers: FxHashMap::default(),
            generic: None,
        }
    }

    /// Create a registry with every built-in tag and the generic fallback.
    pub fn with_builtins() -> Self {
        let mut registry = ParserRegistry::new();
        parsers::register_builtins(&mut registry);
        registry
    }

    /// Register a parser for a logical tag name.
    ///
    /// The last registration for a tag wins; replacing one logs a warning.
    pub fn register(&mut self, tag: impl Into<String>, parser: impl TagParser + 'static) {
        let tag = tag.into();
        if self.parsers.insert(tag.clone(), Box::new(parser)).is_some() {
            warn!(tag = %tag, "replacing previously registered parser");
        } else {
            debug!(tag = %tag, "registered parser");
        }
    }

    /// Install the generic-element fallback, replacing any previous one.
    pub fn set_generic(&mut self, parser: impl TagParser + 'static) {
        self.generic = Some(Box::new(parser));
    }

    /// Remove the generic fallback; unregistered lowercase tags then fail.
    pub fn clear_generic(&mut self) {
        self.generic = None;
    }

    /// Parser registered for a logical tag name.
    pub fn get(&self, tag: &str) -> Option<&dyn TagParser> {
        self.parsers.get(tag).map(|p| p.as_ref())
    }

    pub fn generic(&self) -> Option<&dyn TagParser> {
        self.generic.as_deref()
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.parsers.contains_key(tag)
    }

    /// Registered tag names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("tags", &self.tags())
            .field("generic", &self.generic.is_some())
            .finish()
    }
}

/// The shared built-in registry.
pub fn builtin_registry() -> &'static ParserRegistry {
    BUILTIN_REGISTRY.get_or_init(ParserRegistry::with_builtins)
}
