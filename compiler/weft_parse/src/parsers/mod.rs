//! Built-in tag parsers.
//!
//! Parsers read attributes leniently: a missing required attribute is stored
//! as an empty string (or `None`) and left for validation to report. Only
//! values that cannot be represented at all (an unknown scope name, a
//! non-integer loop bound) fail the parse.

mod decl;
mod markup;
mod stmt;

pub use decl::{
    ApplicationParser, ComponentParser, FunctionParser, ImportParser, JobParser, ParamParser,
};
pub use markup::{GenericElementParser, SlotParser};
pub use stmt::{
    BranchParser, CallParser, DataParser, IfParser, LogParser, LoopParser, QueryParser,
    ReturnParser, SetParser,
};

use crate::markup::Element;
use crate::{ParseError, ParserRegistry};

/// Register every built-in tag and the generic fallback.
pub fn register_builtins(registry: &mut ParserRegistry) {
    // Declarations
    registry.register("application", ApplicationParser);
    registry.register("component", ComponentParser);
    registry.register("job", JobParser);
    registry.register("param", ParamParser);
    registry.register("function", FunctionParser);
    registry.register("import", ImportParser);

    // Statements
    registry.register("set", SetParser);
    registry.register("if", IfParser);
    registry.register("elseif", BranchParser);
    registry.register("else", BranchParser);
    registry.register("loop", LoopParser);
    registry.register("call", CallParser);
    registry.register("return", ReturnParser);
    registry.register("query", QueryParser);
    registry.register("data", DataParser);
    registry.register("log", LogParser);

    // Output
    registry.register("slot", SlotParser);
    registry.set_generic(GenericElementParser);
}

/// Attribute value, or empty when absent (validation reports it).
fn required(el: &Element, attr: &str) -> String {
    el.attr(attr).unwrap_or_default().to_string()
}

fn optional(el: &Element, attr: &str) -> Option<String> {
    el.attr(attr).map(str::to_string)
}

/// Parse an enumerated attribute through `from_name`.
fn keyword<T>(
    el: &Element,
    attr: &str,
    from_name: fn(&str) -> Option<T>,
    expected: &str,
) -> Result<Option<T>, ParseError> {
    let Some(raw) = el.attr(attr) else {
        return Ok(None);
    };
    from_name(raw.trim()).map(Some).ok_or_else(|| {
        ParseError::invalid_attribute(
            el.local_name(),
            attr,
            format!("`{raw}` is not one of {expected}"),
        )
    })
}

fn boolean(el: &Element, attr: &str) -> Result<Option<bool>, ParseError> {
    keyword(
        el,
        attr,
        |raw| match raw {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        "true, false",
    )
}

/// An attribute that must be an integer literal or a `{...}` binding.
fn integer(el: &Element, attr: &str) -> Result<Option<String>, ParseError> {
    let Some(raw) = el.attr(attr) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.contains('{') || trimmed.parse::<i64>().is_ok() {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(ParseError::invalid_attribute(
            el.local_name(),
            attr,
            format!("`{raw}` is not an integer"),
        ))
    }
}
