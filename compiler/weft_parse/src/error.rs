//! Parse errors.
//!
//! Three families, with different audiences:
//!
//! - `Markup`: the text is not a well-formed element tree
//! - `Structural`: a well-formed element carries an unusable attribute value
//!   or sits where it cannot (an `<else>` outside `<if>`)
//! - `NoParser`: nothing is registered for a tag and no generic fallback is
//!   configured. This is a build/configuration defect, not a document defect.
//!
//! Missing required attributes are not parse errors; they are reported by
//! validation after a successful parse.

/// Fatal error for the current document parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed markup at byte {position}: {message}")]
    Markup { position: u64, message: String },

    #[error("{}", structural_message(tag, attribute.as_deref(), message))]
    Structural {
        tag: String,
        attribute: Option<String>,
        message: String,
    },

    #[error("no parser for tag <{tag}>")]
    NoParser { tag: String },

    #[error("document contains no root element")]
    EmptyDocument,
}

fn structural_message(tag: &str, attribute: Option<&str>, message: &str) -> String {
    match attribute {
        Some(attr) => format!("<{tag} {attr}=...>: {message}"),
        None => format!("<{tag}>: {message}"),
    }
}

impl ParseError {
    pub fn invalid_attribute(tag: &str, attribute: &str, message: impl Into<String>) -> Self {
        ParseError::Structural {
            tag: tag.to_string(),
            attribute: Some(attribute.to_string()),
            message: message.into(),
        }
    }

    pub fn misplaced(tag: &str, message: impl Into<String>) -> Self {
        ParseError::Structural {
            tag: tag.to_string(),
            attribute: None,
            message: message.into(),
        }
    }

    /// Whether this signals an incomplete registry rather than a bad document.
    pub fn is_missing_registration(&self) -> bool {
        matches!(self, ParseError::NoParser { .. })
    }
}
