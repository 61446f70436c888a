//! Evaluation errors.
//!
//! `EvalErrorKind` is the structured category callers match on. Factory
//! functions (`undefined_variable()`, `division_by_zero()`, ...) are the
//! construction API; they fill in both the kind and the rendered message.

use std::path::PathBuf;

use weft_ir::NodeKind;

/// Result of evaluation.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("no executor for node kind `{kind}`")]
    NoExecutor { kind: NodeKind },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("loop step must not be zero")]
    ZeroStep,

    #[error("maximum call depth exceeded (limit: {limit})")]
    CallDepthExceeded { limit: usize },

    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("{function} is missing required argument `{param}`")]
    MissingArgument { function: String, param: String },

    #[error("component `{name}` not found")]
    ComponentNotFound { name: String, attempted: Vec<PathBuf> },

    #[error("component `{name}`: {message}")]
    Component { name: String, message: String },

    #[error("query `{name}` failed: {message}")]
    Query { name: String, message: String },

    #[error("data `{name}`: {message}")]
    Data { name: String, message: String },

    #[error("invalid expression `{source_text}`: {message}")]
    Expression { source_text: String, message: String },
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()`.
    pub message: String,
    /// Components the error propagated out of, innermost first.
    pub components: Vec<String>,
}

impl EvalError {
    #[cold]
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            components: Vec::new(),
        }
    }

    /// Record that this error left component `name`.
    #[must_use]
    pub fn in_component(mut self, name: &str) -> Self {
        self.components.push(name.to_string());
        self
    }

    /// Rendered message followed by the component trail.
    pub fn display_with_trail(&self) -> String {
        if self.components.is_empty() {
            return self.message.clone();
        }
        format!("{} (in {})", self.message, self.components.join(" <- "))
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

// Factories

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn no_executor(kind: NodeKind) -> EvalError {
    EvalErrorKind::NoExecutor { kind }.into()
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    }
    .into()
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    }
    .into()
}

#[cold]
pub fn zero_step() -> EvalError {
    EvalErrorKind::ZeroStep.into()
}

#[cold]
pub fn call_depth_exceeded(limit: usize) -> EvalError {
    EvalErrorKind::CallDepthExceeded { limit }.into()
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn missing_argument(function: &str, param: &str) -> EvalError {
    EvalErrorKind::MissingArgument {
        function: function.to_string(),
        param: param.to_string(),
    }
    .into()
}

#[cold]
pub fn component_error(name: &str, message: impl Into<String>) -> EvalError {
    EvalErrorKind::Component {
        name: name.to_string(),
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn query_error(name: &str, message: impl Into<String>) -> EvalError {
    EvalErrorKind::Query {
        name: name.to_string(),
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn data_error(name: &str, message: impl Into<String>) -> EvalError {
    EvalErrorKind::Data {
        name: name.to_string(),
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn expression_error(source_text: &str, message: impl Into<String>) -> EvalError {
    EvalErrorKind::Expression {
        source_text: source_text.to_string(),
        message: message.into(),
    }
    .into()
}

impl From<weft_resolve::ResolveError> for EvalError {
    fn from(err: weft_resolve::ResolveError) -> Self {
        match err {
            weft_resolve::ResolveError::NotFound {
                name, attempted, ..
            } => EvalErrorKind::ComponentNotFound { name, attempted }.into(),
            weft_resolve::ResolveError::Parse { name, source, .. } => {
                component_error(&name, source.to_string())
            }
            weft_resolve::ResolveError::Io { path, source } => {
                component_error(&path.display().to_string(), source.to_string())
            }
        }
    }
}
