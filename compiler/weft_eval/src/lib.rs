//! Weft interpreter: walks a parsed document against a scoped context.
//!
//! # Architecture
//!
//! - [`Interpreter`]: holds long-lived collaborators and dispatches nodes
//! - [`ExecutorRegistry`]: node kind -> [`NodeExecutor`], plus one fallback
//! - [`ExecutionContext`]: local/function/component/session scope frames
//! - [`expr`]: `{expr}` databinding in text and attribute values
//! - [`OutputSink`]: where text, elements and log lines go
//! - [`QueryBackend`]: blocking seam for `<query>` nodes
//!
//! # Usage
//!
//! ```text
//! let interp = Interpreter::builder()
//!     .resolver(Arc::new(ComponentResolver::new(ResolverConfig::from_env())))
//!     .output(buffer_output())
//!     .build();
//! let value = interp.execute(&parsed.root)?;
//! ```

pub mod context;
mod errors;
pub mod exec;
pub mod expr;
mod interpreter;
pub mod output;
pub mod query;
mod registry;
mod shared;
mod value;

pub use context::{ContextError, ExecutionContext, ImportBinding, Session, SlotFill, Vars};
pub use errors::{
    call_depth_exceeded, component_error, data_error, division_by_zero, expression_error,
    integer_overflow, missing_argument, no_executor, query_error, type_mismatch,
    undefined_function, undefined_variable, zero_step, EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{
    bind_param, coerce_named, CallGuard, Flow, Interpreter, InterpreterBuilder,
    DEFAULT_MAX_CALL_DEPTH,
};
pub use output::{buffer_output, silent_output, stdout_output, OutputSink, SharedOutput};
pub use query::{MemoryBackend, QueryBackend, QueryError, QueryRequest, RecordedQuery};
pub use registry::{ExecutorRegistry, NodeExecutor};
pub use shared::{SharedRegistry, SharedState};
pub use value::{Number, Value};
