//! `InterpreterBuilder` for creating `Interpreter` instances.

use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Arc;

use weft_resolve::ComponentResolver;

use super::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::context::Session;
use crate::output::{stdout_output, SharedOutput};
use crate::query::QueryBackend;
use crate::registry::ExecutorRegistry;
use crate::shared::SharedRegistry;

/// Builder for [`Interpreter`].
///
/// Everything is optional. Unset pieces default to the built-in executors,
/// a fresh session, stdout output and [`DEFAULT_MAX_CALL_DEPTH`]. Without a
/// resolver, imports and component calls fail; without a query backend,
/// `<query>` fails.
#[derive(Default)]
pub struct InterpreterBuilder {
    executors: Option<SharedRegistry<ExecutorRegistry>>,
    resolver: Option<Arc<ComponentResolver>>,
    session: Option<Session>,
    output: Option<SharedOutput>,
    queries: Option<Arc<dyn QueryBackend>>,
    data_dir: Option<PathBuf>,
    max_call_depth: Option<usize>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom executor registry.
    #[must_use]
    pub fn executors(mut self, registry: ExecutorRegistry) -> Self {
        self.executors = Some(SharedRegistry::new(registry));
        self
    }

    /// Share an executor registry with other interpreters.
    #[must_use]
    pub fn shared_executors(mut self, registry: SharedRegistry<ExecutorRegistry>) -> Self {
        self.executors = Some(registry);
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Arc<ComponentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Attach an existing session instead of creating one.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub fn output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn query_backend(mut self, backend: Arc<dyn QueryBackend>) -> Self {
        self.queries = Some(backend);
        self
    }

    /// Directory that relative `<data path>` values resolve against.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            executors: self
                .executors
                .unwrap_or_else(|| SharedRegistry::new(ExecutorRegistry::with_builtins())),
            resolver: self.resolver,
            session: self.session.unwrap_or_default(),
            output: self.output.unwrap_or_else(stdout_output),
            queries: self.queries,
            data_dir: self.data_dir,
            max_call_depth: self.max_call_depth.unwrap_or(DEFAULT_MAX_CALL_DEPTH),
            call_depth: Cell::new(0),
        }
    }
}
