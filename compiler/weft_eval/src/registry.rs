//! Executor registry: node kind -> executor.
//!
//! Lookups try the exact kind first, then the fallback. New constructs are
//! added by registering an executor; the interpreter never matches on node
//! kinds itself.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::warn;
use weft_ir::{Node, NodeKind};

use crate::context::ExecutionContext;
use crate::errors::EvalResult;
use crate::interpreter::{Flow, Interpreter};

/// Executes one kind of node.
pub trait NodeExecutor: Send + Sync {
    fn execute(&self, node: &Node, ctx: &ExecutionContext, interp: &Interpreter)
        -> EvalResult<Flow>;
}

impl<F> NodeExecutor for F
where
    F: Fn(&Node, &ExecutionContext, &Interpreter) -> EvalResult<Flow> + Send + Sync,
{
    fn execute(
        &self,
        node: &Node,
        ctx: &ExecutionContext,
        interp: &Interpreter,
    ) -> EvalResult<Flow> {
        self(node, ctx, interp)
    }
}

#[derive(Default)]
pub struct ExecutorRegistry {
    executors: FxHashMap<NodeKind, Box<dyn NodeExecutor>>,
    fallback: Option<Box<dyn NodeExecutor>>,
}

impl ExecutorRegistry {
    /// An empty registry. Every dispatch fails until executors are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in executors and the element renderer as
    /// fallback.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::exec::register_builtins(&mut registry);
        registry
    }

    /// Register `executor` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: NodeKind, executor: impl NodeExecutor + 'static) {
        if self.executors.insert(kind, Box::new(executor)).is_some() {
            warn!(%kind, "replacing registered executor");
        }
    }

    pub fn unregister(&mut self, kind: NodeKind) -> bool {
        self.executors.remove(&kind).is_some()
    }

    pub fn set_fallback(&mut self, executor: impl NodeExecutor + 'static) {
        self.fallback = Some(Box::new(executor));
    }

    pub fn clear_fallback(&mut self) {
        self.fallback = None;
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Exact registration only.
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.executors.contains_key(&kind)
    }

    /// The executor for `kind`: the exact registration, else the fallback.
    pub fn get(&self, kind: NodeKind) -> Option<&dyn NodeExecutor> {
        self.executors
            .get(&kind)
            .or(self.fallback.as_ref())
            .map(|executor| &**executor)
    }

    /// Registered kinds, in declaration order.
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds: Vec<_> = self.executors.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("kinds", &self.kinds())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
