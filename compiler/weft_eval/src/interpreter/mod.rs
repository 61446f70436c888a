//! The tree-walking interpreter.
//!
//! `Interpreter` owns everything that outlives one node: the executor
//! registry, the component resolver, the session, the output sink and the
//! query backend. Per-node state lives in the [`ExecutionContext`] passed
//! alongside each call.
//!
//! # Control flow
//!
//! Every executor returns a [`Flow`]. `Flow::Return` unwinds through nested
//! blocks (if/loop bodies, elements) until a function, job or component
//! boundary turns it back into a plain value.

mod builder;
mod call_guard;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;
use weft_ir::{ComponentNode, Node, ParamNode, ValueType, VarScope};
use weft_resolve::ComponentResolver;
use weft_stack::ensure_sufficient_stack;

pub use builder::InterpreterBuilder;
pub use call_guard::CallGuard;

use crate::context::{ExecutionContext, Session};
use crate::errors::{missing_argument, no_executor, type_mismatch, EvalResult};
use crate::expr::evaluate_value;
use crate::output::SharedOutput;
use crate::query::QueryBackend;
use crate::registry::ExecutorRegistry;
use crate::shared::SharedRegistry;
use crate::Value;

/// Default bound on nested component and function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Outcome of executing one node.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Keep going with the next sibling.
    Normal(Value),
    /// A `<return>` is unwinding to the nearest boundary.
    Return(Value),
}

impl Flow {
    pub fn unit() -> Self {
        Flow::Normal(Value::Null)
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Flow::Return(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            Flow::Normal(v) | Flow::Return(v) => v,
        }
    }
}

pub struct Interpreter {
    executors: SharedRegistry<ExecutorRegistry>,
    resolver: Option<Arc<ComponentResolver>>,
    session: Session,
    output: SharedOutput,
    queries: Option<Arc<dyn QueryBackend>>,
    data_dir: Option<PathBuf>,
    max_call_depth: usize,
    call_depth: Cell<usize>,
}

impl Interpreter {
    /// Built-in executors, stdout output, no resolver and no query backend.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Execute `node` in a fresh root context attached to this interpreter's
    /// session.
    pub fn execute(&self, node: &Node) -> EvalResult<Value> {
        self.execute_in(node, &ExecutionContext::with_session(self.session.clone()))
    }

    /// Execute `node` against an existing context.
    pub fn execute_in(&self, node: &Node, ctx: &ExecutionContext) -> EvalResult<Value> {
        self.exec_node(node, ctx).map(Flow::into_value)
    }

    /// Dispatch one node through the registry.
    pub fn exec_node(&self, node: &Node, ctx: &ExecutionContext) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| {
            let kind = node.kind();
            trace!(%kind, tag = node.tag_name(), "exec");
            let executor = self.executors.get(kind).ok_or_else(|| no_executor(kind))?;
            executor.execute(node, ctx, self)
        })
    }

    /// Execute `nodes` in order. Stops at the first `Return`.
    pub fn exec_block(&self, nodes: &[Node], ctx: &ExecutionContext) -> EvalResult<Flow> {
        for node in nodes {
            let flow = self.exec_node(node, ctx)?;
            if flow.is_return() {
                return Ok(flow);
            }
        }
        Ok(Flow::unit())
    }

    /// `exec_block` in a fresh child frame of `ctx`.
    pub fn exec_scoped(&self, nodes: &[Node], ctx: &ExecutionContext) -> EvalResult<Flow> {
        self.exec_block(nodes, &ctx.child())
    }

    /// Run a component body against `ctx`, which should be the component's
    /// root frame with props already in component scope.
    ///
    /// Parameters are bound first, then the remaining children run in order.
    /// Errors leaving the component record its name.
    pub fn run_component(
        &self,
        component: &ComponentNode,
        ctx: &ExecutionContext,
    ) -> EvalResult<Value> {
        let run = || -> EvalResult<Value> {
            for param in component.params() {
                bind_param(param, &component.name, VarScope::Component, None, ctx)?;
            }
            let body: Vec<&Node> = component
                .children
                .iter()
                .filter(|n| !matches!(n, Node::Param(_)))
                .collect();
            for node in body {
                if let Flow::Return(value) = self.exec_node(node, ctx)? {
                    return Ok(value);
                }
            }
            Ok(Value::Null)
        };
        run().map_err(|err| err.in_component(&component.name))
    }

    /// Track one level of call nesting until the guard drops.
    pub fn enter_call(&self) -> EvalResult<CallGuard<'_>> {
        CallGuard::enter(&self.call_depth, self.max_call_depth)
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth.get()
    }

    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    pub fn executors(&self) -> &ExecutorRegistry {
        &self.executors
    }

    pub fn resolver(&self) -> Option<&ComponentResolver> {
        self.resolver.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    pub fn query_backend(&self) -> Option<&dyn QueryBackend> {
        self.queries.as_deref()
    }

    /// Base directory for relative `<data path>` files.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("executors", &*self.executors)
            .field("resolver", &self.resolver.is_some())
            .field("queries", &self.queries.is_some())
            .field("max_call_depth", &self.max_call_depth)
            .finish_non_exhaustive()
    }
}

/// Bind one declared parameter into `scope`.
///
/// `supplied` is the caller's value; when absent, a value already in `scope`
/// counts as supplied (component props arrive that way). Otherwise the
/// default is evaluated, and a missing required parameter is an error.
pub fn bind_param(
    param: &ParamNode,
    owner: &str,
    scope: VarScope,
    supplied: Option<Value>,
    ctx: &ExecutionContext,
) -> EvalResult<()> {
    let value = match supplied.or_else(|| ctx.get_in(scope, &param.name)) {
        Some(value) => value,
        None => match param.default.as_deref() {
            Some(default) => evaluate_value(default, ctx)?,
            None if param.required => return Err(missing_argument(owner, &param.name)),
            None => Value::Null,
        },
    };
    let value = match param.ty.as_deref() {
        Some(name) => coerce_named(value, name)?,
        None => value,
    };
    ctx.set(scope, param.name.clone(), value);
    Ok(())
}

/// Coerce `value` to the type spelled `name`. `Null` passes through.
pub fn coerce_named(value: Value, name: &str) -> EvalResult<Value> {
    if value == Value::Null {
        return Ok(value);
    }
    let ty = ValueType::from_name(name).ok_or_else(|| type_mismatch("a known type name", name))?;
    value.coerce(ty)
}
