//! Declarations: application, component, job, param, function, import.

use tracing::debug;
use weft_ir::{Node, NodeKind, VarScope};

use super::wrong_node;
use crate::context::{ExecutionContext, ImportBinding};
use crate::errors::{component_error, EvalResult};
use crate::interpreter::{bind_param, Flow, Interpreter};
use crate::Value;

/// Run every child in order. Each component gets its own root frame on the
/// shared session; the first component's result is the application's.
pub(super) fn exec_application(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Application(app) = node else {
        return Err(wrong_node(NodeKind::Application, node));
    };
    let mut result: Option<Value> = None;
    for child in &app.children {
        match child {
            Node::Component(component) => {
                let value = interp.run_component(component, &ctx.new_root())?;
                result.get_or_insert(value);
            }
            other => {
                interp.exec_node(other, ctx)?;
            }
        }
    }
    Ok(Flow::Normal(result.unwrap_or_default()))
}

pub(super) fn exec_component(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Component(component) = node else {
        return Err(wrong_node(NodeKind::Component, node));
    };
    interp.run_component(component, ctx).map(Flow::Normal)
}

pub(super) fn exec_job(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Job(job) = node else {
        return Err(wrong_node(NodeKind::Job, node));
    };
    debug!(job = %job.name, schedule = job.schedule.as_deref(), "running job");
    let value = interp.exec_scoped(&job.children, ctx)?.into_value();
    Ok(Flow::Normal(value))
}

/// A parameter outside a component body binds into component scope.
pub(super) fn exec_param(
    node: &Node,
    ctx: &ExecutionContext,
    _interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Param(param) = node else {
        return Err(wrong_node(NodeKind::Param, node));
    };
    bind_param(param, "component", VarScope::Component, None, ctx)?;
    Ok(Flow::unit())
}

pub(super) fn exec_function(
    node: &Node,
    ctx: &ExecutionContext,
    _interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Function(function) = node else {
        return Err(wrong_node(NodeKind::Function, node));
    };
    ctx.define_function(function.clone());
    Ok(Flow::unit())
}

/// Resolve the imported component now so a missing file fails at the
/// import, then record the alias on the root frame.
pub(super) fn exec_import(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Import(import) = node else {
        return Err(wrong_node(NodeKind::Import, node));
    };
    let resolver = interp
        .resolver()
        .ok_or_else(|| component_error(&import.component, "no component resolver configured"))?;
    resolver.resolve(&import.component, import.from.as_deref())?;
    ctx.define_import(
        import.local_name(),
        ImportBinding {
            component: import.component.clone(),
            from: import.from.clone(),
        },
    );
    Ok(Flow::unit())
}
