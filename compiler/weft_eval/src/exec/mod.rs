//! Built-in node executors.
//!
//! - `decl`: application, component, job, param, function, import
//! - `control`: set, if, loop, call, return
//! - `markup`: component calls, slots, generic elements, text
//! - `io`: query, data, log
//!
//! Each executor is a plain function registered through the blanket
//! [`NodeExecutor`](crate::NodeExecutor) impl for closures.

mod control;
mod decl;
mod io;
mod markup;

use weft_ir::{Node, NodeKind};

use crate::errors::{type_mismatch, EvalError};
use crate::registry::ExecutorRegistry;

pub use markup::render_element;

/// Register every built-in executor, with the element renderer as fallback.
pub fn register_builtins(registry: &mut ExecutorRegistry) {
    registry.register(NodeKind::Application, decl::exec_application);
    registry.register(NodeKind::Component, decl::exec_component);
    registry.register(NodeKind::Job, decl::exec_job);
    registry.register(NodeKind::Param, decl::exec_param);
    registry.register(NodeKind::Function, decl::exec_function);
    registry.register(NodeKind::Import, decl::exec_import);

    registry.register(NodeKind::Set, control::exec_set);
    registry.register(NodeKind::If, control::exec_if);
    registry.register(NodeKind::Loop, control::exec_loop);
    registry.register(NodeKind::Call, control::exec_call);
    registry.register(NodeKind::Return, control::exec_return);

    registry.register(NodeKind::ComponentCall, markup::exec_component_call);
    registry.register(NodeKind::Slot, markup::exec_slot);
    registry.register(NodeKind::Text, markup::exec_text);

    registry.register(NodeKind::Query, io::exec_query);
    registry.register(NodeKind::Data, io::exec_data);
    registry.register(NodeKind::Log, io::exec_log);

    registry.set_fallback(render_element);
}

/// An executor was handed a node of another kind.
#[cold]
fn wrong_node(expected: NodeKind, node: &Node) -> EvalError {
    type_mismatch(
        &format!("`{expected}` node"),
        &format!("`{}` node", node.kind()),
    )
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
