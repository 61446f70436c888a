//! Markup: component calls, slots, generic elements and text.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::debug;
use weft_ir::{ElementNode, Node, NodeKind, VarScope};

use super::wrong_node;
use crate::context::{ExecutionContext, SlotFill};
use crate::errors::{component_error, EvalResult};
use crate::expr::{evaluate_value, interpolate_markup};
use crate::interpreter::{Flow, Interpreter};

/// Attribute on a call's child naming the slot it fills.
const SLOT_ATTR: &str = "slot";

/// Call another component.
///
/// The name is looked up among this component's imports first. The callee
/// runs on a new root frame that shares the caller's session; props become
/// component-scope variables and the call's children become slot content.
pub(super) fn exec_component_call(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::ComponentCall(call) = node else {
        return Err(wrong_node(NodeKind::ComponentCall, node));
    };
    let (target, from) = match ctx.import(&call.component_name) {
        Some(binding) => (binding.component, binding.from),
        None => (call.component_name.clone(), None),
    };
    let resolver = interp
        .resolver()
        .ok_or_else(|| component_error(&target, "no component resolver configured"))?;
    let metadata = resolver.resolve(&target, from.as_deref())?;

    let _guard = interp.enter_call()?;
    debug!(
        component = %target,
        path = %metadata.path.display(),
        depth = interp.call_depth(),
        "calling component"
    );

    let callee = ctx.new_root();
    for (name, text) in call.props.iter() {
        callee.set(VarScope::Component, name, evaluate_value(text, ctx)?);
    }
    for (name, nodes) in partition_slots(&call.children) {
        callee.set_slot(
            name,
            SlotFill {
                nodes: Rc::new(nodes),
                scope: ctx.clone(),
            },
        );
    }

    interp.run_component(&metadata.ast, &callee).map(Flow::Normal)
}

/// Group a call's children by target slot. Unmarked children fill the
/// default slot `""`; a `<slot name>` child or an element carrying a `slot`
/// attribute fills the named one.
pub(super) fn partition_slots(children: &[Node]) -> FxHashMap<String, Vec<Node>> {
    let mut slots: FxHashMap<String, Vec<Node>> = FxHashMap::default();
    for child in children {
        match child {
            Node::Slot(slot) => slots
                .entry(slot.name.clone().unwrap_or_default())
                .or_default()
                .extend(slot.children.iter().cloned()),
            Node::Element(el) if el.attrs.contains(SLOT_ATTR) => {
                let name = el.attrs.get(SLOT_ATTR).unwrap_or_default().to_string();
                slots.entry(name).or_default().push(Node::Element(ElementNode {
                    tag: el.tag.clone(),
                    attrs: el.attrs.without(&[SLOT_ATTR]),
                    children: el.children.clone(),
                }));
            }
            Node::Text(text) if !text.databound && text.content.trim().is_empty() => {}
            other => slots.entry(String::new()).or_default().push(other.clone()),
        }
    }
    slots
}

/// Emit the caller's content for this slot, or the slot's own children when
/// the caller supplied none.
pub(super) fn exec_slot(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Slot(slot) = node else {
        return Err(wrong_node(NodeKind::Slot, node));
    };
    match ctx.slot(slot.name.as_deref().unwrap_or_default()) {
        // Slot content belongs to the caller: it runs against the caller's
        // variables and cannot return from the callee.
        Some(fill) => {
            interp.exec_scoped(&fill.nodes, &fill.scope)?;
            Ok(Flow::unit())
        }
        None => interp.exec_scoped(&slot.children, ctx),
    }
}

/// Render any node as `<tag attrs>children</tag>`.
///
/// Attribute values are interpolated like text; non-expression braces pass
/// through.
///
/// Registered as the fallback executor, so it also receives kinds with no
/// executor of their own; those render with their tag name and children.
pub fn render_element(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let output = interp.output();
    let tag = node.tag_name();
    let mut open = format!("<{tag}");
    if let Node::Element(el) = node {
        for (name, text) in el.attrs.iter() {
            let value = interpolate_markup(text, ctx)?;
            open.push_str(&format!(" {name}=\"{}\"", value.replace('"', "&quot;")));
        }
    }

    let children = node.children();
    if children.is_empty() {
        open.push_str("/>");
        output.write(&open);
        return Ok(Flow::unit());
    }
    open.push('>');
    output.write(&open);

    let mut flow = Flow::unit();
    for child in children {
        flow = interp.exec_node(child, ctx)?;
        if flow.is_return() {
            break;
        }
    }
    output.write(&format!("</{tag}>"));
    Ok(if flow.is_return() { flow } else { Flow::unit() })
}

pub(super) fn exec_text(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Text(text) = node else {
        return Err(wrong_node(NodeKind::Text, node));
    };
    if text.databound {
        interp.output().write(&interpolate_markup(&text.content, ctx)?);
    } else {
        interp.output().write(&text.content);
    }
    Ok(Flow::unit())
}
