//! Control flow: set, if, loop, call, return.

use weft_ir::{LoopKind, Node, NodeKind, SetNode, SetOperation, VarScope};

use super::wrong_node;
use crate::context::ExecutionContext;
use crate::errors::{type_mismatch, undefined_function, zero_step, EvalResult};
use crate::expr::{evaluate_binary, evaluate_condition, evaluate_value, interpolate, BinaryOp};
use crate::interpreter::{bind_param, coerce_named, Flow, Interpreter};
use crate::Value;

pub(super) fn exec_set(
    node: &Node,
    ctx: &ExecutionContext,
    _interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Set(set) = node else {
        return Err(wrong_node(NodeKind::Set, node));
    };
    let operand = match set.value.as_deref() {
        Some(text) => Some(evaluate_value(text, ctx)?),
        None => None,
    };
    let value = apply_operation(set, operand, ctx)?;
    let value = match set.ty {
        Some(ty) => value.coerce(ty)?,
        None => value,
    };
    ctx.assign(set.scope, set.name.clone(), value);
    Ok(Flow::unit())
}

fn apply_operation(
    set: &SetNode,
    operand: Option<Value>,
    ctx: &ExecutionContext,
) -> EvalResult<Value> {
    let current = || ctx.get_nearest(set.scope, &set.name);
    match set.operation {
        SetOperation::Assign => Ok(operand.unwrap_or_default()),
        SetOperation::Increment | SetOperation::Decrement => {
            let op = if set.operation == SetOperation::Increment {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            let current = current().unwrap_or(Value::Int(0));
            evaluate_binary(op, &current, &operand.unwrap_or(Value::Int(1)))
        }
        SetOperation::Append => {
            let operand = operand.unwrap_or_default();
            match current() {
                None | Some(Value::Null) => Ok(Value::List(vec![operand])),
                Some(Value::List(mut items)) => {
                    items.push(operand);
                    Ok(Value::List(items))
                }
                Some(Value::Str(mut s)) => {
                    s.push_str(&operand.to_string());
                    Ok(Value::Str(s))
                }
                Some(other) => Err(type_mismatch("array or string to append to", other.type_name())),
            }
        }
    }
}

/// The first branch whose condition holds runs in a child frame.
pub(super) fn exec_if(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::If(if_node) = node else {
        return Err(wrong_node(NodeKind::If, node));
    };
    for branch in &if_node.branches {
        if evaluate_condition(&branch.condition, ctx)? {
            return interp.exec_scoped(&branch.body, ctx);
        }
    }
    match &if_node.else_body {
        Some(body) => interp.exec_scoped(body, ctx),
        None => Ok(Flow::unit()),
    }
}

pub(super) fn exec_loop(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Loop(lp) = node else {
        return Err(wrong_node(NodeKind::Loop, node));
    };
    // Each iteration gets a fresh child frame holding the loop variables.
    let iterate = |index: Value, item: Value| -> EvalResult<Flow> {
        let frame = ctx.child();
        frame.set(VarScope::Local, lp.var.clone(), item);
        if let Some(name) = &lp.index {
            frame.set(VarScope::Local, name.clone(), index);
        }
        interp.exec_block(&lp.children, &frame)
    };

    match &lp.kind {
        LoopKind::Range { from, to, step } => {
            let from = int_attr(from.as_deref(), ctx)?.unwrap_or(0);
            let to = int_attr(to.as_deref(), ctx)?.unwrap_or(0);
            let step = int_attr(step.as_deref(), ctx)?.unwrap_or(1);
            if step == 0 {
                return Err(zero_step());
            }
            let mut current = from;
            let mut count = 0_i64;
            while (step > 0 && current <= to) || (step < 0 && current >= to) {
                let flow = iterate(Value::Int(count), Value::Int(current))?;
                if flow.is_return() {
                    return Ok(flow);
                }
                count += 1;
                match current.checked_add(step) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        LoopKind::Array { items } => {
            let items = match items.as_deref() {
                Some(text) => evaluate_value(text, ctx)?,
                None => Value::Null,
            };
            let entries: Vec<(Value, Value)> = match items {
                Value::Null => Vec::new(),
                Value::List(items) => (0_i64..).map(Value::Int).zip(items).collect(),
                Value::Map(entries) => entries
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), v))
                    .collect(),
                other => return Err(type_mismatch("array", other.type_name())),
            };
            for (index, item) in entries {
                let flow = iterate(index, item)?;
                if flow.is_return() {
                    return Ok(flow);
                }
            }
        }
        LoopKind::List { items, delimiter } => {
            let text = match items.as_deref() {
                Some(text) => interpolate(text, ctx)?,
                None => String::new(),
            };
            let delimiter = delimiter.as_deref().filter(|d| !d.is_empty()).unwrap_or(",");
            let pieces = text.split(delimiter).map(str::trim).filter(|p| !p.is_empty());
            for (index, piece) in (0_i64..).zip(pieces) {
                let flow = iterate(Value::Int(index), Value::str(piece))?;
                if flow.is_return() {
                    return Ok(flow);
                }
            }
        }
    }
    Ok(Flow::unit())
}

fn int_attr(text: Option<&str>, ctx: &ExecutionContext) -> EvalResult<Option<i64>> {
    match text {
        Some(text) => evaluate_value(text, ctx)?.as_int().map(Some),
        None => Ok(None),
    }
}

/// Call a `<function>` defined earlier in the same component.
///
/// The body runs in a child of the root frame, so it sees component and
/// session state but not the caller's locals. Arguments bind into function
/// scope.
pub(super) fn exec_call(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Call(call) = node else {
        return Err(wrong_node(NodeKind::Call, node));
    };
    let function = ctx
        .function(&call.function)
        .ok_or_else(|| undefined_function(&call.function))?;

    let mut args = Vec::with_capacity(call.args.len());
    for (name, text) in call.args.iter() {
        args.push((name.to_string(), evaluate_value(text, ctx)?));
    }

    let _guard = interp.enter_call()?;
    let frame = ctx.root_frame().child();
    for param in &function.params {
        let supplied = args
            .iter()
            .position(|(name, _)| *name == param.name)
            .map(|i| args.swap_remove(i).1);
        bind_param(param, &function.name, VarScope::Function, supplied, &frame)?;
    }
    // Undeclared arguments are still visible to the body.
    for (name, value) in args {
        frame.set(VarScope::Function, name, value);
    }

    let value = interp.exec_block(&function.children, &frame)?.into_value();
    let value = match function.returns.as_deref() {
        Some(ty) => coerce_named(value, ty)?,
        None => value,
    };
    if let Some(result) = &call.result {
        ctx.assign(VarScope::Local, result.clone(), value.clone());
    }
    Ok(Flow::Normal(value))
}

pub(super) fn exec_return(
    node: &Node,
    ctx: &ExecutionContext,
    _interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Return(ret) = node else {
        return Err(wrong_node(NodeKind::Return, node));
    };
    let value = match ret.value.as_deref() {
        Some(text) => evaluate_value(text, ctx)?,
        None => Value::Null,
    };
    Ok(Flow::Return(value))
}
