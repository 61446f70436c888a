//! Databinding: `{expr}` segments inside text and attribute values.
//!
//! Expressions are small: variable paths (`user.name`, `items[0]`), literals,
//! arithmetic, comparisons and boolean logic. `{{` and `}}` write literal
//! braces.

mod lexer;
mod operators;
mod parser;

use std::borrow::Cow;

pub use operators::{evaluate_binary, evaluate_unary};
pub use parser::SyntaxError;

use crate::context::ExecutionContext;
use crate::errors::{expression_error, type_mismatch, EvalResult};
use crate::Value;

/// Parsed expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(String),
    Field(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    List(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 6,
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Parse one expression (without surrounding braces).
pub fn parse(src: &str) -> EvalResult<Expr> {
    parser::parse(src).map_err(|err| {
        expression_error(src, format!("{} at offset {}", err.message, err.offset))
    })
}

/// Evaluate a parsed expression against `ctx`.
pub fn evaluate(expr: &Expr, ctx: &ExecutionContext) -> EvalResult {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Var(name) => ctx.lookup(name),
        Expr::Field(target, field) => field_of(&evaluate(target, ctx)?, field),
        Expr::Index(target, index) => {
            index_of(&evaluate(target, ctx)?, &evaluate(index, ctx)?)
        }
        Expr::List(items) => items
            .iter()
            .map(|item| evaluate(item, ctx))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::List),
        Expr::Unary(op, operand) => evaluate_unary(*op, &evaluate(operand, ctx)?),
        Expr::Binary(BinaryOp::And, left, right) => {
            let left = evaluate(left, ctx)?;
            if !left.is_truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(evaluate(right, ctx)?.is_truthy()))
        }
        Expr::Binary(BinaryOp::Or, left, right) => {
            let left = evaluate(left, ctx)?;
            if left.is_truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(evaluate(right, ctx)?.is_truthy()))
        }
        Expr::Binary(op, left, right) => {
            evaluate_binary(*op, &evaluate(left, ctx)?, &evaluate(right, ctx)?)
        }
    }
}

/// Parse and evaluate `src`.
pub fn eval_str(src: &str, ctx: &ExecutionContext) -> EvalResult {
    evaluate(&parse(src)?, ctx)
}

fn field_of(target: &Value, field: &str) -> EvalResult {
    match target {
        Value::Map(entries) => Ok(entries.get(field).cloned().unwrap_or_default()),
        Value::List(items) if field == "length" => Ok(Value::Int(len(items.len()))),
        Value::Str(s) if field == "length" => Ok(Value::Int(len(s.chars().count()))),
        other => Err(type_mismatch(
            &format!("object with field `{field}`"),
            other.type_name(),
        )),
    }
}

fn index_of(target: &Value, index: &Value) -> EvalResult {
    match target {
        Value::List(items) => {
            let i = index.as_int()?;
            Ok(position(i, items.len())
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default())
        }
        Value::Str(s) => {
            let i = index.as_int()?;
            let count = s.chars().count();
            Ok(position(i, count)
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::Str(c.to_string()))
                .unwrap_or_default())
        }
        Value::Map(entries) => Ok(entries.get(&index.to_string()).cloned().unwrap_or_default()),
        other => Err(type_mismatch("array, string or object", other.type_name())),
    }
}

/// Resolve a possibly negative index against `len`.
fn position(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok()
    } else {
        len.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)
    }
}

fn len(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// A piece of template text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(Cow<'a, str>),
    /// Expression source between braces.
    Binding(&'a str),
}

/// Split `text` into literal runs and `{...}` bindings.
///
/// Braces inside quoted strings do not close a binding. An unmatched `{` is
/// an error; a lone `}` is literal.
pub fn segments(text: &str) -> EvalResult<Vec<Segment<'_>>> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut run_start = 0;
    let mut escaped = false;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                literal.push_str(&text[run_start..i]);
                literal.push('{');
                escaped = true;
                i += 2;
                run_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                literal.push_str(&text[run_start..i]);
                literal.push('}');
                escaped = true;
                i += 2;
                run_start = i;
            }
            b'{' => {
                literal.push_str(&text[run_start..i]);
                let close = binding_end(text, i + 1)
                    .ok_or_else(|| expression_error(text, "unclosed `{`"))?;
                if !literal.is_empty() {
                    out.push(Segment::Literal(Cow::Owned(std::mem::take(&mut literal))));
                }
                out.push(Segment::Binding(&text[i + 1..close]));
                i = close + 1;
                run_start = i;
            }
            _ => i += 1,
        }
    }

    if out.is_empty() && !escaped {
        if !text.is_empty() {
            out.push(Segment::Literal(Cow::Borrowed(text)));
        }
        return Ok(out);
    }
    literal.push_str(&text[run_start..]);
    if !literal.is_empty() {
        out.push(Segment::Literal(Cow::Owned(literal)));
    }
    Ok(out)
}

/// Byte index of the `}` closing a binding whose body starts at `start`.
fn binding_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text[start..].char_indices();
    while let Some((offset, c)) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') if depth == 0 => return Some(start + offset),
            (None, '}') => depth -= 1,
            (None, _) => {}
        }
    }
    None
}

/// Render pass-through markup text such as element bodies and attributes.
///
/// Braces that are not bindings (`<style>` rules, inline scripts) are kept:
/// a brace body that does not parse as an expression, or text with an
/// unclosed `{`, is written unchanged. Evaluation errors still propagate.
pub fn interpolate_markup(text: &str, ctx: &ExecutionContext) -> EvalResult<String> {
    let Ok(parts) = segments(text) else {
        return Ok(text.to_string());
    };
    let mut out = String::with_capacity(text.len());
    for segment in parts {
        match segment {
            Segment::Literal(s) => out.push_str(&s),
            Segment::Binding(src) => match parser::parse(src) {
                Ok(expr) => out.push_str(&evaluate(&expr, ctx)?.to_string()),
                Err(_) => {
                    out.push('{');
                    out.push_str(src);
                    out.push('}');
                }
            },
        }
    }
    Ok(out)
}

/// Render `text`, replacing every binding with its value's text.
pub fn interpolate(text: &str, ctx: &ExecutionContext) -> EvalResult<String> {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text)? {
        match segment {
            Segment::Literal(s) => out.push_str(&s),
            Segment::Binding(src) => out.push_str(&eval_str(src, ctx)?.to_string()),
        }
    }
    Ok(out)
}

/// Value of an attribute.
///
/// A value that is exactly one binding keeps the binding's typed value;
/// anything else is interpolated into a string.
pub fn evaluate_value(text: &str, ctx: &ExecutionContext) -> EvalResult {
    let trimmed = text.trim();
    let parts = segments(trimmed)?;
    if let [Segment::Binding(src)] = parts.as_slice() {
        return eval_str(src, ctx);
    }
    if parts.iter().all(|p| matches!(p, Segment::Literal(_))) {
        return Ok(Value::Str(
            parts
                .into_iter()
                .map(|p| match p {
                    Segment::Literal(s) => s,
                    Segment::Binding(b) => Cow::Borrowed(b),
                })
                .collect(),
        ));
    }
    interpolate(text, ctx).map(Value::Str)
}

/// Truth of a `condition`.
///
/// The whole text is one expression. Bindings inside it stand for their
/// own value, so `{a} == {b}` compares the values of `a` and `b` and a lone
/// `{flag}` tests the truthiness of `flag`.
pub fn evaluate_condition(text: &str, ctx: &ExecutionContext) -> EvalResult<bool> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }
    let mut src = String::with_capacity(trimmed.len() + 2);
    for segment in segments(trimmed)? {
        match segment {
            Segment::Literal(s) => src.push_str(&s),
            Segment::Binding(b) => {
                src.push('(');
                src.push_str(b);
                src.push(')');
            }
        }
    }
    eval_str(&src, ctx).map(|v| v.is_truthy())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
