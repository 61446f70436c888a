//! Binary and unary operator semantics.
//!
//! Attribute text reaches expressions as strings, so arithmetic accepts
//! numeric strings as numbers. `+` adds when both sides are numeric and
//! concatenates otherwise.

use std::cmp::Ordering;

use super::{BinaryOp, UnaryOp};
use crate::errors::{division_by_zero, integer_overflow, type_mismatch, EvalError, EvalResult};
use crate::value::Number;
use crate::Value;

#[inline]
fn checked(result: Option<i64>, operation: &str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(operation))
}

fn operand_mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    type_mismatch(
        &format!("operands for `{}`", op.as_symbol()),
        &format!("{} and {}", left.type_name(), right.type_name()),
    )
}

/// Evaluate a non-short-circuiting binary operator.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            match (left.as_number(), right.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => int_arith(op, a, b),
                (Some(a), Some(b)) => float_arith(op, a.as_f64(), b.as_f64()),
                _ => Err(operand_mismatch(op, left, right)),
            }
        }
        BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.loose_eq(right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let Some(ordering) = left.compare(right) else {
                return Err(operand_mismatch(op, left, right));
            };
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::LtEq => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        // Short-circuiting operators reach here only with both sides evaluated.
        BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
    }
}

fn add(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::List(a), Value::List(b)) => {
            Ok(Value::List(a.iter().chain(b).cloned().collect()))
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => checked(a.checked_add(b), "addition"),
            (Some(a), Some(b)) => Ok(Value::Float(a.as_f64() + b.as_f64())),
            _ if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) => {
                Ok(Value::Str(format!("{left}{right}")))
            }
            _ => Err(operand_mismatch(BinaryOp::Add, left, right)),
        },
    }
}

/// Integer arithmetic. Division yields an integer only when exact.
fn int_arith(op: BinaryOp, a: i64, b: i64) -> EvalResult {
    match op {
        BinaryOp::Sub => checked(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            match a.checked_rem(b) {
                Some(0) => checked(a.checked_div(b), "division"),
                _ => float_arith(op, Number::Int(a).as_f64(), Number::Int(b).as_f64()),
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(division_by_zero());
            }
            checked(a.checked_rem(b), "remainder")
        }
        _ => Err(type_mismatch("arithmetic operator", op.as_symbol())),
    }
}

fn float_arith(op: BinaryOp, a: f64, b: f64) -> EvalResult {
    match op {
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div | BinaryOp::Mod if b == 0.0 => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        _ => Err(type_mismatch("arithmetic operator", op.as_symbol())),
    }
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Neg => match operand.as_number() {
            Some(Number::Int(n)) => checked(n.checked_neg(), "negation"),
            Some(Number::Float(f)) => Ok(Value::Float(-f)),
            None => Err(type_mismatch("number", operand.type_name())),
        },
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bin(op: BinaryOp, a: impl Into<Value>, b: impl Into<Value>) -> EvalResult {
        evaluate_binary(op, &a.into(), &b.into())
    }

    #[test]
    fn add_numeric_and_concat() {
        assert_eq!(bin(BinaryOp::Add, 1_i64, 2_i64).unwrap(), Value::Int(3));
        assert_eq!(bin(BinaryOp::Add, "1", 2_i64).unwrap(), Value::Int(3));
        assert_eq!(bin(BinaryOp::Add, 1_i64, 0.5).unwrap(), Value::Float(1.5));
        assert_eq!(bin(BinaryOp::Add, "a", 1_i64).unwrap(), Value::str("a1"));
        assert!(bin(BinaryOp::Add, true, 1_i64).is_err());
    }

    #[test]
    fn division() {
        assert_eq!(bin(BinaryOp::Div, 6_i64, 3_i64).unwrap(), Value::Int(2));
        assert_eq!(bin(BinaryOp::Div, 7_i64, 2_i64).unwrap(), Value::Float(3.5));
        assert_eq!(
            bin(BinaryOp::Div, 1_i64, 0_i64).unwrap_err().kind,
            crate::EvalErrorKind::DivisionByZero
        );
        assert!(bin(BinaryOp::Mod, 1.0, 0.0).is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(bin(BinaryOp::Add, i64::MAX, 1_i64).is_err());
        assert!(evaluate_unary(UnaryOp::Neg, &Value::Int(i64::MIN)).is_err());
    }

    #[test]
    fn comparisons() {
        assert_eq!(bin(BinaryOp::Lt, 1_i64, 2.5).unwrap(), Value::Bool(true));
        assert_eq!(bin(BinaryOp::GtEq, "b", "a").unwrap(), Value::Bool(true));
        assert_eq!(bin(BinaryOp::Eq, "3", 3_i64).unwrap(), Value::Bool(true));
        assert!(bin(BinaryOp::Lt, "a", 1_i64).is_err());
    }
}
