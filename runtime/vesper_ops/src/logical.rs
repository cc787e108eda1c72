//! Logical conjunction and disjunction over evaluated operands.
//!
//! `&&` and `||` live outside the dispatch matrix: short-circuiting has to
//! happen before the right operand exists, so it belongs to the expression
//! evaluator. These functions cover the remaining case where both operands
//! are already materialized. They coerce each side with
//! [`Value::is_truthy`] and never fail.

use vesper_value::Value;

use crate::operator::Operator;

pub fn logical_and(left: &Value, right: &Value) -> Value {
    Value::Bool(left.is_truthy() && right.is_truthy())
}

pub fn logical_or(left: &Value, right: &Value) -> Value {
    Value::Bool(left.is_truthy() || right.is_truthy())
}

/// Routes a short-circuit operator to its coercion, `None` for every
/// operator that belongs in the dispatch matrix.
pub(crate) fn apply(op: Operator, left: &Value, right: &Value) -> Option<Value> {
    match op {
        Operator::And => Some(logical_and(left, right)),
        Operator::Or => Some(logical_or(left, right)),
        _ => None,
    }
}
