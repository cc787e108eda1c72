//! Error types raised by value accessors and the operator engine.
//!
//! The taxonomy is deliberately small. Everything the engine can raise is
//! one of three categories: a type error (operator undefined for a tag
//! pair, or a payload read against the wrong tag), a zero-divisor error,
//! or an overflow under the `Throw` policy. Factory functions are the
//! public construction API; `Display` renders the user-facing message.

use crate::tag::TypeTag;
use crate::value::Value;
use std::fmt;

/// Result of a value operation.
pub type ValueResult<T = Value> = Result<T, RuntimeError>;

/// Structured runtime error.
///
/// Category predicates (`is_type_error`, `is_zero_division`, `is_overflow`)
/// collapse the variants into the three-kind taxonomy callers match on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// Operator has no definition for this tag pair.
    UnsupportedOperands {
        op: &'static str,
        left: TypeTag,
        right: TypeTag,
    },
    /// Payload extraction against a mismatched tag.
    TypeMismatch { expected: TypeTag, got: TypeTag },
    /// Division with a zero divisor, any policy.
    DivisionByZero,
    /// Modulo with a zero divisor, any policy.
    ModuloByZero,
    /// Result unrepresentable in the common type (`Throw` policy, or a
    /// promoted result beyond the widest floating range).
    Overflow {
        op: &'static str,
        left: String,
        right: String,
    },
}

impl RuntimeError {
    /// True for the TypeError category.
    pub const fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperands { .. } | Self::TypeMismatch { .. }
        )
    }

    /// True for the ZeroDivisionError category.
    pub const fn is_zero_division(&self) -> bool {
        matches!(self, Self::DivisionByZero | Self::ModuloByZero)
    }

    /// True for the OverflowError category.
    pub const fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperands { op, left, right } => {
                write!(
                    f,
                    "unsupported operand type(s) for {op}: '{left}' and '{right}'"
                )
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::Overflow { op, left, right } => {
                write!(f, "overflow in {op}: operands {left} and {right}")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Operator undefined for the given tag pair.
#[cold]
pub fn unsupported_operands(op: &'static str, left: TypeTag, right: TypeTag) -> RuntimeError {
    RuntimeError::UnsupportedOperands { op, left, right }
}

/// Payload read against the wrong tag.
#[cold]
pub fn type_mismatch(expected: TypeTag, got: TypeTag) -> RuntimeError {
    RuntimeError::TypeMismatch { expected, got }
}

/// Division by zero.
#[cold]
pub fn division_by_zero() -> RuntimeError {
    RuntimeError::DivisionByZero
}

/// Modulo by zero.
#[cold]
pub fn modulo_by_zero() -> RuntimeError {
    RuntimeError::ModuloByZero
}

/// Unrepresentable result. Carries the operand values for the message.
#[cold]
pub fn overflow(op: &'static str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::Overflow {
        op,
        left: left.to_string(),
        right: right.to_string(),
    }
}
