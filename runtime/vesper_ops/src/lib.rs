#![deny(clippy::arithmetic_side_effects)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    reason = "converting both operands to a common numeric type is the engine's defined semantics; every cast site follows the C conversion rules on purpose"
)]
//! Binary operator engine over [`vesper_value::Value`] operands.
//!
//! Every operator application runs through the same pipeline: look up the
//! handler for `(operator, left tag, right tag)` in a precomputed 18 × 18
//! dispatch table, then run it with the caller's [`OverflowPolicy`] and
//! smallest-fit flag. Numeric pairs convert to a common type first
//! (C conversion rules, booleans as 0/1); container pairs run the
//! set/sequence/mapping algebra; everything else raises a typed error.
//!
//! The tables are built once on first use and never change, so lookups are
//! two array indexes and concurrent readers need no locking. `&&` and `||`
//! stay outside the tables: short-circuiting belongs to the expression
//! evaluator, and [`logical_and`]/[`logical_or`] only cover operands that
//! are both already evaluated.

mod containers;
mod dispatch;
mod logical;
mod numeric;
mod operator;
mod overflow;
mod promote;

// Re-export the value types from vesper_value
pub use vesper_value::{RuntimeError, TypeTag, Value, ValueResult};

pub use dispatch::{
    add, bitand, bitor, bitxor, div, eq, evaluate, ge, gt, handler_for, le, lt, modulo, mul, ne,
    shl, shr, sub, table_for, DispatchTable, Handler,
};
pub use logical::{logical_and, logical_or};
pub use operator::{Operator, MATRIX_OP_COUNT};
pub use overflow::OverflowPolicy;
pub use promote::{
    common_integral, common_type, min_rank, promote_kind, rank, smart_promote, PromoteKind, Wide,
};
