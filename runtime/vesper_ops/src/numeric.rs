//! Numeric kernels over [`Value`] operands.
//!
//! Every entry point here follows the same shape: extract both payloads as
//! a [`Scalar`], convert to the common type picked by [`crate::promote`],
//! run the width-specific kernel from [`crate::overflow`], and tag the
//! result. Conversions are C-style throughout: signed values reinterpret
//! at unsigned widths, floats truncate toward zero when an integral width
//! is requested.

use std::cmp::Ordering;

use vesper_value::overflow as overflow_error;
use vesper_value::{
    division_by_zero, modulo_by_zero, unsupported_operands, TypeTag, Value, ValueResult,
};

use crate::overflow::{self, ArithOp, KernelError, OverflowPolicy};
use crate::promote::{common_integral, common_type, min_rank, promote_kind, smart_promote, Wide};

// ---------------------------------------------------------------------------
// Scalar extraction
// ---------------------------------------------------------------------------

/// Numeric payload pulled out of a `Value`, before any conversion.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Scalar {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
    Bool(bool),
}

/// Whether a tag participates in arithmetic and comparison. Booleans do,
/// as ones and zeroes.
pub(crate) fn is_numeric_operand(tag: TypeTag) -> bool {
    tag.is_numeric() || matches!(tag, TypeTag::Bool)
}

/// Whether a tag participates in bitwise and shift operations.
pub(crate) fn is_integral_operand(tag: TypeTag) -> bool {
    tag.is_integral() || matches!(tag, TypeTag::Bool)
}

/// The payload of a numeric or boolean value. `None` for every other tag.
pub(crate) fn scalar_of(value: &Value) -> Option<Scalar> {
    match value {
        Value::Int(v) => Some(Scalar::I32(*v)),
        Value::Uint(v) => Some(Scalar::U32(*v)),
        Value::Long(v) => Some(Scalar::I64(*v)),
        Value::Ulong(v) => Some(Scalar::U64(*v)),
        Value::LongLong(v) => Some(Scalar::I128(*v)),
        Value::UlongLong(v) => Some(Scalar::U128(*v)),
        Value::Float(v) => Some(Scalar::F32(*v)),
        Value::Double(v) | Value::LongDouble(v) => Some(Scalar::F64(*v)),
        Value::Bool(v) => Some(Scalar::Bool(*v)),
        _ => None,
    }
}

macro_rules! scalar_casts {
    ($($method:ident -> $t:ty),* $(,)?) => {
        impl Scalar {
            $(
                #[allow(
                    clippy::unnecessary_cast,
                    reason = "the macro emits an identity cast for the matching width"
                )]
                pub(crate) fn $method(self) -> $t {
                    match self {
                        Scalar::I32(v) => v as $t,
                        Scalar::U32(v) => v as $t,
                        Scalar::I64(v) => v as $t,
                        Scalar::U64(v) => v as $t,
                        Scalar::I128(v) => v as $t,
                        Scalar::U128(v) => v as $t,
                        Scalar::F32(v) => v as $t,
                        Scalar::F64(v) => v as $t,
                        Scalar::Bool(v) => i32::from(v) as $t,
                    }
                }
            )*
        }
    };
}

scalar_casts! {
    to_i32 -> i32,
    to_u32 -> u32,
    to_i64 -> i64,
    to_u64 -> u64,
    to_i128 -> i128,
    to_u128 -> u128,
    to_f32 -> f32,
    to_f64 -> f64,
}

fn scalar_pair(
    op: &'static str,
    left: &Value,
    right: &Value,
) -> ValueResult<(Scalar, Scalar)> {
    match (scalar_of(left), scalar_of(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(unsupported_operands(op, left.tag(), right.tag())),
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// `add`/`sub`/`mul`/`mod` for two numeric operands, at their common type,
/// under the given overflow policy.
pub(crate) fn arith(
    op: ArithOp,
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    let (a, b) = scalar_pair(op.symbol(), left, right)?;
    let common = common_type(left.tag(), right.tag());
    if common.is_float() {
        return float_arith(op, common, a, b, left, right, policy, smallest_fit);
    }

    macro_rules! integral_case {
        ($ctor:expr, $to:ident, $wrapping:ident, $checked:ident, $wide:ident) => {{
            let x = a.$to();
            let y = b.$to();
            match policy {
                OverflowPolicy::Raw | OverflowPolicy::Wrap => {
                    let v = overflow::$wrapping(op, x, y)
                        .map_err(|e| kernel_error(e, op, left, right))?;
                    Ok($ctor(v))
                }
                OverflowPolicy::Throw => {
                    let v = overflow::$checked(op, x, y)
                        .map_err(|e| kernel_error(e, op, left, right))?;
                    Ok($ctor(v))
                }
                OverflowPolicy::Promote => {
                    let wide = overflow::$wide(op, x, y)
                        .map_err(|e| kernel_error(e, op, left, right))?;
                    promote_wide(
                        wide,
                        op.symbol(),
                        op.is_subtraction(),
                        left,
                        right,
                        smallest_fit,
                    )
                }
            }
        }};
    }

    match common {
        TypeTag::Int => {
            integral_case!(Value::Int, to_i32, wrapping_i32, checked_i32, wide_i32)
        }
        TypeTag::Uint => {
            integral_case!(Value::Uint, to_u32, wrapping_u32, checked_u32, wide_u32)
        }
        TypeTag::Long => {
            integral_case!(Value::Long, to_i64, wrapping_i64, checked_i64, wide_i64)
        }
        TypeTag::Ulong => {
            integral_case!(Value::Ulong, to_u64, wrapping_u64, checked_u64, wide_u64)
        }
        TypeTag::LongLong => {
            integral_case!(Value::LongLong, to_i128, wrapping_i128, checked_i128, wide_i128)
        }
        TypeTag::UlongLong => {
            integral_case!(Value::UlongLong, to_u128, wrapping_u128, checked_u128, wide_u128)
        }
        _ => Err(unsupported_operands(op.symbol(), left.tag(), right.tag())),
    }
}

#[allow(
    clippy::too_many_arguments,
    reason = "internal fan-out of `arith`, never called elsewhere"
)]
fn float_arith(
    op: ArithOp,
    common: TypeTag,
    a: Scalar,
    b: Scalar,
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    // A zero divisor fails under every policy.
    if matches!(op, ArithOp::Mod) && b.to_f64() == 0.0 {
        return Err(modulo_by_zero());
    }

    if matches!(policy, OverflowPolicy::Promote) {
        // Accumulate at full width; fitting picks the final tag.
        let v = apply_f64(op, a.to_f64(), b.to_f64());
        return promote_wide(
            Wide::Real(v),
            op.symbol(),
            op.is_subtraction(),
            left,
            right,
            smallest_fit,
        );
    }

    let (value, is_infinite) = match common {
        TypeTag::Float => {
            let v = apply_f32(op, a.to_f32(), b.to_f32());
            (Value::Float(v), v.is_infinite())
        }
        TypeTag::LongDouble => {
            let v = apply_f64(op, a.to_f64(), b.to_f64());
            (Value::LongDouble(v), v.is_infinite())
        }
        _ => {
            let v = apply_f64(op, a.to_f64(), b.to_f64());
            (Value::Double(v), v.is_infinite())
        }
    };
    if matches!(policy, OverflowPolicy::Throw) && is_infinite {
        return Err(overflow_error(op.symbol(), left, right));
    }
    Ok(value)
}

fn apply_f32(op: ArithOp, a: f32, b: f32) -> f32 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Mod => a % b,
    }
}

fn apply_f64(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Mod => a % b,
    }
}

fn kernel_error(e: KernelError, op: ArithOp, left: &Value, right: &Value) -> vesper_value::RuntimeError {
    match e {
        KernelError::Overflow => overflow_error(op.symbol(), left, right),
        KernelError::ModuloByZero => modulo_by_zero(),
    }
}

fn promote_wide(
    wide: Wide,
    symbol: &'static str,
    is_subtraction: bool,
    left: &Value,
    right: &Value,
    smallest_fit: bool,
) -> ValueResult {
    let kind = promote_kind(left.tag(), right.tag());
    let floor = min_rank(left.tag(), right.tag());
    smart_promote(wide, kind, smallest_fit, floor, is_subtraction)
        .ok_or_else(|| overflow_error(symbol, left, right))
}

// ---------------------------------------------------------------------------
// Division
// ---------------------------------------------------------------------------

/// True division. The quotient is always computed at the widest floating
/// width; `Promote` may then refit it onto an integral tag when it is
/// whole, while every other policy tags it `double`.
pub(crate) fn divide(
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    let (a, b) = scalar_pair("/", left, right)?;
    let divisor = b.to_f64();
    if divisor == 0.0 {
        return Err(division_by_zero());
    }
    let quotient = a.to_f64() / divisor;
    match policy {
        OverflowPolicy::Raw | OverflowPolicy::Wrap => Ok(Value::Double(quotient)),
        OverflowPolicy::Throw => {
            if quotient.is_finite() {
                Ok(Value::Double(quotient))
            } else {
                Err(overflow_error("/", left, right))
            }
        }
        OverflowPolicy::Promote => promote_wide(
            Wide::Real(quotient),
            "/",
            false,
            left,
            right,
            smallest_fit,
        ),
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Comparison operations over numeric operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    pub(crate) const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Whether the operation holds for an ordering. `None` models an
    /// unordered pair (a NaN was involved): only `!=` holds there.
    pub(crate) fn holds(self, ord: Option<Ordering>) -> bool {
        match (self, ord) {
            (Self::Ne, ord) => ord != Some(Ordering::Equal),
            (Self::Eq, Some(Ordering::Equal))
            | (Self::Gt, Some(Ordering::Greater))
            | (Self::Ge, Some(Ordering::Greater | Ordering::Equal))
            | (Self::Lt, Some(Ordering::Less))
            | (Self::Le, Some(Ordering::Less | Ordering::Equal)) => true,
            _ => false,
        }
    }
}

/// Compare two numeric operands at their common type. Policies do not
/// apply: conversion wraparound is part of the comparison's meaning.
pub(crate) fn compare(op: CmpOp, left: &Value, right: &Value) -> ValueResult {
    let (a, b) = scalar_pair(op.symbol(), left, right)?;
    let ord = cmp_scalars(a, b, left.tag(), right.tag());
    Ok(Value::Bool(op.holds(ord)))
}

/// Ordering of two numeric values at their common type, `None` when the
/// operands are unordered or not numeric.
pub(crate) fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    let a = scalar_of(left)?;
    let b = scalar_of(right)?;
    cmp_scalars(a, b, left.tag(), right.tag())
}

/// Numeric equality at the common type, with C conversion semantics.
pub(crate) fn numeric_eq(left: &Value, right: &Value) -> bool {
    numeric_cmp(left, right) == Some(Ordering::Equal)
}

fn cmp_scalars(a: Scalar, b: Scalar, lt: TypeTag, rt: TypeTag) -> Option<Ordering> {
    match common_type(lt, rt) {
        TypeTag::Int => Some(a.to_i32().cmp(&b.to_i32())),
        TypeTag::Uint => Some(a.to_u32().cmp(&b.to_u32())),
        TypeTag::Long => Some(a.to_i64().cmp(&b.to_i64())),
        TypeTag::Ulong => Some(a.to_u64().cmp(&b.to_u64())),
        TypeTag::LongLong => Some(a.to_i128().cmp(&b.to_i128())),
        TypeTag::UlongLong => Some(a.to_u128().cmp(&b.to_u128())),
        TypeTag::Float => a.to_f32().partial_cmp(&b.to_f32()),
        TypeTag::Double | TypeTag::LongDouble => a.to_f64().partial_cmp(&b.to_f64()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Bitwise
// ---------------------------------------------------------------------------

/// Bitwise operations over integral operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BitOp {
    And,
    Or,
    Xor,
}

impl BitOp {
    pub(crate) const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
        }
    }
}

/// Bitwise kernel at the integral common type. A boolean pair stays
/// boolean; otherwise any unsigned operand forces an unsigned result.
pub(crate) fn bitwise(op: BitOp, left: &Value, right: &Value) -> ValueResult {
    if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
        let v = match op {
            BitOp::And => a & b,
            BitOp::Or => a | b,
            BitOp::Xor => a ^ b,
        };
        return Ok(Value::Bool(v));
    }

    let (a, b) = scalar_pair(op.symbol(), left, right)?;
    match common_integral(left.tag(), right.tag()) {
        TypeTag::Int => Ok(Value::Int(bit_prim(op, a.to_i32(), b.to_i32()))),
        TypeTag::Uint => Ok(Value::Uint(bit_prim(op, a.to_u32(), b.to_u32()))),
        TypeTag::Long => Ok(Value::Long(bit_prim(op, a.to_i64(), b.to_i64()))),
        TypeTag::Ulong => Ok(Value::Ulong(bit_prim(op, a.to_u64(), b.to_u64()))),
        TypeTag::LongLong => Ok(Value::LongLong(bit_prim(op, a.to_i128(), b.to_i128()))),
        TypeTag::UlongLong => Ok(Value::UlongLong(bit_prim(op, a.to_u128(), b.to_u128()))),
        _ => Err(unsupported_operands(op.symbol(), left.tag(), right.tag())),
    }
}

fn bit_prim<T>(op: BitOp, a: T, b: T) -> T
where
    T: std::ops::BitAnd<Output = T> + std::ops::BitOr<Output = T> + std::ops::BitXor<Output = T>,
{
    match op {
        BitOp::And => a & b,
        BitOp::Or => a | b,
        BitOp::Xor => a ^ b,
    }
}

// ---------------------------------------------------------------------------
// Shifts
// ---------------------------------------------------------------------------

/// Shift direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ShiftOp {
    Left,
    Right,
}

impl ShiftOp {
    pub(crate) const fn symbol(self) -> &'static str {
        match self {
            Self::Left => "<<",
            Self::Right => ">>",
        }
    }
}

/// Shift at the integral common type, so an unsigned operand carries the
/// result into the unsigned tag just as it does for the bitwise kernels.
/// The count converts to `u32` with two's complement wraparound and
/// reduces modulo the common width, so negative and oversized counts
/// follow the same modular rule. Policies do not apply: dropped bits are
/// the operation's meaning.
pub(crate) fn shift(op: ShiftOp, left: &Value, right: &Value) -> ValueResult {
    let (a, b) = scalar_pair(op.symbol(), left, right)?;
    let count = b.to_u32();

    macro_rules! shift_case {
        ($ctor:expr, $to:ident) => {{
            let x = a.$to();
            let v = match op {
                ShiftOp::Left => x.wrapping_shl(count),
                ShiftOp::Right => x.wrapping_shr(count),
            };
            Ok($ctor(v))
        }};
    }

    match common_integral(left.tag(), right.tag()) {
        TypeTag::Int => shift_case!(Value::Int, to_i32),
        TypeTag::Uint => shift_case!(Value::Uint, to_u32),
        TypeTag::Long => shift_case!(Value::Long, to_i64),
        TypeTag::Ulong => shift_case!(Value::Ulong, to_u64),
        TypeTag::LongLong => shift_case!(Value::LongLong, to_i128),
        TypeTag::UlongLong => shift_case!(Value::UlongLong, to_u128),
        _ => Err(unsupported_operands(op.symbol(), left.tag(), right.tag())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==== arithmetic at the common type ====

    #[test]
    fn add_at_matching_tags() {
        let got = arith(
            ArithOp::Add,
            &Value::Int(1),
            &Value::Int(2),
            OverflowPolicy::Raw,
            false,
        );
        assert_eq!(got, Ok(Value::Int(3)));
    }

    #[test]
    fn mixed_signedness_meets_at_the_signed_tag() {
        let got = arith(
            ArithOp::Add,
            &Value::Int(1),
            &Value::Uint(2),
            OverflowPolicy::Raw,
            false,
        );
        assert_eq!(got, Ok(Value::Int(3)));
    }

    #[test]
    fn booleans_count_as_int_operands() {
        let got = arith(
            ArithOp::Add,
            &Value::Bool(true),
            &Value::Bool(true),
            OverflowPolicy::Raw,
            false,
        );
        assert_eq!(got, Ok(Value::Int(2)));
    }

    #[test]
    fn float_operands_pull_the_pair_floating() {
        let got = arith(
            ArithOp::Add,
            &Value::Double(1.5),
            &Value::Int(2),
            OverflowPolicy::Raw,
            false,
        );
        assert_eq!(got, Ok(Value::Double(3.5)));

        let got = arith(
            ArithOp::Mul,
            &Value::Float(2.0),
            &Value::Float(0.5),
            OverflowPolicy::Raw,
            false,
        );
        assert_eq!(got, Ok(Value::Float(1.0)));
    }

    // ==== policies ====

    #[test]
    fn raw_and_wrap_wrap_in_twos_complement() {
        for policy in [OverflowPolicy::Raw, OverflowPolicy::Wrap] {
            let got = arith(ArithOp::Add, &Value::Int(i32::MAX), &Value::Int(1), policy, false);
            assert_eq!(got, Ok(Value::Int(i32::MIN)));
        }
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test asserts the arithmetic fails")]
    fn throw_reports_overflow_with_operands() {
        let got = arith(
            ArithOp::Mul,
            &Value::Int(i32::MAX),
            &Value::Int(2),
            OverflowPolicy::Throw,
            false,
        );
        let err = got.unwrap_err();
        assert!(err.is_overflow());
        assert_eq!(err.to_string(), "overflow in *: operands 2147483647 and 2");
    }

    #[test]
    fn promote_widens_just_past_the_common_tag() {
        let got = arith(
            ArithOp::Add,
            &Value::Int(i32::MAX),
            &Value::Int(1),
            OverflowPolicy::Promote,
            true,
        );
        assert_eq!(got, Ok(Value::Long(2_147_483_648)));

        let got = arith(
            ArithOp::Add,
            &Value::Int(i32::MAX),
            &Value::Int(1),
            OverflowPolicy::Promote,
            false,
        );
        assert_eq!(got, Ok(Value::LongLong(2_147_483_648)));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test asserts the arithmetic fails")]
    fn unsigned_subtraction_below_zero_per_policy() {
        let two = Value::Uint(2);
        let five = Value::Uint(5);

        let got = arith(ArithOp::Sub, &two, &five, OverflowPolicy::Raw, false);
        assert_eq!(got, Ok(Value::Uint(4_294_967_293)));

        let got = arith(ArithOp::Sub, &two, &five, OverflowPolicy::Throw, false);
        assert!(got.unwrap_err().is_overflow());

        let got = arith(ArithOp::Sub, &two, &five, OverflowPolicy::Promote, true);
        assert_eq!(got, Ok(Value::Int(-3)));

        let got = arith(ArithOp::Sub, &two, &five, OverflowPolicy::Promote, false);
        assert_eq!(got, Ok(Value::LongLong(-3)));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test asserts the arithmetic fails")]
    fn throw_reports_infinite_float_results() {
        let got = arith(
            ArithOp::Mul,
            &Value::Double(f64::MAX),
            &Value::Double(2.0),
            OverflowPolicy::Throw,
            false,
        );
        assert!(got.unwrap_err().is_overflow());
    }

    // ==== modulo ====

    #[test]
    fn modulo_truncates_toward_zero() {
        let got = arith(ArithOp::Mod, &Value::Int(7), &Value::Int(3), OverflowPolicy::Raw, false);
        assert_eq!(got, Ok(Value::Int(1)));

        let got = arith(ArithOp::Mod, &Value::Int(-7), &Value::Int(3), OverflowPolicy::Raw, false);
        assert_eq!(got, Ok(Value::Int(-1)));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test asserts the arithmetic fails")]
    fn modulo_by_zero_fails_under_every_policy() {
        for policy in [
            OverflowPolicy::Raw,
            OverflowPolicy::Throw,
            OverflowPolicy::Wrap,
            OverflowPolicy::Promote,
        ] {
            let got = arith(ArithOp::Mod, &Value::Int(5), &Value::Int(0), policy, false);
            assert!(got.unwrap_err().is_zero_division());

            let got = arith(
                ArithOp::Mod,
                &Value::Double(5.0),
                &Value::Double(0.0),
                policy,
                false,
            );
            assert!(got.unwrap_err().is_zero_division());
        }
    }

    #[test]
    fn float_modulo_keeps_the_common_tag() {
        let got = arith(
            ArithOp::Mod,
            &Value::Double(5.5),
            &Value::Int(2),
            OverflowPolicy::Raw,
            false,
        );
        assert_eq!(got, Ok(Value::Double(1.5)));
    }

    // ==== division ====

    #[test]
    fn division_is_true_division() {
        let got = divide(&Value::Int(7), &Value::Int(2), OverflowPolicy::Raw, false);
        assert_eq!(got, Ok(Value::Double(3.5)));

        let got = divide(&Value::Int(6), &Value::Int(2), OverflowPolicy::Raw, false);
        assert_eq!(got, Ok(Value::Double(3.0)));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test asserts the division fails")]
    fn division_by_zero_fails_under_every_policy() {
        for policy in [
            OverflowPolicy::Raw,
            OverflowPolicy::Throw,
            OverflowPolicy::Wrap,
            OverflowPolicy::Promote,
        ] {
            let got = divide(&Value::Int(1), &Value::Int(0), policy, false);
            assert!(got.unwrap_err().is_zero_division());

            let got = divide(&Value::Double(1.0), &Value::Double(0.0), policy, false);
            assert!(got.unwrap_err().is_zero_division());
        }
    }

    #[test]
    fn promoted_division_refits_whole_quotients() {
        let got = divide(&Value::Int(6), &Value::Int(2), OverflowPolicy::Promote, true);
        assert_eq!(got, Ok(Value::Int(3)));

        let got = divide(&Value::Int(6), &Value::Int(2), OverflowPolicy::Promote, false);
        assert_eq!(got, Ok(Value::LongLong(3)));

        let got = divide(&Value::Int(7), &Value::Int(2), OverflowPolicy::Promote, true);
        assert_eq!(got, Ok(Value::Float(3.5)));

        let got = divide(&Value::Int(7), &Value::Int(2), OverflowPolicy::Promote, false);
        assert_eq!(got, Ok(Value::Double(3.5)));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test asserts the division fails")]
    fn division_overflow_under_throw() {
        let got = divide(
            &Value::Double(f64::MAX),
            &Value::Double(0.5),
            OverflowPolicy::Throw,
            false,
        );
        assert!(got.unwrap_err().is_overflow());
    }

    // ==== comparison ====

    #[test]
    fn comparisons_run_at_the_common_type() {
        let got = compare(CmpOp::Lt, &Value::Int(1), &Value::Long(2));
        assert_eq!(got, Ok(Value::Bool(true)));

        let got = compare(CmpOp::Gt, &Value::Double(2.5), &Value::Int(2));
        assert_eq!(got, Ok(Value::Bool(true)));
    }

    #[test]
    fn signed_negative_wraps_at_an_unsigned_common_type() {
        // common(long_long, uint) is long_long, so this pair stays exact.
        let got = compare(CmpOp::Eq, &Value::LongLong(-1), &Value::Uint(u32::MAX));
        assert_eq!(got, Ok(Value::Bool(false)));

        // common(int, ulong_long) is ulong_long: -1 reinterprets as MAX.
        let got = compare(CmpOp::Eq, &Value::Int(-1), &Value::UlongLong(u128::MAX));
        assert_eq!(got, Ok(Value::Bool(true)));
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Value::Double(f64::NAN);
        assert_eq!(compare(CmpOp::Eq, &nan, &nan), Ok(Value::Bool(false)));
        assert_eq!(compare(CmpOp::Ne, &nan, &nan), Ok(Value::Bool(true)));
        assert_eq!(compare(CmpOp::Le, &nan, &Value::Int(1)), Ok(Value::Bool(false)));
    }

    // ==== bitwise ====

    #[test]
    fn boolean_pairs_stay_boolean() {
        let got = bitwise(BitOp::And, &Value::Bool(true), &Value::Bool(false));
        assert_eq!(got, Ok(Value::Bool(false)));

        let got = bitwise(BitOp::Xor, &Value::Bool(true), &Value::Bool(false));
        assert_eq!(got, Ok(Value::Bool(true)));
    }

    #[test]
    fn unsigned_presence_forces_an_unsigned_result() {
        let got = bitwise(BitOp::And, &Value::Int(6), &Value::Uint(3));
        assert_eq!(got, Ok(Value::Uint(2)));

        let got = bitwise(BitOp::Or, &Value::Int(6), &Value::Int(3));
        assert_eq!(got, Ok(Value::Int(7)));
    }

    // ==== shifts ====

    #[test]
    fn shift_counts_reduce_modulo_the_width() {
        let got = shift(ShiftOp::Left, &Value::Int(1), &Value::Int(33));
        assert_eq!(got, Ok(Value::Int(2)));

        let got = shift(ShiftOp::Left, &Value::Long(1), &Value::Int(65));
        assert_eq!(got, Ok(Value::Long(2)));
    }

    #[test]
    fn negative_counts_follow_the_modular_rule() {
        // -1 converts to u32::MAX, which reduces to 31.
        let got = shift(ShiftOp::Left, &Value::Int(1), &Value::Int(-1));
        assert_eq!(got, Ok(Value::Int(i32::MIN)));
    }

    #[test]
    fn right_shift_is_arithmetic_for_signed_operands() {
        let got = shift(ShiftOp::Right, &Value::Int(-8), &Value::Int(1));
        assert_eq!(got, Ok(Value::Int(-4)));

        let got = shift(ShiftOp::Right, &Value::Uint(8), &Value::Int(1));
        assert_eq!(got, Ok(Value::Uint(4)));
    }

    #[test]
    fn shift_width_follows_the_integral_common_type() {
        let got = shift(ShiftOp::Left, &Value::Bool(true), &Value::Int(3));
        assert_eq!(got, Ok(Value::Int(8)));

        // An unsigned count pulls the result into the unsigned tag.
        let got = shift(ShiftOp::Left, &Value::Int(1), &Value::Ulong(3));
        assert_eq!(got, Ok(Value::Ulong(8)));
    }
}
