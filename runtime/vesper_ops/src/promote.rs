//! Numeric promotion.
//!
//! Three questions are answered here:
//!
//! 1. [`common_type`]: at what width do two numeric operands meet before a
//!    kernel runs? Floating beats integral, wider beats narrower.
//! 2. [`common_integral`]: same question for bitwise kernels, where any
//!    unsigned operand forces an unsigned meeting point.
//! 3. [`smart_promote`]: given an exact wide result, which tag should carry
//!    it? Walks a promotion chain picked by [`PromoteKind`], either to the
//!    narrowest exactly-representing tag (`smallest_fit`) or to a fixed
//!    default width.
//!
//! Booleans normalize to `int` before any of these run, so rank 0 never
//! appears as an operand rank.

use vesper_value::{TypeTag, Value};

// ---------------------------------------------------------------------------
// Ranks
// ---------------------------------------------------------------------------

pub const RANK_BOOL: u8 = 0;
pub const RANK_UINT: u8 = 1;
pub const RANK_INT: u8 = 2;
pub const RANK_ULONG: u8 = 3;
pub const RANK_LONG: u8 = 4;
pub const RANK_ULONG_LONG: u8 = 5;
pub const RANK_LONG_LONG: u8 = 6;
pub const RANK_FLOAT: u8 = 7;
pub const RANK_DOUBLE: u8 = 8;
pub const RANK_LONG_DOUBLE: u8 = 9;

/// Promotion rank of a numeric tag. Signed beats unsigned at equal width,
/// floating beats integral, wider beats narrower.
pub const fn rank(tag: TypeTag) -> u8 {
    match tag {
        TypeTag::Bool => RANK_BOOL,
        TypeTag::Uint => RANK_UINT,
        TypeTag::Int => RANK_INT,
        TypeTag::Ulong => RANK_ULONG,
        TypeTag::Long => RANK_LONG,
        TypeTag::UlongLong => RANK_ULONG_LONG,
        TypeTag::LongLong => RANK_LONG_LONG,
        TypeTag::Float => RANK_FLOAT,
        TypeTag::Double => RANK_DOUBLE,
        TypeTag::LongDouble => RANK_LONG_DOUBLE,
        // Non-numeric tags never reach promotion; the lowest rank is inert.
        _ => RANK_BOOL,
    }
}

const fn normalize(tag: TypeTag) -> TypeTag {
    match tag {
        TypeTag::Bool => TypeTag::Int,
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Common types
// ---------------------------------------------------------------------------

/// Width at which two numeric operands meet for arithmetic and comparison.
///
/// Equal tags stay put; otherwise the first tag of the priority order held
/// by either operand wins. Booleans count as `int`.
pub fn common_type(left: TypeTag, right: TypeTag) -> TypeTag {
    const PRIORITY: [TypeTag; 9] = [
        TypeTag::LongDouble,
        TypeTag::Double,
        TypeTag::Float,
        TypeTag::LongLong,
        TypeTag::UlongLong,
        TypeTag::Long,
        TypeTag::Ulong,
        TypeTag::Int,
        TypeTag::Uint,
    ];

    let left = normalize(left);
    let right = normalize(right);
    if left == right {
        return left;
    }
    for tag in PRIORITY {
        if left == tag || right == tag {
            return tag;
        }
    }
    // Unreachable for numeric inputs; a wide signed default is inert.
    TypeTag::LongLong
}

/// Width at which two integral operands meet for bitwise kernels.
///
/// If either operand is unsigned the result is the widest unsigned tag
/// present, even when a wider signed operand exists. Otherwise the widest
/// signed tag wins. Booleans count as `int`.
pub fn common_integral(left: TypeTag, right: TypeTag) -> TypeTag {
    let left = normalize(left);
    let right = normalize(right);
    let left_unsigned = left.is_unsigned_integral();
    let right_unsigned = right.is_unsigned_integral();

    if left_unsigned && right_unsigned {
        if rank(left) >= rank(right) {
            left
        } else {
            right
        }
    } else if left_unsigned {
        left
    } else if right_unsigned {
        right
    } else if rank(left) >= rank(right) {
        left
    } else {
        right
    }
}

// ---------------------------------------------------------------------------
// Promotion kinds
// ---------------------------------------------------------------------------

/// Which promotion chain an operand pair selects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromoteKind {
    /// At least one floating operand: `float .. long_double`.
    HasFloat,
    /// Both operands unsigned integral: `uint .. ulong_long`.
    BothUnsigned,
    /// Integral with at least one signed operand: `int .. long_long`.
    Signed,
}

/// Chain selected by an operand pair. Booleans count as `int`, so a pair
/// with a boolean is never `BothUnsigned`.
pub fn promote_kind(left: TypeTag, right: TypeTag) -> PromoteKind {
    let left = normalize(left);
    let right = normalize(right);
    if left.is_float() || right.is_float() {
        PromoteKind::HasFloat
    } else if left.is_unsigned_integral() && right.is_unsigned_integral() {
        PromoteKind::BothUnsigned
    } else {
        PromoteKind::Signed
    }
}

/// Floor rank for smallest-fit promotion: the higher operand rank, so the
/// result never lands on a tag narrower than either operand.
pub fn min_rank(left: TypeTag, right: TypeTag) -> u8 {
    rank(normalize(left)).max(rank(normalize(right)))
}

// ---------------------------------------------------------------------------
// Wide results
// ---------------------------------------------------------------------------

/// Exact wide result of an arithmetic kernel, prior to fitting.
///
/// Kernels at 64 bits or narrower always produce an exact `Int`/`Uint`;
/// 128-bit kernels fall back to `Real` when even the wide accumulator
/// overflows, trading exactness for range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Wide {
    Int(i128),
    Uint(u128),
    Real(f64),
}

impl Wide {
    /// Value as `f64`, rounding when a 128-bit integer exceeds 53 bits.
    pub fn as_f64(self) -> f64 {
        match self {
            Wide::Int(i) => i as f64,
            Wide::Uint(u) => u as f64,
            Wide::Real(v) => v,
        }
    }

    /// True when the mathematical value is below zero.
    pub fn is_negative(self) -> bool {
        match self {
            Wide::Int(i) => i < 0,
            Wide::Uint(_) => false,
            Wide::Real(v) => v < 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Smart promotion
// ---------------------------------------------------------------------------

/// Fit a wide result onto a tag.
///
/// With `smallest_fit` the chain is walked upward from `min_rank` and the
/// first tag that represents `raw` exactly wins. Without it a fixed
/// default width is used per kind: `double` for `HasFloat`, `long_long`
/// for `Signed`, `ulong_long` for `BothUnsigned`. Integral chains fall
/// through to the floating chain when no integral tag represents the
/// value; a value the fixed integral default cannot hold lands on
/// `double`.
///
/// An unsigned subtraction whose true result is negative switches to the
/// signed chain so the sign survives.
///
/// Returns `None` when not even the widest floating width represents the
/// value, which the caller reports as an overflow.
pub fn smart_promote(
    raw: Wide,
    kind: PromoteKind,
    smallest_fit: bool,
    min_rank: u8,
    is_subtraction: bool,
) -> Option<Value> {
    match kind {
        PromoteKind::HasFloat => {
            let floor = if smallest_fit {
                min_rank.max(RANK_FLOAT)
            } else {
                RANK_DOUBLE
            };
            fit_floating(raw, floor)
        }
        PromoteKind::BothUnsigned => {
            if is_subtraction && raw.is_negative() {
                let floors = integral_floors(smallest_fit, min_rank, RANK_LONG_LONG);
                fit_signed(raw, floors)
            } else {
                let floors = integral_floors(smallest_fit, min_rank, RANK_ULONG_LONG);
                fit_unsigned(raw, floors)
            }
        }
        PromoteKind::Signed => {
            let floors = integral_floors(smallest_fit, min_rank, RANK_LONG_LONG);
            fit_signed(raw, floors)
        }
    }
}

/// Floor ranks for an integral chain and its floating fall-through.
#[derive(Copy, Clone)]
struct Floors {
    integral: u8,
    floating: u8,
}

fn integral_floors(smallest_fit: bool, min_rank: u8, default_rank: u8) -> Floors {
    if smallest_fit {
        Floors {
            integral: min_rank,
            floating: min_rank,
        }
    } else {
        Floors {
            integral: default_rank,
            floating: RANK_DOUBLE,
        }
    }
}

fn fit_signed(raw: Wide, floors: Floors) -> Option<Value> {
    if floors.integral <= RANK_INT {
        if let Some(v) = exact_i32(raw) {
            return Some(Value::Int(v));
        }
    }
    if floors.integral <= RANK_LONG {
        if let Some(v) = exact_i64(raw) {
            return Some(Value::Long(v));
        }
    }
    if floors.integral <= RANK_LONG_LONG {
        if let Some(v) = exact_i128(raw) {
            return Some(Value::LongLong(v));
        }
    }
    fit_floating(raw, floors.floating)
}

fn fit_unsigned(raw: Wide, floors: Floors) -> Option<Value> {
    if floors.integral <= RANK_UINT {
        if let Some(v) = exact_u32(raw) {
            return Some(Value::Uint(v));
        }
    }
    if floors.integral <= RANK_ULONG {
        if let Some(v) = exact_u64(raw) {
            return Some(Value::Ulong(v));
        }
    }
    if floors.integral <= RANK_ULONG_LONG {
        if let Some(v) = exact_u128(raw) {
            return Some(Value::UlongLong(v));
        }
    }
    fit_floating(raw, floors.floating)
}

fn fit_floating(raw: Wide, floor: u8) -> Option<Value> {
    // Integral wides always fit their own 128-bit chain, so this path sees
    // Real values in practice; the integral conversions are for totality.
    let v = raw.as_f64();
    if !v.is_finite() {
        return None;
    }
    if floor <= RANK_FLOAT && f64::from(v as f32) == v {
        return Some(Value::Float(v as f32));
    }
    if floor <= RANK_DOUBLE {
        return Some(Value::Double(v));
    }
    Some(Value::LongDouble(v))
}

// ---------------------------------------------------------------------------
// Exact representability
// ---------------------------------------------------------------------------

// Powers of two; every bound below is exact in f64.
const U32_LIMIT: f64 = 4_294_967_296.0;
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;
const U128_LIMIT: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// `v` holds an integer in `[min, -min)`. Uses a half-open upper bound so
/// rounding of `MAX` toward the next power of two cannot sneak an
/// out-of-range value past the check.
fn real_fits_signed(v: f64, min: f64) -> bool {
    v.trunc() == v && v >= min && v < -min
}

fn real_fits_unsigned(v: f64, limit: f64) -> bool {
    v.trunc() == v && v >= 0.0 && v < limit
}

fn exact_i32(raw: Wide) -> Option<i32> {
    match raw {
        Wide::Int(i) => i32::try_from(i).ok(),
        Wide::Uint(u) => i32::try_from(u).ok(),
        Wide::Real(v) => real_fits_signed(v, f64::from(i32::MIN)).then_some(v as i32),
    }
}

fn exact_i64(raw: Wide) -> Option<i64> {
    match raw {
        Wide::Int(i) => i64::try_from(i).ok(),
        Wide::Uint(u) => i64::try_from(u).ok(),
        Wide::Real(v) => real_fits_signed(v, i64::MIN as f64).then_some(v as i64),
    }
}

fn exact_i128(raw: Wide) -> Option<i128> {
    match raw {
        Wide::Int(i) => Some(i),
        Wide::Uint(u) => i128::try_from(u).ok(),
        Wide::Real(v) => real_fits_signed(v, i128::MIN as f64).then_some(v as i128),
    }
}

fn exact_u32(raw: Wide) -> Option<u32> {
    match raw {
        Wide::Int(i) => u32::try_from(i).ok(),
        Wide::Uint(u) => u32::try_from(u).ok(),
        Wide::Real(v) => real_fits_unsigned(v, U32_LIMIT).then_some(v as u32),
    }
}

fn exact_u64(raw: Wide) -> Option<u64> {
    match raw {
        Wide::Int(i) => u64::try_from(i).ok(),
        Wide::Uint(u) => u64::try_from(u).ok(),
        Wide::Real(v) => real_fits_unsigned(v, U64_LIMIT).then_some(v as u64),
    }
}

fn exact_u128(raw: Wide) -> Option<u128> {
    match raw {
        Wide::Int(i) => u128::try_from(i).ok(),
        Wide::Uint(u) => Some(u),
        Wide::Real(v) => real_fits_unsigned(v, U128_LIMIT).then_some(v as u128),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==== ranks and common types ====

    #[test]
    fn ranks_increase_along_each_chain() {
        assert!(RANK_UINT < RANK_ULONG && RANK_ULONG < RANK_ULONG_LONG);
        assert!(RANK_INT < RANK_LONG && RANK_LONG < RANK_LONG_LONG);
        assert!(RANK_FLOAT < RANK_DOUBLE && RANK_DOUBLE < RANK_LONG_DOUBLE);
        assert!(RANK_LONG_LONG < RANK_FLOAT);
    }

    #[test]
    fn common_type_prefers_signed_then_wider_then_floating() {
        assert_eq!(common_type(TypeTag::Int, TypeTag::Uint), TypeTag::Int);
        assert_eq!(common_type(TypeTag::Uint, TypeTag::Ulong), TypeTag::Ulong);
        assert_eq!(
            common_type(TypeTag::LongLong, TypeTag::UlongLong),
            TypeTag::LongLong
        );
        assert_eq!(
            common_type(TypeTag::Double, TypeTag::LongLong),
            TypeTag::Double
        );
        assert_eq!(
            common_type(TypeTag::Float, TypeTag::LongDouble),
            TypeTag::LongDouble
        );
        assert_eq!(common_type(TypeTag::Float, TypeTag::Int), TypeTag::Float);
    }

    #[test]
    fn common_type_is_symmetric() {
        let tags = [
            TypeTag::Bool,
            TypeTag::Uint,
            TypeTag::Int,
            TypeTag::Ulong,
            TypeTag::Long,
            TypeTag::UlongLong,
            TypeTag::LongLong,
            TypeTag::Float,
            TypeTag::Double,
            TypeTag::LongDouble,
        ];
        for a in tags {
            for b in tags {
                assert_eq!(common_type(a, b), common_type(b, a));
            }
        }
    }

    #[test]
    fn booleans_count_as_int() {
        assert_eq!(common_type(TypeTag::Bool, TypeTag::Bool), TypeTag::Int);
        assert_eq!(common_type(TypeTag::Bool, TypeTag::Uint), TypeTag::Int);
        assert_eq!(common_integral(TypeTag::Bool, TypeTag::Bool), TypeTag::Int);
        assert_eq!(promote_kind(TypeTag::Bool, TypeTag::Uint), PromoteKind::Signed);
    }

    #[test]
    fn common_integral_favors_unsigned_presence() {
        assert_eq!(common_integral(TypeTag::Int, TypeTag::Uint), TypeTag::Uint);
        assert_eq!(
            common_integral(TypeTag::LongLong, TypeTag::Uint),
            TypeTag::Uint
        );
        assert_eq!(
            common_integral(TypeTag::Ulong, TypeTag::Uint),
            TypeTag::Ulong
        );
        assert_eq!(common_integral(TypeTag::Int, TypeTag::Long), TypeTag::Long);
    }

    #[test]
    fn promote_kind_and_min_rank() {
        assert_eq!(
            promote_kind(TypeTag::Double, TypeTag::Int),
            PromoteKind::HasFloat
        );
        assert_eq!(
            promote_kind(TypeTag::Uint, TypeTag::Ulong),
            PromoteKind::BothUnsigned
        );
        assert_eq!(promote_kind(TypeTag::Int, TypeTag::Uint), PromoteKind::Signed);
        assert_eq!(min_rank(TypeTag::Int, TypeTag::Ulong), RANK_ULONG);
        assert_eq!(min_rank(TypeTag::Bool, TypeTag::Bool), RANK_INT);
    }

    // ==== smart promotion, smallest fit ====

    #[test]
    fn smallest_fit_keeps_narrow_results_narrow() {
        let got = smart_promote(Wide::Int(5), PromoteKind::Signed, true, RANK_INT, false);
        assert_eq!(got, Some(Value::Int(5)));
    }

    #[test]
    fn smallest_fit_widens_past_a_full_narrow_tag() {
        // One past i32::MAX.
        let got = smart_promote(
            Wide::Int(2_147_483_648),
            PromoteKind::Signed,
            true,
            RANK_INT,
            false,
        );
        assert_eq!(got, Some(Value::Long(2_147_483_648)));
    }

    #[test]
    fn smallest_fit_honors_the_operand_rank_floor() {
        // A small value still lands at long when an operand was long.
        let got = smart_promote(Wide::Int(5), PromoteKind::Signed, true, RANK_LONG, false);
        assert_eq!(got, Some(Value::Long(5)));
    }

    #[test]
    fn smallest_fit_unsigned_chain() {
        let got = smart_promote(Wide::Uint(7), PromoteKind::BothUnsigned, true, RANK_UINT, false);
        assert_eq!(got, Some(Value::Uint(7)));

        // One past u32::MAX.
        let got = smart_promote(
            Wide::Uint(4_294_967_296),
            PromoteKind::BothUnsigned,
            true,
            RANK_UINT,
            false,
        );
        assert_eq!(got, Some(Value::Ulong(4_294_967_296)));
    }

    #[test]
    fn fractional_results_fall_through_to_floating() {
        let got = smart_promote(Wide::Real(3.5), PromoteKind::Signed, true, RANK_INT, false);
        assert_eq!(got, Some(Value::Float(3.5)));

        // 0.1 is not exact in f32, so the walk continues to double.
        let got = smart_promote(Wide::Real(0.1), PromoteKind::HasFloat, true, RANK_FLOAT, false);
        assert_eq!(got, Some(Value::Double(0.1)));
    }

    #[test]
    fn integral_real_results_refit_integral_tags() {
        // Division recovers an integral tag when the quotient is whole.
        let got = smart_promote(Wide::Real(3.0), PromoteKind::Signed, true, RANK_INT, false);
        assert_eq!(got, Some(Value::Int(3)));
    }

    // ==== smart promotion, fixed defaults ====

    #[test]
    fn fixed_defaults_per_kind() {
        let got = smart_promote(Wide::Int(5), PromoteKind::Signed, false, RANK_INT, false);
        assert_eq!(got, Some(Value::LongLong(5)));

        let got = smart_promote(Wide::Uint(5), PromoteKind::BothUnsigned, false, RANK_UINT, false);
        assert_eq!(got, Some(Value::UlongLong(5)));

        let got = smart_promote(Wide::Real(2.5), PromoteKind::HasFloat, false, RANK_LONG_DOUBLE, false);
        assert_eq!(got, Some(Value::Double(2.5)));
    }

    #[test]
    fn fixed_default_fall_through_lands_on_double() {
        let got = smart_promote(Wide::Real(3.5), PromoteKind::Signed, false, RANK_INT, false);
        assert_eq!(got, Some(Value::Double(3.5)));
    }

    // ==== subtraction sign rescue ====

    #[test]
    fn negative_unsigned_subtraction_switches_to_the_signed_chain() {
        let got = smart_promote(Wide::Int(-1), PromoteKind::BothUnsigned, true, RANK_UINT, true);
        assert_eq!(got, Some(Value::Int(-1)));

        let got = smart_promote(Wide::Int(-1), PromoteKind::BothUnsigned, false, RANK_UINT, true);
        assert_eq!(got, Some(Value::LongLong(-1)));
    }

    // ==== overflow ====

    #[test]
    fn non_finite_results_promote_to_nothing() {
        assert_eq!(
            smart_promote(Wide::Real(f64::INFINITY), PromoteKind::HasFloat, true, RANK_FLOAT, false),
            None
        );
        assert_eq!(
            smart_promote(Wide::Real(f64::NAN), PromoteKind::Signed, false, RANK_INT, false),
            None
        );
    }

    // ==== representability edges ====

    #[test]
    fn real_bounds_are_half_open() {
        // 2^31 does not fit i32 even though i32::MAX rounds up to it.
        assert_eq!(exact_i32(Wide::Real(2_147_483_648.0)), None);
        assert_eq!(exact_i32(Wide::Real(2_147_483_647.0)), Some(i32::MAX));
        assert_eq!(exact_i32(Wide::Real(-2_147_483_648.0)), Some(i32::MIN));
        assert_eq!(exact_u32(Wide::Real(U32_LIMIT)), None);
        assert_eq!(exact_u32(Wide::Real(U32_LIMIT - 1.0)), Some(u32::MAX));
    }

    #[test]
    fn fractional_reals_fit_no_integral_tag() {
        assert_eq!(exact_i64(Wide::Real(1.5)), None);
        assert_eq!(exact_u64(Wide::Real(1.5)), None);
    }
}
