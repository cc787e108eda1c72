//! Overflow policies and the integral arithmetic kernels behind them.
//!
//! A policy decides what happens when `add`/`sub`/`mul`/`mod` leave the
//! range of the common type the operands met at:
//!
//! - [`OverflowPolicy::Raw`] and [`OverflowPolicy::Wrap`] keep the common
//!   type and wrap in two's complement.
//! - [`OverflowPolicy::Throw`] reports an overflow the instant the true
//!   result is unrepresentable.
//! - [`OverflowPolicy::Promote`] computes the true result in a wide
//!   accumulator and hands it to
//!   [`smart_promote`](crate::promote::smart_promote) for retagging.
//!
//! Kernels come in one flavor per policy family and one function per
//! width. Widths up to 64 bits accumulate exactly in 128 bits; the
//! 128-bit kernels continue in floating point when even that overflows.

use crate::promote::Wide;

/// Out-of-range behavior for arithmetic kernels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Native machine behavior: two's complement wrap, no checks.
    #[default]
    Raw,
    /// Raise an overflow error on any unrepresentable true result.
    Throw,
    /// Explicitly requested two's complement wrap.
    Wrap,
    /// Widen the result tag until the true result fits.
    Promote,
}

impl OverflowPolicy {
    /// Lowercase policy name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Throw => "throw",
            Self::Wrap => "wrap",
            Self::Promote => "promote",
        }
    }
}

/// Arithmetic operations the integral kernels implement. Division is not
/// here: true division always runs in floating point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Sub,
    Mul,
    Mod,
}

impl ArithOp {
    pub(crate) const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Mod => "%",
        }
    }

    pub(crate) const fn is_subtraction(self) -> bool {
        matches!(self, Self::Sub)
    }
}

/// Failure of a kernel, mapped to a runtime error at the call site where
/// the operator symbol and operand values are known.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum KernelError {
    Overflow,
    ModuloByZero,
}

// ---------------------------------------------------------------------------
// Wrapping and checked kernels
// ---------------------------------------------------------------------------

macro_rules! wrapping_checked_kernels {
    ($($t:ty => ($wrapping:ident, $checked:ident)),* $(,)?) => {
        $(
            /// Two's complement arithmetic at this width.
            pub(crate) fn $wrapping(op: ArithOp, a: $t, b: $t) -> Result<$t, KernelError> {
                match op {
                    ArithOp::Add => Ok(a.wrapping_add(b)),
                    ArithOp::Sub => Ok(a.wrapping_sub(b)),
                    ArithOp::Mul => Ok(a.wrapping_mul(b)),
                    ArithOp::Mod => {
                        if b == 0 {
                            return Err(KernelError::ModuloByZero);
                        }
                        // Signed MIN % -1 wraps to 0, matching the checked kernel.
                        Ok(a.wrapping_rem(b))
                    }
                }
            }

            /// Arithmetic that reports any unrepresentable true result.
            pub(crate) fn $checked(op: ArithOp, a: $t, b: $t) -> Result<$t, KernelError> {
                let exact = match op {
                    ArithOp::Add => a.checked_add(b),
                    ArithOp::Sub => a.checked_sub(b),
                    ArithOp::Mul => a.checked_mul(b),
                    ArithOp::Mod => {
                        if b == 0 {
                            return Err(KernelError::ModuloByZero);
                        }
                        // MIN % -1 is mathematically 0 and never an overflow.
                        return Ok(a.wrapping_rem(b));
                    }
                };
                exact.ok_or(KernelError::Overflow)
            }
        )*
    };
}

wrapping_checked_kernels! {
    i32 => (wrapping_i32, checked_i32),
    u32 => (wrapping_u32, checked_u32),
    i64 => (wrapping_i64, checked_i64),
    u64 => (wrapping_u64, checked_u64),
    i128 => (wrapping_i128, checked_i128),
    u128 => (wrapping_u128, checked_u128),
}

// ---------------------------------------------------------------------------
// Widening kernels
// ---------------------------------------------------------------------------

macro_rules! widening_signed_kernels {
    ($($t:ty => $name:ident),* $(,)?) => {
        $(
            /// Exact arithmetic in a 128-bit accumulator.
            pub(crate) fn $name(op: ArithOp, a: $t, b: $t) -> Result<Wide, KernelError> {
                let a = i128::from(a);
                let b = i128::from(b);
                match op {
                    ArithOp::Add => Ok(Wide::Int(a.wrapping_add(b))),
                    ArithOp::Sub => Ok(Wide::Int(a.wrapping_sub(b))),
                    ArithOp::Mul => Ok(Wide::Int(a.wrapping_mul(b))),
                    ArithOp::Mod => {
                        if b == 0 {
                            return Err(KernelError::ModuloByZero);
                        }
                        Ok(Wide::Int(a.wrapping_rem(b)))
                    }
                }
            }
        )*
    };
}

macro_rules! widening_unsigned_kernels {
    ($($t:ty => $name:ident),* $(,)?) => {
        $(
            /// Exact arithmetic in a 128-bit accumulator. Subtraction may
            /// produce a signed wide result.
            pub(crate) fn $name(op: ArithOp, a: $t, b: $t) -> Result<Wide, KernelError> {
                let a = u128::from(a);
                let b = u128::from(b);
                match op {
                    ArithOp::Add => Ok(Wide::Uint(a.wrapping_add(b))),
                    ArithOp::Sub => Ok(signed_difference(a, b)),
                    ArithOp::Mul => Ok(Wide::Uint(a.wrapping_mul(b))),
                    ArithOp::Mod => {
                        if b == 0 {
                            return Err(KernelError::ModuloByZero);
                        }
                        Ok(Wide::Uint(a.wrapping_rem(b)))
                    }
                }
            }
        )*
    };
}

widening_signed_kernels! {
    i32 => wide_i32,
    i64 => wide_i64,
}

widening_unsigned_kernels! {
    u32 => wide_u32,
    u64 => wide_u64,
}

/// Exact signed 128-bit arithmetic, continuing in floating point when the
/// accumulator itself overflows.
pub(crate) fn wide_i128(op: ArithOp, a: i128, b: i128) -> Result<Wide, KernelError> {
    let exact = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Mod => {
            if b == 0 {
                return Err(KernelError::ModuloByZero);
            }
            return Ok(Wide::Int(a.wrapping_rem(b)));
        }
    };
    match exact {
        Some(v) => Ok(Wide::Int(v)),
        None => {
            tracing::trace!(
                op = op.symbol(),
                "128-bit accumulator overflowed; continuing in floating point"
            );
            let fa = a as f64;
            let fb = b as f64;
            let v = match op {
                ArithOp::Add => fa + fb,
                ArithOp::Sub => fa - fb,
                ArithOp::Mul => fa * fb,
                ArithOp::Mod => fa % fb,
            };
            Ok(Wide::Real(v))
        }
    }
}

/// Exact unsigned 128-bit arithmetic, continuing in floating point when
/// the accumulator itself overflows.
pub(crate) fn wide_u128(op: ArithOp, a: u128, b: u128) -> Result<Wide, KernelError> {
    let exact = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => return Ok(signed_difference(a, b)),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Mod => {
            if b == 0 {
                return Err(KernelError::ModuloByZero);
            }
            return Ok(Wide::Uint(a.wrapping_rem(b)));
        }
    };
    match exact {
        Some(v) => Ok(Wide::Uint(v)),
        None => {
            tracing::trace!(
                op = op.symbol(),
                "128-bit accumulator overflowed; continuing in floating point"
            );
            let fa = a as f64;
            let fb = b as f64;
            let v = match op {
                ArithOp::Add => fa + fb,
                ArithOp::Sub | ArithOp::Mod => fa,
                ArithOp::Mul => fa * fb,
            };
            Ok(Wide::Real(v))
        }
    }
}

/// `a - b` over unsigned wides. Magnitudes up to 2^127 stay exact on the
/// signed side; anything larger continues in floating point.
fn signed_difference(a: u128, b: u128) -> Wide {
    if a >= b {
        return Wide::Uint(a.wrapping_sub(b));
    }
    let magnitude = b.wrapping_sub(a);
    if magnitude <= i128::MIN.unsigned_abs() {
        Wide::Int((magnitude as i128).wrapping_neg())
    } else {
        Wide::Real(-(magnitude as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==== wrapping kernels ====

    #[test]
    fn wrapping_kernels_wrap_in_twos_complement() {
        assert_eq!(wrapping_i32(ArithOp::Add, i32::MAX, 1), Ok(i32::MIN));
        assert_eq!(wrapping_u32(ArithOp::Sub, 0, 1), Ok(u32::MAX));
        assert_eq!(wrapping_i64(ArithOp::Mul, i64::MAX, 2), Ok(-2));
    }

    #[test]
    fn wrapping_min_modulo_minus_one_is_zero() {
        assert_eq!(wrapping_i32(ArithOp::Mod, i32::MIN, -1), Ok(0));
        assert_eq!(wrapping_i128(ArithOp::Mod, i128::MIN, -1), Ok(0));
    }

    // ==== checked kernels ====

    #[test]
    fn checked_kernels_report_overflow() {
        assert_eq!(
            checked_i32(ArithOp::Mul, i32::MAX, 2),
            Err(KernelError::Overflow)
        );
        assert_eq!(
            checked_u64(ArithOp::Sub, 0, 1),
            Err(KernelError::Overflow)
        );
        assert_eq!(checked_i32(ArithOp::Add, 1, 2), Ok(3));
    }

    #[test]
    fn checked_min_modulo_minus_one_is_zero() {
        assert_eq!(checked_i64(ArithOp::Mod, i64::MIN, -1), Ok(0));
    }

    #[test]
    fn modulo_by_zero_is_reported_by_every_kernel_flavor() {
        assert_eq!(
            wrapping_i64(ArithOp::Mod, 5, 0),
            Err(KernelError::ModuloByZero)
        );
        assert_eq!(
            checked_u32(ArithOp::Mod, 5, 0),
            Err(KernelError::ModuloByZero)
        );
        assert_eq!(
            wide_i32(ArithOp::Mod, 5, 0),
            Err(KernelError::ModuloByZero)
        );
        assert_eq!(
            wide_u128(ArithOp::Mod, 5, 0),
            Err(KernelError::ModuloByZero)
        );
    }

    // ==== widening kernels ====

    #[test]
    fn widening_keeps_products_exact() {
        // (2^31 - 1)^2
        assert_eq!(
            wide_i32(ArithOp::Mul, i32::MAX, i32::MAX),
            Ok(Wide::Int(4_611_686_014_132_420_609))
        );
        // (2^64 - 1)^2 needs the unsigned accumulator.
        assert_eq!(
            wide_u64(ArithOp::Mul, u64::MAX, u64::MAX),
            Ok(Wide::Uint(340_282_366_920_938_463_426_481_119_284_349_108_225))
        );
    }

    #[test]
    fn unsigned_widening_subtraction_goes_signed() {
        assert_eq!(wide_u32(ArithOp::Sub, 2, 5), Ok(Wide::Int(-3)));
        assert_eq!(wide_u64(ArithOp::Sub, 5, 2), Ok(Wide::Uint(3)));
    }

    #[test]
    fn accumulator_overflow_continues_in_floating_point() {
        let expected = (i128::MAX as f64) + (i128::MAX as f64);
        assert_eq!(
            wide_i128(ArithOp::Add, i128::MAX, i128::MAX),
            Ok(Wide::Real(expected))
        );

        let expected = (u128::MAX as f64) * 2.0;
        assert_eq!(
            wide_u128(ArithOp::Mul, u128::MAX, 2),
            Ok(Wide::Real(expected))
        );
    }

    #[test]
    fn huge_unsigned_differences_continue_in_floating_point() {
        let got = signed_difference(0, u128::MAX);
        assert_eq!(got, Wide::Real(-(u128::MAX as f64)));
    }

    #[test]
    fn policy_names() {
        assert_eq!(OverflowPolicy::Raw.name(), "raw");
        assert_eq!(OverflowPolicy::Promote.name(), "promote");
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Raw);
    }
}
