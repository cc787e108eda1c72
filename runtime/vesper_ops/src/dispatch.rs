//! Operator dispatch over tag pairs.
//!
//! Each matrix operator owns an immutable 18 × 18 table of handler
//! pointers, one cell per `(left tag, right tag)` pair. The tables are
//! built once on first use and a lookup is two array indexes. No cell is
//! empty: pairs without semantics hold a handler that raises a type error
//! naming the operator and both tags.
//!
//! Handlers are grouped by operand category rather than written per cell.
//! [`classify`] is an exhaustive match from `(operator, tag, tag)` to the
//! category handler, so adding a tag or an operator fails to compile until
//! every combination is placed.

use std::sync::OnceLock;

use vesper_value::overflow as overflow_error;
use vesper_value::{unsupported_operands, TypeTag, Value, ValueResult, ALL_TAGS, TAG_COUNT};

use crate::containers;
use crate::logical;
use crate::numeric::{self, is_integral_operand, is_numeric_operand, BitOp, CmpOp, ShiftOp};
use crate::operator::{Operator, MATRIX_OP_COUNT};
use crate::overflow::{ArithOp, OverflowPolicy};

/// One dispatch cell. Every handler has the full engine signature even
/// when it ignores the policy and fit flags.
pub type Handler = fn(&Value, &Value, OverflowPolicy, bool) -> ValueResult;

// ---------------------------------------------------------------------------
// Numeric handlers
// ---------------------------------------------------------------------------

fn add_numeric(
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    numeric::arith(ArithOp::Add, left, right, policy, smallest_fit)
}

fn sub_numeric(
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    numeric::arith(ArithOp::Sub, left, right, policy, smallest_fit)
}

fn mul_numeric(
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    numeric::arith(ArithOp::Mul, left, right, policy, smallest_fit)
}

fn div_numeric(
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    numeric::divide(left, right, policy, smallest_fit)
}

fn mod_numeric(
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    numeric::arith(ArithOp::Mod, left, right, policy, smallest_fit)
}

fn shl_integral(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    numeric::shift(ShiftOp::Left, left, right)
}

fn shr_integral(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    numeric::shift(ShiftOp::Right, left, right)
}

// ---------------------------------------------------------------------------
// Concatenation and repetition
// ---------------------------------------------------------------------------

/// String concatenation; a boolean side stringifies through its display
/// form, `True`/`False`.
fn add_strings(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
        (Value::Str(_), Value::Bool(_)) | (Value::Bool(_), Value::Str(_)) => {
            Ok(Value::Str(format!("{left}{right}")))
        }
        _ => Err(unsupported_operands("+", left.tag(), right.tag())),
    }
}

fn add_lists(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::List(a), Value::List(b)) => Ok(containers::concat_lists(a, b)),
        _ => Err(unsupported_operands("+", left.tag(), right.tag())),
    }
}

/// Repetition count from an integral operand. Booleans and floats are not
/// counts.
fn repeat_count(value: &Value) -> Option<i128> {
    match value {
        Value::Int(v) => Some(i128::from(*v)),
        Value::Uint(v) => Some(i128::from(*v)),
        Value::Long(v) => Some(i128::from(*v)),
        Value::Ulong(v) => Some(i128::from(*v)),
        Value::LongLong(v) => Some(*v),
        // Saturates; any count this size already fails the length check.
        Value::UlongLong(v) => Some(i128::try_from(*v).unwrap_or(i128::MAX)),
        _ => None,
    }
}

fn mul_string_repeat(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::Str(s), count) | (count, Value::Str(s)) => {
            let count = repeat_count(count)
                .ok_or_else(|| unsupported_operands("*", left.tag(), right.tag()))?;
            containers::repeat_string(s, count).ok_or_else(|| overflow_error("*", left, right))
        }
        _ => Err(unsupported_operands("*", left.tag(), right.tag())),
    }
}

fn mul_list_repeat(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::List(items), count) | (count, Value::List(items)) => {
            let count = repeat_count(count)
                .ok_or_else(|| unsupported_operands("*", left.tag(), right.tag()))?;
            containers::repeat_list(items, count).ok_or_else(|| overflow_error("*", left, right))
        }
        _ => Err(unsupported_operands("*", left.tag(), right.tag())),
    }
}

// ---------------------------------------------------------------------------
// Subtraction over containers
// ---------------------------------------------------------------------------

fn sub_lists(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::List(a), Value::List(b)) => Ok(containers::list_difference(a, b)),
        _ => Err(unsupported_operands("-", left.tag(), right.tag())),
    }
}

fn sub_sets(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::Set(a), Value::Set(b)) => Ok(containers::set_difference(a, b)),
        _ => Err(unsupported_operands("-", left.tag(), right.tag())),
    }
}

fn sub_ordered_sets(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::OrderedSet(a), Value::OrderedSet(b)) => {
            Ok(containers::ordered_set_difference(a, b))
        }
        _ => Err(unsupported_operands("-", left.tag(), right.tag())),
    }
}

fn sub_dicts(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::Dict(a), Value::Dict(b)) => Ok(containers::dict_difference(a, b)),
        _ => Err(unsupported_operands("-", left.tag(), right.tag())),
    }
}

fn sub_ordered_dicts(
    left: &Value,
    right: &Value,
    _policy: OverflowPolicy,
    _smallest_fit: bool,
) -> ValueResult {
    match (left, right) {
        (Value::OrderedDict(a), Value::OrderedDict(b)) => {
            Ok(containers::ordered_dict_difference(a, b))
        }
        _ => Err(unsupported_operands("-", left.tag(), right.tag())),
    }
}

// ---------------------------------------------------------------------------
// Comparison handlers
// ---------------------------------------------------------------------------

fn compare_values(op: CmpOp, left: &Value, right: &Value) -> ValueResult {
    if is_numeric_operand(left.tag()) && is_numeric_operand(right.tag()) {
        return numeric::compare(op, left, right);
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(op.holds(Some(a.cmp(b))))),
        (Value::List(a), Value::List(b)) => containers::compare_lists(op, a, b),
        (Value::Set(a), Value::Set(b)) => Ok(Value::Bool(containers::compare_sets(op, a, b))),
        (Value::OrderedSet(a), Value::OrderedSet(b)) => {
            Ok(Value::Bool(containers::compare_ordered_sets(op, a, b)))
        }
        // Unordered dicts only answer equality.
        (Value::Dict(a), Value::Dict(b)) => match op {
            CmpOp::Eq => Ok(Value::Bool(containers::dicts_equal(a, b))),
            CmpOp::Ne => Ok(Value::Bool(!containers::dicts_equal(a, b))),
            _ => Err(unsupported_operands(op.symbol(), left.tag(), right.tag())),
        },
        (Value::OrderedDict(a), Value::OrderedDict(b)) => {
            containers::compare_ordered_dicts(op, a, b)
        }
        _ => Err(unsupported_operands(op.symbol(), left.tag(), right.tag())),
    }
}

macro_rules! cmp_handlers {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            fn $name(
                left: &Value,
                right: &Value,
                _policy: OverflowPolicy,
                _smallest_fit: bool,
            ) -> ValueResult {
                compare_values(CmpOp::$op, left, right)
            }
        )*
    };
}

cmp_handlers! {
    cmp_eq => Eq,
    cmp_ne => Ne,
    cmp_gt => Gt,
    cmp_ge => Ge,
    cmp_lt => Lt,
    cmp_le => Le,
}

fn comparison_supported(op: CmpOp, left: TypeTag, right: TypeTag) -> bool {
    if is_numeric_operand(left) && is_numeric_operand(right) {
        return true;
    }
    match (left, right) {
        (TypeTag::Str, TypeTag::Str)
        | (TypeTag::List, TypeTag::List)
        | (TypeTag::Set, TypeTag::Set)
        | (TypeTag::OrderedSet, TypeTag::OrderedSet)
        | (TypeTag::OrderedDict, TypeTag::OrderedDict) => true,
        (TypeTag::Dict, TypeTag::Dict) => matches!(op, CmpOp::Eq | CmpOp::Ne),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Bitwise handlers
// ---------------------------------------------------------------------------

fn bitwise_values(op: BitOp, left: &Value, right: &Value) -> ValueResult {
    if is_integral_operand(left.tag()) && is_integral_operand(right.tag()) {
        return numeric::bitwise(op, left, right);
    }
    match (left, right) {
        (Value::Set(a), Value::Set(b)) => Ok(match op {
            BitOp::And => containers::set_intersection(a, b),
            BitOp::Or => containers::set_union(a, b),
            BitOp::Xor => containers::set_symmetric_difference(a, b),
        }),
        (Value::OrderedSet(a), Value::OrderedSet(b)) => Ok(match op {
            BitOp::And => containers::ordered_set_intersection(a, b),
            BitOp::Or => containers::ordered_set_union(a, b),
            BitOp::Xor => containers::ordered_set_symmetric_difference(a, b),
        }),
        // Lists are sequences: `|` concatenates and keeps duplicates.
        (Value::List(a), Value::List(b)) => Ok(match op {
            BitOp::And => containers::list_intersection(a, b),
            BitOp::Or => containers::concat_lists(a, b),
            BitOp::Xor => containers::list_symmetric_difference(a, b),
        }),
        (Value::Dict(a), Value::Dict(b)) => match op {
            BitOp::And => Ok(containers::dict_intersection(a, b)),
            BitOp::Or => Ok(containers::dict_union(a, b)),
            BitOp::Xor => Err(unsupported_operands("^", left.tag(), right.tag())),
        },
        (Value::OrderedDict(a), Value::OrderedDict(b)) => match op {
            BitOp::And => Ok(containers::ordered_dict_intersection(a, b)),
            BitOp::Or => Ok(containers::ordered_dict_union(a, b)),
            BitOp::Xor => Err(unsupported_operands("^", left.tag(), right.tag())),
        },
        _ => Err(unsupported_operands(op.symbol(), left.tag(), right.tag())),
    }
}

macro_rules! bit_handlers {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            fn $name(
                left: &Value,
                right: &Value,
                _policy: OverflowPolicy,
                _smallest_fit: bool,
            ) -> ValueResult {
                bitwise_values(BitOp::$op, left, right)
            }
        )*
    };
}

bit_handlers! {
    bit_and => And,
    bit_or => Or,
    bit_xor => Xor,
}

fn bitwise_supported(op: BitOp, left: TypeTag, right: TypeTag) -> bool {
    if is_integral_operand(left) && is_integral_operand(right) {
        return true;
    }
    match (left, right) {
        (TypeTag::Set, TypeTag::Set)
        | (TypeTag::OrderedSet, TypeTag::OrderedSet)
        | (TypeTag::List, TypeTag::List) => true,
        (TypeTag::Dict, TypeTag::Dict) | (TypeTag::OrderedDict, TypeTag::OrderedDict) => {
            matches!(op, BitOp::And | BitOp::Or)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Unsupported cells
// ---------------------------------------------------------------------------

macro_rules! unsupported_handlers {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            fn $name(
                left: &Value,
                right: &Value,
                _policy: OverflowPolicy,
                _smallest_fit: bool,
            ) -> ValueResult {
                Err(unsupported_operands(
                    Operator::$op.as_symbol(),
                    left.tag(),
                    right.tag(),
                ))
            }
        )*
    };
}

unsupported_handlers! {
    unsupported_add => Add,
    unsupported_sub => Sub,
    unsupported_mul => Mul,
    unsupported_div => Div,
    unsupported_mod => Mod,
    unsupported_eq => Eq,
    unsupported_ne => NotEq,
    unsupported_gt => Gt,
    unsupported_ge => GtEq,
    unsupported_lt => Lt,
    unsupported_le => LtEq,
    unsupported_band => BitAnd,
    unsupported_bor => BitOr,
    unsupported_bxor => BitXor,
    unsupported_shl => Shl,
    unsupported_shr => Shr,
    unsupported_and => And,
    unsupported_or => Or,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// True when the pair is `string × integral` or `list × integral` in
/// either order.
fn repeat_pair(left: TypeTag, right: TypeTag, sequence: TypeTag) -> bool {
    (left == sequence && right.is_integral()) || (left.is_integral() && right == sequence)
}

/// Places the handler for one cell of one operator's table.
fn classify(op: Operator, left: TypeTag, right: TypeTag) -> Handler {
    let numeric = is_numeric_operand(left) && is_numeric_operand(right);
    match op {
        Operator::Add => {
            if numeric {
                add_numeric
            } else {
                match (left, right) {
                    (TypeTag::Str, TypeTag::Str | TypeTag::Bool)
                    | (TypeTag::Bool, TypeTag::Str) => add_strings,
                    (TypeTag::List, TypeTag::List) => add_lists,
                    _ => unsupported_add,
                }
            }
        }
        Operator::Sub => {
            if numeric {
                sub_numeric
            } else {
                match (left, right) {
                    (TypeTag::List, TypeTag::List) => sub_lists,
                    (TypeTag::Set, TypeTag::Set) => sub_sets,
                    (TypeTag::OrderedSet, TypeTag::OrderedSet) => sub_ordered_sets,
                    (TypeTag::Dict, TypeTag::Dict) => sub_dicts,
                    (TypeTag::OrderedDict, TypeTag::OrderedDict) => sub_ordered_dicts,
                    _ => unsupported_sub,
                }
            }
        }
        Operator::Mul => {
            if numeric {
                mul_numeric
            } else if repeat_pair(left, right, TypeTag::Str) {
                mul_string_repeat
            } else if repeat_pair(left, right, TypeTag::List) {
                mul_list_repeat
            } else {
                unsupported_mul
            }
        }
        Operator::Div => {
            if numeric {
                div_numeric
            } else {
                unsupported_div
            }
        }
        Operator::Mod => {
            if numeric {
                mod_numeric
            } else {
                unsupported_mod
            }
        }
        Operator::Eq => {
            if comparison_supported(CmpOp::Eq, left, right) {
                cmp_eq
            } else {
                unsupported_eq
            }
        }
        Operator::NotEq => {
            if comparison_supported(CmpOp::Ne, left, right) {
                cmp_ne
            } else {
                unsupported_ne
            }
        }
        Operator::Gt => {
            if comparison_supported(CmpOp::Gt, left, right) {
                cmp_gt
            } else {
                unsupported_gt
            }
        }
        Operator::GtEq => {
            if comparison_supported(CmpOp::Ge, left, right) {
                cmp_ge
            } else {
                unsupported_ge
            }
        }
        Operator::Lt => {
            if comparison_supported(CmpOp::Lt, left, right) {
                cmp_lt
            } else {
                unsupported_lt
            }
        }
        Operator::LtEq => {
            if comparison_supported(CmpOp::Le, left, right) {
                cmp_le
            } else {
                unsupported_le
            }
        }
        Operator::BitAnd => {
            if bitwise_supported(BitOp::And, left, right) {
                bit_and
            } else {
                unsupported_band
            }
        }
        Operator::BitOr => {
            if bitwise_supported(BitOp::Or, left, right) {
                bit_or
            } else {
                unsupported_bor
            }
        }
        Operator::BitXor => {
            if bitwise_supported(BitOp::Xor, left, right) {
                bit_xor
            } else {
                unsupported_bxor
            }
        }
        Operator::Shl => {
            if is_integral_operand(left) && is_integral_operand(right) {
                shl_integral
            } else {
                unsupported_shl
            }
        }
        Operator::Shr => {
            if is_integral_operand(left) && is_integral_operand(right) {
                shr_integral
            } else {
                unsupported_shr
            }
        }
        // Short-circuit operators never own a table; these cells exist only
        // to keep the match total.
        Operator::And => unsupported_and,
        Operator::Or => unsupported_or,
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Complete handler matrix for one operator.
pub struct DispatchTable {
    cells: [[Handler; TAG_COUNT]; TAG_COUNT],
}

impl DispatchTable {
    fn new(op: Operator) -> Self {
        let cells: [[Handler; TAG_COUNT]; TAG_COUNT] = std::array::from_fn(|l| {
            std::array::from_fn(|r| classify(op, ALL_TAGS[l], ALL_TAGS[r]))
        });
        DispatchTable { cells }
    }

    #[inline]
    pub fn lookup(&self, left: TypeTag, right: TypeTag) -> Handler {
        self.cells[left.index()][right.index()]
    }
}

static TABLES: OnceLock<[DispatchTable; MATRIX_OP_COUNT]> = OnceLock::new();

/// All per-operator tables, built on first use and immutable afterwards.
fn tables() -> &'static [DispatchTable; MATRIX_OP_COUNT] {
    TABLES.get_or_init(|| {
        tracing::debug!(
            operators = MATRIX_OP_COUNT,
            tags = TAG_COUNT,
            "building dispatch tables"
        );
        std::array::from_fn(|i| DispatchTable::new(Operator::MATRIX[i]))
    })
}

/// The table owned by a matrix operator, `None` for the short-circuit
/// operators. Callers applying one operator in a loop can hoist the table
/// and skip the per-call routing.
pub fn table_for(op: Operator) -> Option<&'static DispatchTable> {
    let index = op.matrix_index()?;
    Some(&tables()[index])
}

/// The handler a tag pair resolves to, `None` only for the short-circuit
/// operators, which have no matrix.
pub fn handler_for(op: Operator, left: TypeTag, right: TypeTag) -> Option<Handler> {
    Some(table_for(op)?.lookup(left, right))
}

/// Applies a binary operator to two evaluated operands.
///
/// Matrix operators go through the table lookup; `&&` and `||` coerce both
/// sides to booleans, since short-circuiting is the caller's concern.
pub fn evaluate(
    op: Operator,
    left: &Value,
    right: &Value,
    policy: OverflowPolicy,
    smallest_fit: bool,
) -> ValueResult {
    if let Some(value) = logical::apply(op, left, right) {
        return Ok(value);
    }
    let handler = handler_for(op, left.tag(), right.tag())
        .ok_or_else(|| unsupported_operands(op.as_symbol(), left.tag(), right.tag()))?;
    handler(left, right, policy, smallest_fit)
}

// ---------------------------------------------------------------------------
// Per-operator surface
// ---------------------------------------------------------------------------

macro_rules! operator_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(
                left: &Value,
                right: &Value,
                policy: OverflowPolicy,
                smallest_fit: bool,
            ) -> ValueResult {
                evaluate(Operator::$op, left, right, policy, smallest_fit)
            }
        )*
    };
}

operator_fns! {
    add => Add,
    sub => Sub,
    mul => Mul,
    div => Div,
    modulo => Mod,
    eq => Eq,
    ne => NotEq,
    gt => Gt,
    ge => GtEq,
    lt => Lt,
    le => LtEq,
    bitand => BitAnd,
    bitor => BitOr,
    bitxor => BitXor,
    shl => Shl,
    shr => Shr,
}
