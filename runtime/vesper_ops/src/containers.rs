//! Container algebra.
//!
//! Set-like kinds reuse their membership structure: hash sets go through
//! the std set operations, ordered sets through sorted two-pointer merges,
//! dicts through key filtering. Lists are sequences, so their bitwise
//! algebra is positional: `&` keeps left-ordered common elements, `|`
//! concatenates, `^` keeps what only one side has.
//!
//! Element identity inside containers comes in two strengths. Membership
//! uses the structural identity `Value` itself implements. The loose
//! helpers [`values_equal`] and [`values_cmp`] instead compare numeric
//! elements at their common type, which is what `==` over lists and dicts
//! means at the operator level.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use rustc_hash::FxHashSet;
use vesper_value::{unsupported_operands, OrderedSet, TypeTag, Value, ValueResult};

use crate::numeric::{is_numeric_operand, numeric_cmp, numeric_eq, CmpOp};

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

pub(crate) fn concat_lists(a: &[Value], b: &[Value]) -> Value {
    let mut out = Vec::with_capacity(a.len().saturating_add(b.len()));
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    Value::List(out)
}

/// Every occurrence of an element present anywhere in `b` is dropped.
pub(crate) fn list_difference(a: &[Value], b: &[Value]) -> Value {
    let exclude: FxHashSet<&Value> = b.iter().collect();
    Value::List(a.iter().filter(|v| !exclude.contains(*v)).cloned().collect())
}

/// Left-ordered elements also present in `b`, first occurrence only.
pub(crate) fn list_intersection(a: &[Value], b: &[Value]) -> Value {
    let keep: FxHashSet<&Value> = b.iter().collect();
    let mut seen: FxHashSet<&Value> = FxHashSet::default();
    let mut out = Vec::new();
    for v in a {
        if keep.contains(v) && seen.insert(v) {
            out.push(v.clone());
        }
    }
    Value::List(out)
}

/// Elements unique to each side, left block first. Occurrences survive.
pub(crate) fn list_symmetric_difference(a: &[Value], b: &[Value]) -> Value {
    let in_b: FxHashSet<&Value> = b.iter().collect();
    let in_a: FxHashSet<&Value> = a.iter().collect();
    let mut out: Vec<Value> = a.iter().filter(|v| !in_b.contains(*v)).cloned().collect();
    out.extend(b.iter().filter(|v| !in_a.contains(*v)).cloned());
    Value::List(out)
}

/// `None` when the repeated length has no valid allocation size; the
/// caller turns that into an overflow error with the operands in hand.
pub(crate) fn repeat_list(items: &[Value], count: i128) -> Option<Value> {
    let times = repeat_times(count)?;
    let total = repeat_len(items.len(), times, std::mem::size_of::<Value>())?;
    // An empty input repeats to empty without walking the count.
    if total == 0 {
        return Some(Value::List(Vec::new()));
    }
    let mut out = Vec::with_capacity(total);
    for _ in 0..times {
        out.extend_from_slice(items);
    }
    Some(Value::List(out))
}

/// Same length contract as [`repeat_list`].
pub(crate) fn repeat_string(s: &str, count: i128) -> Option<Value> {
    let times = repeat_times(count)?;
    let total = repeat_len(s.len(), times, 1)?;
    if total == 0 {
        return Some(Value::Str(String::new()));
    }
    let mut out = String::with_capacity(total);
    for _ in 0..times {
        out.push_str(s);
    }
    Some(Value::Str(out))
}

/// Non-positive counts mean an empty result; counts past `usize` have no
/// representable length.
fn repeat_times(count: i128) -> Option<usize> {
    if count <= 0 {
        Some(0)
    } else {
        usize::try_from(count).ok()
    }
}

/// Element count of `per_item * times`; `None` when the count or its byte
/// size leaves the `isize` allocation limit.
fn repeat_len(per_item: usize, times: usize, item_bytes: usize) -> Option<usize> {
    let total = per_item.checked_mul(times)?;
    let bytes = total.checked_mul(item_bytes)?;
    isize::try_from(bytes).ok().map(|_| total)
}

pub(crate) fn lists_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
}

fn cmp_lists(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        match values_cmp(x, y)? {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// Equality is loose and element-wise; ordering is lexicographic and
/// fails when a pair of elements has no defined order.
pub(crate) fn compare_lists(op: CmpOp, a: &[Value], b: &[Value]) -> ValueResult {
    let holds = match op {
        CmpOp::Eq => lists_equal(a, b),
        CmpOp::Ne => !lists_equal(a, b),
        _ => {
            let ord = cmp_lists(a, b)
                .ok_or_else(|| unsupported_operands(op.symbol(), TypeTag::List, TypeTag::List))?;
            op.holds(Some(ord))
        }
    };
    Ok(Value::Bool(holds))
}

// ---------------------------------------------------------------------------
// Hash sets
// ---------------------------------------------------------------------------

pub(crate) fn set_difference(a: &HashSet<Value>, b: &HashSet<Value>) -> Value {
    Value::Set(a.difference(b).cloned().collect())
}

pub(crate) fn set_intersection(a: &HashSet<Value>, b: &HashSet<Value>) -> Value {
    Value::Set(a.intersection(b).cloned().collect())
}

pub(crate) fn set_union(a: &HashSet<Value>, b: &HashSet<Value>) -> Value {
    Value::Set(a.union(b).cloned().collect())
}

pub(crate) fn set_symmetric_difference(a: &HashSet<Value>, b: &HashSet<Value>) -> Value {
    Value::Set(a.symmetric_difference(b).cloned().collect())
}

/// Ordering over sets is the subset relation; equality is membership
/// equality. Every operation is total, so no error path exists.
pub(crate) fn compare_sets(op: CmpOp, a: &HashSet<Value>, b: &HashSet<Value>) -> bool {
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        CmpOp::Le => a.is_subset(b),
        CmpOp::Lt => a.is_subset(b) && a.len() < b.len(),
        CmpOp::Ge => b.is_subset(a),
        CmpOp::Gt => b.is_subset(a) && b.len() < a.len(),
    }
}

// ---------------------------------------------------------------------------
// Ordered sets
// ---------------------------------------------------------------------------

#[derive(Copy, Clone)]
struct MergeKeep {
    left_only: bool,
    right_only: bool,
    both: bool,
}

/// Sorted two-pointer merge. Inputs are sorted and duplicate-free, so any
/// keep-mask yields a sorted duplicate-free output.
fn merge_ordered(a: &OrderedSet, b: &OrderedSet, keep: MergeKeep) -> OrderedSet {
    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();
    let mut out = Vec::with_capacity(a.len().saturating_add(b.len()));
    loop {
        let side = match (left.peek(), right.peek()) {
            (Some(x), Some(y)) => x.total_cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match side {
            Ordering::Less => {
                if let Some(v) = left.next() {
                    if keep.left_only {
                        out.push(v.clone());
                    }
                }
            }
            Ordering::Greater => {
                if let Some(v) = right.next() {
                    if keep.right_only {
                        out.push(v.clone());
                    }
                }
            }
            Ordering::Equal => {
                if let Some(v) = left.next() {
                    if keep.both {
                        out.push(v.clone());
                    }
                }
                right.next();
            }
        }
    }
    OrderedSet::from_sorted_vec(out)
}

pub(crate) fn ordered_set_difference(a: &OrderedSet, b: &OrderedSet) -> Value {
    Value::OrderedSet(merge_ordered(
        a,
        b,
        MergeKeep {
            left_only: true,
            right_only: false,
            both: false,
        },
    ))
}

pub(crate) fn ordered_set_intersection(a: &OrderedSet, b: &OrderedSet) -> Value {
    Value::OrderedSet(merge_ordered(
        a,
        b,
        MergeKeep {
            left_only: false,
            right_only: false,
            both: true,
        },
    ))
}

pub(crate) fn ordered_set_union(a: &OrderedSet, b: &OrderedSet) -> Value {
    Value::OrderedSet(merge_ordered(
        a,
        b,
        MergeKeep {
            left_only: true,
            right_only: true,
            both: true,
        },
    ))
}

pub(crate) fn ordered_set_symmetric_difference(a: &OrderedSet, b: &OrderedSet) -> Value {
    Value::OrderedSet(merge_ordered(
        a,
        b,
        MergeKeep {
            left_only: true,
            right_only: true,
            both: false,
        },
    ))
}

fn ordered_is_subset(a: &OrderedSet, b: &OrderedSet) -> bool {
    let mut right = b.iter();
    let mut current = right.next();
    for x in a {
        loop {
            match current {
                None => return false,
                Some(y) => match y.total_cmp(x) {
                    Ordering::Less => current = right.next(),
                    Ordering::Equal => break,
                    Ordering::Greater => return false,
                },
            }
        }
    }
    true
}

pub(crate) fn compare_ordered_sets(op: CmpOp, a: &OrderedSet, b: &OrderedSet) -> bool {
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        CmpOp::Le => ordered_is_subset(a, b),
        CmpOp::Lt => ordered_is_subset(a, b) && a.len() < b.len(),
        CmpOp::Ge => ordered_is_subset(b, a),
        CmpOp::Gt => ordered_is_subset(b, a) && b.len() < a.len(),
    }
}

// ---------------------------------------------------------------------------
// Dicts
// ---------------------------------------------------------------------------

pub(crate) fn dict_difference(a: &HashMap<String, Value>, b: &HashMap<String, Value>) -> Value {
    let out = a
        .iter()
        .filter(|(k, _)| !b.contains_key(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Dict(out)
}

/// Common keys keep the left side's values.
pub(crate) fn dict_intersection(a: &HashMap<String, Value>, b: &HashMap<String, Value>) -> Value {
    let out = a
        .iter()
        .filter(|(k, _)| b.contains_key(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Dict(out)
}

/// Union in which the right side's value wins on key collision.
pub(crate) fn dict_union(a: &HashMap<String, Value>, b: &HashMap<String, Value>) -> Value {
    let mut out = a.clone();
    out.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::Dict(out)
}

pub(crate) fn dicts_equal(a: &HashMap<String, Value>, b: &HashMap<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(k, v)| b.get(k).is_some_and(|w| values_equal(v, w)))
}

// ---------------------------------------------------------------------------
// Ordered dicts
// ---------------------------------------------------------------------------

pub(crate) fn ordered_dict_difference(
    a: &BTreeMap<String, Value>,
    b: &BTreeMap<String, Value>,
) -> Value {
    let out = a
        .iter()
        .filter(|(k, _)| !b.contains_key(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::OrderedDict(out)
}

/// Common keys keep the left side's values.
pub(crate) fn ordered_dict_intersection(
    a: &BTreeMap<String, Value>,
    b: &BTreeMap<String, Value>,
) -> Value {
    let out = a
        .iter()
        .filter(|(k, _)| b.contains_key(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::OrderedDict(out)
}

/// Union in which the right side's value wins on key collision.
pub(crate) fn ordered_dict_union(
    a: &BTreeMap<String, Value>,
    b: &BTreeMap<String, Value>,
) -> Value {
    let mut out = a.clone();
    out.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::OrderedDict(out)
}

fn ordered_dicts_equal(a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb))
}

fn cmp_ordered_dicts(
    a: &BTreeMap<String, Value>,
    b: &BTreeMap<String, Value>,
) -> Option<Ordering> {
    for ((ka, va), (kb, vb)) in a.iter().zip(b) {
        match ka.cmp(kb) {
            Ordering::Equal => {}
            other => return Some(other),
        }
        match values_cmp(va, vb)? {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// Lexicographic over `(key, value)` pairs in key order; shorter is less
/// when one is a prefix of the other.
pub(crate) fn compare_ordered_dicts(
    op: CmpOp,
    a: &BTreeMap<String, Value>,
    b: &BTreeMap<String, Value>,
) -> ValueResult {
    let holds = match op {
        CmpOp::Eq => ordered_dicts_equal(a, b),
        CmpOp::Ne => !ordered_dicts_equal(a, b),
        _ => {
            let ord = cmp_ordered_dicts(a, b).ok_or_else(|| {
                unsupported_operands(op.symbol(), TypeTag::OrderedDict, TypeTag::OrderedDict)
            })?;
            op.holds(Some(ord))
        }
    };
    Ok(Value::Bool(holds))
}

// ---------------------------------------------------------------------------
// Loose element identity
// ---------------------------------------------------------------------------

/// Element equality as the `==` operator sees it: numeric pairs meet at
/// their common type, `none` equals `none`, containers recurse.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    if is_numeric_operand(a.tag()) && is_numeric_operand(b.tag()) {
        return numeric_eq(a, b);
    }
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(x), Value::List(y)) => lists_equal(x, y),
        (Value::Set(x), Value::Set(y)) => x == y,
        (Value::OrderedSet(x), Value::OrderedSet(y)) => x == y,
        (Value::Dict(x), Value::Dict(y)) => dicts_equal(x, y),
        (Value::OrderedDict(x), Value::OrderedDict(y)) => ordered_dicts_equal(x, y),
        (Value::Graph(x), Value::Graph(y)) => x == y,
        _ => false,
    }
}

/// Element ordering as the comparison operators see it. `None` when the
/// pair has no defined order.
pub(crate) fn values_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    if is_numeric_operand(a.tag()) && is_numeric_operand(b.tag()) {
        return numeric_cmp(a, b);
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::List(x), Value::List(y)) => cmp_lists(x, y),
        _ => None,
    }
}
