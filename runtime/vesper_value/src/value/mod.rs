//! The Vesper runtime value.
//!
//! `Value` owns its payload directly: cloning a list/set/dict Value
//! deep-copies the container, so no two Values ever alias storage.
//!
//! Two identity relations coexist and must not be confused:
//!
//! - **Structural identity** (`PartialEq`/`Eq`/`Hash`, [`Value::total_cmp`]):
//!   tag-sensitive, floats by bit pattern. This is what containers use for
//!   membership and what keeps `Hash` coherent with `Eq`.
//! - **Operator-level equality/ordering**: numeric-aware, defined by the
//!   operator engine in `vesper_ops` via common-type conversion.

mod graph;
mod ordered_set;

pub use graph::Graph;
pub use ordered_set::OrderedSet;

use crate::errors::{type_mismatch, ValueResult};
use crate::tag::TypeTag;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Tagged-union runtime datum. Exactly one payload, matching the tag.
#[derive(Clone, Debug)]
pub enum Value {
    None,
    // Numeric
    Int(i32),
    Float(f32),
    Double(f64),
    Long(i64),
    LongLong(i128),
    /// Platforms this runtime targets give `long double` the same width as
    /// `double`; the tag stays distinct and keeps its own promotion rank.
    LongDouble(f64),
    Uint(u32),
    Ulong(u64),
    UlongLong(u128),
    // Scalar
    Bool(bool),
    Str(String),
    // Containers
    List(Vec<Value>),
    Set(HashSet<Value>),
    Dict(HashMap<String, Value>),
    OrderedSet(OrderedSet),
    OrderedDict(BTreeMap<String, Value>),
    // Reserved
    Graph(Graph),
}

// Factory constructors

impl Value {
    pub fn int(n: i32) -> Value {
        Value::Int(n)
    }

    pub fn uint(n: u32) -> Value {
        Value::Uint(n)
    }

    pub fn long(n: i64) -> Value {
        Value::Long(n)
    }

    pub fn ulong(n: u64) -> Value {
        Value::Ulong(n)
    }

    pub fn long_long(n: i128) -> Value {
        Value::LongLong(n)
    }

    pub fn ulong_long(n: u128) -> Value {
        Value::UlongLong(n)
    }

    pub fn float(n: f32) -> Value {
        Value::Float(n)
    }

    pub fn double(n: f64) -> Value {
        Value::Double(n)
    }

    pub fn long_double(n: f64) -> Value {
        Value::LongDouble(n)
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn list(items: impl Into<Vec<Value>>) -> Value {
        Value::List(items.into())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Set(items.into_iter().collect())
    }

    pub fn dict(entries: impl IntoIterator<Item = (String, Value)>) -> Value {
        Value::Dict(entries.into_iter().collect())
    }

    pub fn ordered_set(items: impl IntoIterator<Item = Value>) -> Value {
        Value::OrderedSet(OrderedSet::from_iter(items))
    }

    pub fn ordered_dict(entries: impl IntoIterator<Item = (String, Value)>) -> Value {
        Value::OrderedDict(entries.into_iter().collect())
    }

    pub fn graph(g: Graph) -> Value {
        Value::Graph(g)
    }
}

// Tag queries and payload extraction

impl Value {
    /// The tag identifying the active payload.
    pub const fn tag(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::None,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
            Value::Long(_) => TypeTag::Long,
            Value::LongLong(_) => TypeTag::LongLong,
            Value::LongDouble(_) => TypeTag::LongDouble,
            Value::Uint(_) => TypeTag::Uint,
            Value::Ulong(_) => TypeTag::Ulong,
            Value::UlongLong(_) => TypeTag::UlongLong,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Set(_) => TypeTag::Set,
            Value::Dict(_) => TypeTag::Dict,
            Value::OrderedSet(_) => TypeTag::OrderedSet,
            Value::OrderedDict(_) => TypeTag::OrderedDict,
            Value::Graph(_) => TypeTag::Graph,
        }
    }

    /// Surface-level name of the active tag.
    pub const fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Read an `int` payload. Booleans read as 0/1; any other tag is a
    /// type mismatch.
    pub fn as_int(&self) -> ValueResult<i32> {
        match self {
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(i32::from(*b)),
            other => Err(type_mismatch(TypeTag::Int, other.tag())),
        }
    }

    pub fn as_uint(&self) -> ValueResult<u32> {
        match self {
            Value::Uint(n) => Ok(*n),
            Value::Bool(b) => Ok(u32::from(*b)),
            other => Err(type_mismatch(TypeTag::Uint, other.tag())),
        }
    }

    pub fn as_long(&self) -> ValueResult<i64> {
        match self {
            Value::Long(n) => Ok(*n),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => Err(type_mismatch(TypeTag::Long, other.tag())),
        }
    }

    pub fn as_ulong(&self) -> ValueResult<u64> {
        match self {
            Value::Ulong(n) => Ok(*n),
            Value::Bool(b) => Ok(u64::from(*b)),
            other => Err(type_mismatch(TypeTag::Ulong, other.tag())),
        }
    }

    pub fn as_long_long(&self) -> ValueResult<i128> {
        match self {
            Value::LongLong(n) => Ok(*n),
            Value::Bool(b) => Ok(i128::from(*b)),
            other => Err(type_mismatch(TypeTag::LongLong, other.tag())),
        }
    }

    pub fn as_ulong_long(&self) -> ValueResult<u128> {
        match self {
            Value::UlongLong(n) => Ok(*n),
            Value::Bool(b) => Ok(u128::from(*b)),
            other => Err(type_mismatch(TypeTag::UlongLong, other.tag())),
        }
    }

    pub fn as_float(&self) -> ValueResult<f32> {
        match self {
            Value::Float(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(type_mismatch(TypeTag::Float, other.tag())),
        }
    }

    pub fn as_double(&self) -> ValueResult<f64> {
        match self {
            Value::Double(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(type_mismatch(TypeTag::Double, other.tag())),
        }
    }

    pub fn as_long_double(&self) -> ValueResult<f64> {
        match self {
            Value::LongDouble(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(type_mismatch(TypeTag::LongDouble, other.tag())),
        }
    }

    pub fn as_bool(&self) -> ValueResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch(TypeTag::Bool, other.tag())),
        }
    }

    pub fn as_str(&self) -> ValueResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(type_mismatch(TypeTag::Str, other.tag())),
        }
    }

    pub fn as_list(&self) -> ValueResult<&Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(type_mismatch(TypeTag::List, other.tag())),
        }
    }

    pub fn as_set(&self) -> ValueResult<&HashSet<Value>> {
        match self {
            Value::Set(items) => Ok(items),
            other => Err(type_mismatch(TypeTag::Set, other.tag())),
        }
    }

    pub fn as_dict(&self) -> ValueResult<&HashMap<String, Value>> {
        match self {
            Value::Dict(entries) => Ok(entries),
            other => Err(type_mismatch(TypeTag::Dict, other.tag())),
        }
    }

    pub fn as_ordered_set(&self) -> ValueResult<&OrderedSet> {
        match self {
            Value::OrderedSet(items) => Ok(items),
            other => Err(type_mismatch(TypeTag::OrderedSet, other.tag())),
        }
    }

    pub fn as_ordered_dict(&self) -> ValueResult<&BTreeMap<String, Value>> {
        match self {
            Value::OrderedDict(entries) => Ok(entries),
            other => Err(type_mismatch(TypeTag::OrderedDict, other.tag())),
        }
    }

    pub fn as_graph(&self) -> ValueResult<&Graph> {
        match self {
            Value::Graph(g) => Ok(g),
            other => Err(type_mismatch(TypeTag::Graph, other.tag())),
        }
    }
}

// Truthiness

impl Value {
    /// Truthiness for logical coercion: `none` and zero are falsy, strings
    /// and containers are truthy when non-empty, graphs when they have
    /// nodes.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Int(n) => *n != 0,
            Value::Uint(n) => *n != 0,
            Value::Long(n) => *n != 0,
            Value::Ulong(n) => *n != 0,
            Value::LongLong(n) => *n != 0,
            Value::UlongLong(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Double(n) | Value::LongDouble(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Set(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.is_empty(),
            Value::OrderedSet(items) => !items.is_empty(),
            Value::OrderedDict(entries) => !entries.is_empty(),
            Value::Graph(g) => !g.is_empty(),
        }
    }
}

// Structural ordering

impl Value {
    /// Total order over all Values: tag index first, payload second.
    ///
    /// This is the sort order behind `orderedset`'s invariant and behind
    /// deterministic hashing/printing of hash containers. It is not the
    /// operator-level `<`; floats order by `total_cmp` (so NaN sorts,
    /// and -0.0 < 0.0).
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        let tags = self.tag().index().cmp(&other.tag().index());
        if tags != Ordering::Equal {
            return tags;
        }
        match (self, other) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Ulong(a), Value::Ulong(b)) => a.cmp(b),
            (Value::LongLong(a), Value::LongLong(b)) => a.cmp(b),
            (Value::UlongLong(a), Value::UlongLong(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Double(a), Value::Double(b)) | (Value::LongDouble(a), Value::LongDouble(b)) => {
                a.total_cmp(b)
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => cmp_value_slices(a, b),
            (Value::Set(a), Value::Set(b)) => {
                let xs = sorted_refs(a.iter());
                let ys = sorted_refs(b.iter());
                cmp_value_refs(&xs, &ys)
            }
            (Value::Dict(a), Value::Dict(b)) => {
                let xs = sorted_entries(a);
                let ys = sorted_entries(b);
                cmp_entry_refs(&xs, &ys)
            }
            (Value::OrderedSet(a), Value::OrderedSet(b)) => {
                cmp_value_slices(a.as_slice(), b.as_slice())
            }
            (Value::OrderedDict(a), Value::OrderedDict(b)) => {
                let xs: Vec<(&String, &Value)> = a.iter().collect();
                let ys: Vec<(&String, &Value)> = b.iter().collect();
                cmp_entry_refs(&xs, &ys)
            }
            (Value::Graph(a), Value::Graph(b)) => a.cmp(b),
            // Tags already matched above.
            _ => Ordering::Equal,
        }
    }
}

fn cmp_value_slices(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = x.total_cmp(y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_value_refs(a: &[&Value], b: &[&Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = x.total_cmp(y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_entry_refs(a: &[(&String, &Value)], b: &[(&String, &Value)]) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
        let keys = ka.cmp(kb);
        if keys != Ordering::Equal {
            return keys;
        }
        let vals = va.total_cmp(vb);
        if vals != Ordering::Equal {
            return vals;
        }
    }
    a.len().cmp(&b.len())
}

fn sorted_refs<'a>(items: impl Iterator<Item = &'a Value>) -> Vec<&'a Value> {
    let mut refs: Vec<&Value> = items.collect();
    refs.sort_by(|x, y| x.total_cmp(y));
    refs
}

fn sorted_entries(entries: &HashMap<String, Value>) -> Vec<(&String, &Value)> {
    let mut refs: Vec<(&String, &Value)> = entries.iter().collect();
    refs.sort_by(|(ka, _), (kb, _)| ka.cmp(kb));
    refs
}

// Structural equality and hashing

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Ulong(a), Value::Ulong(b)) => a == b,
            (Value::LongLong(a), Value::LongLong(b)) => a == b,
            (Value::UlongLong(a), Value::UlongLong(b)) => a == b,
            // Bit-pattern identity keeps Eq reflexive and Hash-coherent.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) | (Value::LongDouble(a), Value::LongDouble(b)) => {
                a.to_bits() == b.to_bits()
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::OrderedSet(a), Value::OrderedSet(b)) => a == b,
            (Value::OrderedDict(a), Value::OrderedDict(b)) => a == b,
            (Value::Graph(a), Value::Graph(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Discriminant first so equal payloads under different tags differ.
        std::mem::discriminant(self).hash(state);

        match self {
            Value::None => {}
            Value::Int(n) => n.hash(state),
            Value::Uint(n) => n.hash(state),
            Value::Long(n) => n.hash(state),
            Value::Ulong(n) => n.hash(state),
            Value::LongLong(n) => n.hash(state),
            Value::UlongLong(n) => n.hash(state),
            Value::Float(n) => n.to_bits().hash(state),
            Value::Double(n) | Value::LongDouble(n) => n.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Str(s) => s.hash(state),
            Value::List(items) => {
                for item in items {
                    item.hash(state);
                }
            }
            Value::Set(items) => {
                // Iteration order varies, so fold elements in sorted order.
                items.len().hash(state);
                for item in sorted_refs(items.iter()) {
                    item.hash(state);
                }
            }
            Value::Dict(entries) => {
                entries.len().hash(state);
                for (k, v) in sorted_entries(entries) {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::OrderedSet(items) => {
                for item in items.iter() {
                    item.hash(state);
                }
            }
            Value::OrderedDict(entries) => {
                entries.len().hash(state);
                for (k, v) in entries {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Graph(g) => g.hash(state),
        }
    }
}

// Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Ulong(n) => write!(f, "{n}"),
            Value::LongLong(n) => write!(f, "{n}"),
            Value::UlongLong(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Double(n) | Value::LongDouble(n) => write!(f, "{n}"),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_element(f, item)?;
                }
                write!(f, "]")
            }
            Value::Set(items) => {
                // Sorted so the rendering is deterministic.
                write_braced(f, sorted_refs(items.iter()).into_iter())
            }
            Value::OrderedSet(items) => write_braced(f, items.iter()),
            Value::Dict(entries) => write_entries(f, sorted_entries(entries).into_iter()),
            Value::OrderedDict(entries) => write_entries(f, entries.iter()),
            Value::Graph(g) => write!(f, "{g}"),
        }
    }
}

/// Rendering inside a container, where strings keep their quotes. Every
/// other kind renders as at top level.
fn write_element(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    match v {
        Value::Str(s) => write!(f, "\"{s}\""),
        other => write!(f, "{other}"),
    }
}

fn write_braced<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_element(f, item)?;
    }
    write!(f, "}}")
}

fn write_entries<'a>(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in entries.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "\"{k}\": ")?;
        write_element(f, v)?;
    }
    write!(f, "}}")
}

// Conversions from native payloads

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Value {
        Value::Uint(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Long(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Value {
        Value::Ulong(n)
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Value {
        Value::LongLong(n)
    }
}

impl From<u128> for Value {
    fn from(n: u128) -> Value {
        Value::UlongLong(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Value {
        Value::Float(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Double(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::List(items)
    }
}

impl From<Graph> for Value {
    fn from(g: Graph) -> Value {
        Value::Graph(g)
    }
}
