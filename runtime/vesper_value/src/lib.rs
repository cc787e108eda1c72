#![deny(clippy::arithmetic_side_effects)]
//! Runtime value representation for the Vesper language.
//!
//! A [`Value`] is a tagged union over eighteen kinds: nine numeric kinds,
//! booleans, strings, five container kinds, a reserved graph kind, and
//! `none`. The active kind is reported by [`TypeTag`]; payloads are owned
//! directly, so cloning a Value deep-copies any container it holds.
//!
//! This crate holds the value core only. Binary operator semantics
//! (promotion, overflow policies, the dispatch tables) live in
//! `vesper_ops`.

pub mod errors;
pub mod tag;
pub mod value;

pub use errors::{
    division_by_zero, modulo_by_zero, overflow, type_mismatch, unsupported_operands,
    RuntimeError, ValueResult,
};
pub use tag::{TypeTag, ALL_TAGS, TAG_COUNT};
pub use value::{Graph, OrderedSet, Value};
