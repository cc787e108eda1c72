//! Type tags for runtime values.
//!
//! The tag enumeration is closed: exactly eighteen kinds, and every
//! operator dispatch table is indexed by a pair of them. Tag order is
//! stable because table rows and columns are addressed by [`TypeTag::index`].

use std::fmt;

/// Number of value kinds. Dispatch matrices are `TAG_COUNT` × `TAG_COUNT`.
pub const TAG_COUNT: usize = 18;

/// Discriminant identifying which kind a [`crate::Value`] holds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum TypeTag {
    None,
    // Numeric
    Int,
    Float,
    Double,
    Long,
    LongLong,
    LongDouble,
    Uint,
    Ulong,
    UlongLong,
    // Scalar
    Bool,
    Str,
    // Containers
    List,
    Set,
    Dict,
    OrderedSet,
    OrderedDict,
    // Reserved
    Graph,
}

/// Every tag, in `index()` order. Used to enumerate matrix rows/columns.
pub const ALL_TAGS: [TypeTag; TAG_COUNT] = [
    TypeTag::None,
    TypeTag::Int,
    TypeTag::Float,
    TypeTag::Double,
    TypeTag::Long,
    TypeTag::LongLong,
    TypeTag::LongDouble,
    TypeTag::Uint,
    TypeTag::Ulong,
    TypeTag::UlongLong,
    TypeTag::Bool,
    TypeTag::Str,
    TypeTag::List,
    TypeTag::Set,
    TypeTag::Dict,
    TypeTag::OrderedSet,
    TypeTag::OrderedDict,
    TypeTag::Graph,
];

impl TypeTag {
    /// Row/column index of this tag in a dispatch matrix.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The tag's surface-level name, as shown in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Long => "long",
            Self::LongLong => "long_long",
            Self::LongDouble => "long_double",
            Self::Uint => "uint",
            Self::Ulong => "ulong",
            Self::UlongLong => "ulong_long",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::List => "list",
            Self::Set => "set",
            Self::Dict => "dict",
            Self::OrderedSet => "orderedset",
            Self::OrderedDict => "ordereddict",
            Self::Graph => "graph",
        }
    }

    /// True for the nine numeric tags. `bool` is not numeric by itself but
    /// participates in numeric operations as 0/1.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Float
                | Self::Double
                | Self::Long
                | Self::LongLong
                | Self::LongDouble
                | Self::Uint
                | Self::Ulong
                | Self::UlongLong
        )
    }

    /// True for the six fixed-width integer tags.
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Long | Self::LongLong | Self::Uint | Self::Ulong | Self::UlongLong
        )
    }

    /// True for the three unsigned integer tags.
    pub const fn is_unsigned_integral(self) -> bool {
        matches!(self, Self::Uint | Self::Ulong | Self::UlongLong)
    }

    /// True for the three floating tags.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::LongDouble)
    }

    /// True for the five container tags.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::List | Self::Set | Self::Dict | Self::OrderedSet | Self::OrderedDict
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tag_indexes_are_dense() {
        for (i, tag) in ALL_TAGS.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
        assert_eq!(ALL_TAGS.len(), TAG_COUNT);
    }

    #[test]
    fn test_tag_names_are_unique() {
        for a in ALL_TAGS {
            for b in ALL_TAGS {
                if a != b {
                    assert_ne!(a.name(), b.name());
                }
            }
        }
    }

    #[test]
    fn test_category_predicates() {
        assert!(TypeTag::Int.is_numeric());
        assert!(TypeTag::LongDouble.is_numeric());
        assert!(!TypeTag::Bool.is_numeric());
        assert!(!TypeTag::Str.is_numeric());

        assert!(TypeTag::UlongLong.is_integral());
        assert!(!TypeTag::Double.is_integral());

        assert!(TypeTag::Uint.is_unsigned_integral());
        assert!(!TypeTag::Int.is_unsigned_integral());

        assert!(TypeTag::Float.is_float());
        assert!(!TypeTag::Long.is_float());

        assert!(TypeTag::OrderedDict.is_container());
        assert!(!TypeTag::Graph.is_container());
        assert!(!TypeTag::None.is_container());
    }

    #[test]
    fn test_display_uses_surface_names() {
        assert_eq!(TypeTag::UlongLong.to_string(), "ulong_long");
        assert_eq!(TypeTag::Str.to_string(), "string");
        assert_eq!(TypeTag::OrderedSet.to_string(), "orderedset");
    }
}
