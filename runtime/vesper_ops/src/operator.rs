//! Binary operator identifiers.
//!
//! Sixteen operators are dispatched through the type-pair tables built in
//! [`crate::dispatch`]. The two short-circuit logical operators are driven
//! by operand truthiness alone and never consult a table, so they carry no
//! matrix index.

/// Number of operators that dispatch through a type-pair table.
pub const MATRIX_OP_COUNT: usize = 16;

/// Binary operators over runtime values.
///
/// Matrix operators are declared first so their discriminants double as
/// indices into the per-operator table array.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Operator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,

    // Logical (short-circuit, outside the dispatch matrix)
    And,
    Or,
}

impl Operator {
    /// Every operator that dispatches through a type-pair table, in
    /// discriminant order.
    pub const MATRIX: [Operator; MATRIX_OP_COUNT] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Mod,
        Operator::Eq,
        Operator::NotEq,
        Operator::Gt,
        Operator::GtEq,
        Operator::Lt,
        Operator::LtEq,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::BitXor,
        Operator::Shl,
        Operator::Shr,
    ];

    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            // Arithmetic
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            // Comparison
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            // Bitwise
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            // Logical
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// True for `&&` and `||`, which evaluate by operand truthiness and
    /// never reach the dispatch tables.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Index of this operator's dispatch table, or `None` for the
    /// short-circuit logical operators.
    pub const fn matrix_index(self) -> Option<usize> {
        if self.is_short_circuit() {
            None
        } else {
            Some(self as usize)
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_symbol())
    }
}
