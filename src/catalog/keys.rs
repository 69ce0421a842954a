//! Primary and foreign keys.

use std::fmt;

use super::column::ColumnRef;

/// One referenced/referencing column pairing.
///
/// The referenced side is the key side ("one"), the referencing side is the
/// side holding the pointer ("many"). Declared foreign keys and inferred
/// weak associations both use this shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPair {
    /// Column on the key side.
    pub referenced: ColumnRef,
    /// Column holding the reference.
    pub referencing: ColumnRef,
}

impl fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.referencing, self.referenced)
    }
}

/// A table's primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    /// Constraint name; empty when the backend reports none.
    pub name: String,
    /// Member column names, in key order.
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Whether the key consists of exactly one column.
    pub fn is_single_column(&self) -> bool {
        self.columns.len() == 1
    }

    /// Whether the named column is part of this key.
    pub fn covers(&self, column: &str) -> bool {
        self.columns.iter().any(|member| member == column)
    }
}

/// A declared foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Constraint name; empty when the backend reports none.
    pub name: String,
    /// Column pairings, in constraint order.
    pub pairs: Vec<ColumnPair>,
    /// True when filtering removed some of the pairs but not all.
    pub partial: bool,
}

impl ForeignKey {
    /// Create a complete foreign key.
    pub fn new(name: impl Into<String>, pairs: Vec<ColumnPair>) -> Self {
        Self {
            name: name.into(),
            pairs,
            partial: false,
        }
    }

    /// Whether this key connects the two named tables, either way around.
    pub fn links(&self, left: &super::table::TableRef, right: &super::table::TableRef) -> bool {
        self.pairs.iter().any(|pair| {
            let referenced = pair.referenced.table_ref();
            let referencing = pair.referencing.table_ref();
            (referenced == *left && referencing == *right)
                || (referenced == *right && referencing == *left)
        })
    }

    /// Whether some pair of this key joins the two named columns, either
    /// way around.
    pub fn covers_pair(&self, a: &ColumnRef, b: &ColumnRef) -> bool {
        self.pairs.iter().any(|pair| {
            (pair.referenced == *a && pair.referencing == *b)
                || (pair.referenced == *b && pair.referencing == *a)
        })
    }
}
