//! Weak association inference.
//!
//! Declared foreign keys rarely tell the whole story of a schema. This
//! module finds the undeclared relationships: columns that line up by
//! naming convention and type with a key column elsewhere. The result is a
//! catalog-level collection of [`WeakAssociation`] values, shaped like
//! foreign key pairs but tagged as inferred, owned by the catalog rather
//! than by either table.
//!
//! ```text
//!   BOOKS.AUTHOR_ID  ~~>  AUTHORS.ID      (inferred)
//!   SALES.BOOK_ID    -->  BOOKS.ID        (declared)
//! ```
//!
//! The matching heuristic lives in [`NamingConvention`] and is a plain
//! value: replace the suffix list or switch off plural folding to fit a
//! house style.

mod engine;
pub mod naming;

pub use engine::WeakAssociationAnalyzer;
pub use naming::{pluralize, singularize, NamingConvention};

use std::fmt;

use crate::catalog::{ColumnPair, ColumnRef, TableRef};

/// An inferred relationship between two columns.
///
/// Never part of referential-integrity guarantees: filtering prunes weak
/// associations whose endpoints disappear, and nothing else depends on
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeakAssociation {
    /// The matched column pair, oriented like a foreign key.
    pub pair: ColumnPair,
}

impl WeakAssociation {
    /// The column holding the inferred reference.
    pub fn referencing(&self) -> &ColumnRef {
        &self.pair.referencing
    }

    /// The key-side column.
    pub fn referenced(&self) -> &ColumnRef {
        &self.pair.referenced
    }

    /// Whether either endpoint belongs to the given table.
    pub fn touches(&self, table_ref: &TableRef) -> bool {
        self.pair.referencing.table_ref() == *table_ref
            || self.pair.referenced.table_ref() == *table_ref
    }
}

impl fmt::Display for WeakAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~~> {}", self.pair.referencing, self.pair.referenced)
    }
}
