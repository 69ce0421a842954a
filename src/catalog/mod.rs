//! The catalog data model.
//!
//! A [`Catalog`] is the product of one crawl: every schema that survived
//! filtering, the tables/routines/sequences/synonyms under them, crawl-wide
//! descriptors, and the weak associations inferred between columns. Once
//! built it is read-only (row counts excepted, which attach through a
//! set-once slot) and can be shared freely across threads.
//!
//! Objects that appear in more than one place are connected by value
//! references ([`TableRef`], [`ColumnRef`]) rather than pointers; the
//! catalog resolves them on demand.

mod column;
mod index;
mod info;
mod keys;
mod routine;
mod schema;
mod sequence;
mod synonym;
mod table;
pub mod types;

pub use column::{Column, ColumnRef};
pub use index::Index;
pub use info::{CrawlInfo, DatabaseInfo, DriverInfo};
pub use keys::{ColumnPair, ForeignKey, PrimaryKey};
pub use routine::{ParameterMode, Routine, RoutineKind, RoutineParameter, RoutineRef};
pub use schema::{Schema, SchemaId};
pub use sequence::Sequence;
pub use synonym::Synonym;
pub use table::{Table, TableKind, TableRef};
pub use types::{ColumnType, TypeCategory};

use crate::inference::WeakAssociation;

/// Sentinel for metadata a backend refused to report.
pub const UNKNOWN: &str = "unknown";

/// Join the non-empty parts of a qualified name with dots.
pub(crate) fn join_qualified(parts: &[&str]) -> String {
    let mut joined = String::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('.');
        }
        joined.push_str(part);
    }
    joined
}

/// The result of one crawl.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Descriptor of the run that produced this catalog.
    pub crawl_info: CrawlInfo,
    /// What the backend reported about itself.
    pub database_info: DatabaseInfo,
    /// What the driver reported about itself.
    pub driver_info: DriverInfo,
    /// Retained schemas, in retrieval order.
    pub schemas: Vec<Schema>,
    /// Inferred column relationships, in deterministic order.
    pub weak_associations: Vec<WeakAssociation>,
}

impl Catalog {
    /// Look up a schema by id.
    pub fn schema(&self, id: &SchemaId) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.id == *id)
    }

    /// Look up a schema by id, mutably.
    pub fn schema_mut(&mut self, id: &SchemaId) -> Option<&mut Schema> {
        self.schemas.iter_mut().find(|schema| schema.id == *id)
    }

    /// Resolve a table reference.
    pub fn table(&self, table_ref: &TableRef) -> Option<&Table> {
        self.schema(&table_ref.schema)?.table(&table_ref.name)
    }

    /// Resolve a table reference, mutably.
    pub fn table_mut(&mut self, table_ref: &TableRef) -> Option<&mut Table> {
        self.schema_mut(&table_ref.schema)?.table_mut(&table_ref.name)
    }

    /// Resolve a column reference.
    pub fn column(&self, column_ref: &ColumnRef) -> Option<&Column> {
        self.table(&column_ref.table_ref())?.column(&column_ref.column)
    }

    /// Whether a column reference still resolves.
    pub fn column_exists(&self, column_ref: &ColumnRef) -> bool {
        self.column(column_ref).is_some()
    }

    /// All tables across all schemas, in retrieval order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.schemas.iter().flat_map(|schema| schema.tables.iter())
    }

    /// All routines across all schemas, in retrieval order.
    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.schemas.iter().flat_map(|schema| schema.routines.iter())
    }

    /// Weak associations touching the given table on either side.
    pub fn associations_for(&self, table_ref: &TableRef) -> Vec<&WeakAssociation> {
        self.weak_associations
            .iter()
            .filter(|association| association.touches(table_ref))
            .collect()
    }
}
