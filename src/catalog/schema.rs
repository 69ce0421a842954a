//! Schema identity and contents.

use std::fmt;

use super::routine::Routine;
use super::sequence::Sequence;
use super::synonym::Synonym;
use super::table::Table;

/// Identity of a schema: catalog and schema name as the backend reports
/// them. Either part may be empty when the backend has no such notion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SchemaId {
    /// Catalog name, or empty.
    pub catalog: String,
    /// Schema name, or empty.
    pub name: String,
}

impl SchemaId {
    /// Create a schema id from catalog and schema names.
    pub fn new(catalog: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            name: name.into(),
        }
    }

    /// Qualified name: non-empty parts joined with dots.
    ///
    /// `("", "PUBLIC")` renders as `PUBLIC`, `("", "")` as the empty string.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.catalog, &self.name])
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// A schema and everything retrieved under it.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Schema identity.
    pub id: SchemaId,
    /// Retained tables, in retrieval order.
    pub tables: Vec<Table>,
    /// Retained routines, in retrieval order.
    pub routines: Vec<Routine>,
    /// Retained sequences, in retrieval order.
    pub sequences: Vec<Sequence>,
    /// Retained synonyms, in retrieval order.
    pub synonyms: Vec<Synonym>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(id: SchemaId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Look up a table by name, mutably.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|table| table.name == name)
    }
}
