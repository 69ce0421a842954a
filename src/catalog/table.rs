//! Tables and table references.

use std::fmt;

use once_cell::sync::OnceCell;

use super::column::Column;
use super::index::Index;
use super::keys::{ForeignKey, PrimaryKey};
use super::schema::SchemaId;

/// What kind of table-like object this is.
#[derive(Debug, Clone, PartialEq)]
pub enum TableKind {
    /// A regular table, including temporary tables.
    Table,
    /// A view, optionally carrying its defining query.
    View {
        /// The view's defining query, when the backend reports it.
        definition: Option<String>,
    },
}

/// A table or view and everything retrieved under it.
#[derive(Debug, Clone)]
pub struct Table {
    /// Schema this table belongs to.
    pub schema: SchemaId,
    /// Table name, unique within its schema.
    pub name: String,
    /// Type string exactly as the backend reported it
    /// ("TABLE", "BASE TABLE", "VIEW", "GLOBAL TEMPORARY", ...).
    pub type_name: String,
    /// Table or view.
    pub kind: TableKind,
    /// Backend-supplied remarks.
    pub remarks: Option<String>,
    /// Columns in ordinal order.
    pub columns: Vec<Column>,
    /// Primary key, when one exists and was retrieved.
    pub primary_key: Option<PrimaryKey>,
    /// Declared foreign keys where this table is the referencing side.
    pub foreign_keys: Vec<ForeignKey>,
    /// Indexes.
    pub indexes: Vec<Index>,
    row_count: OnceCell<u64>,
}

impl Table {
    /// Create a table shell. The kind is derived from the type string:
    /// anything containing "VIEW" is a view, the rest are tables.
    pub fn new(schema: SchemaId, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let kind = if type_name.to_uppercase().contains("VIEW") {
            TableKind::View { definition: None }
        } else {
            TableKind::Table
        };
        Self {
            schema,
            name: name.into(),
            type_name,
            kind,
            remarks: None,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            row_count: OnceCell::new(),
        }
    }

    /// Value reference to this table.
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.name])
    }

    /// Whether this is a view.
    pub fn is_view(&self) -> bool {
        matches!(self.kind, TableKind::View { .. })
    }

    /// The view's defining query, when known.
    pub fn view_definition(&self) -> Option<&str> {
        match &self.kind {
            TableKind::View { definition } => definition.as_deref(),
            TableKind::Table => None,
        }
    }

    /// Attach a defining query. Ignored for anything that is not a view.
    pub fn set_view_definition(&mut self, definition: impl Into<String>) {
        if let TableKind::View { definition: slot } = &mut self.kind {
            *slot = Some(definition.into());
        }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Look up a column by name, mutably.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    /// The loaded row count, if one was attached.
    pub fn row_count(&self) -> Option<u64> {
        self.row_count.get().copied()
    }

    /// Attach a row count. The first attachment wins; later calls return
    /// false and change nothing, so a finished catalog stays stable.
    pub fn set_row_count(&self, count: u64) -> bool {
        self.row_count.set(count).is_ok()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Value reference to a table anywhere in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRef {
    /// Schema of the table.
    pub schema: SchemaId,
    /// Table name.
    pub name: String,
}

impl TableRef {
    /// Create a table reference.
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }

    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.name])
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
