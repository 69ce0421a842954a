//! Columns and column references.

use std::fmt;

use super::schema::SchemaId;
use super::table::TableRef;
use super::types::ColumnType;

/// A table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// 1-based position within the table.
    pub ordinal: u32,
    /// Declared type.
    pub column_type: ColumnType,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    /// Default value expression, verbatim.
    pub default_value: Option<String>,
    /// Backend-supplied remarks.
    pub remarks: Option<String>,
    /// Whether this column is part of the table's primary key.
    pub in_primary_key: bool,
    /// Whether this column is covered by a unique index.
    pub in_unique_index: bool,
}

impl Column {
    /// Create a column with no constraints attached yet.
    pub fn new(name: impl Into<String>, ordinal: u32, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            ordinal,
            column_type,
            nullable: true,
            default_value: None,
            remarks: None,
            in_primary_key: false,
            in_unique_index: false,
        }
    }

    /// Whether this column can anchor a relationship endpoint.
    pub fn is_key_like(&self) -> bool {
        self.in_primary_key || self.in_unique_index
    }
}

/// Value reference to a column anywhere in the catalog.
///
/// References are resolved through the catalog; a reference whose endpoint
/// was filtered away is dangling and gets pruned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef {
    /// Schema of the owning table.
    pub schema: SchemaId,
    /// Owning table name.
    pub table: String,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Create a column reference.
    pub fn new(
        schema: SchemaId,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            schema,
            table: table.into(),
            column: column.into(),
        }
    }

    /// Reference to the owning table.
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            schema: self.schema.clone(),
            name: self.table.clone(),
        }
    }

    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.table, &self.column])
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
