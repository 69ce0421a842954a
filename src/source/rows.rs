//! Raw metadata payloads yielded by source adapters.
//!
//! A row is the unvalidated shape a backend reports one object in. Every
//! field except the identifying name is optional; the crawl stages fill
//! gaps with sentinels or defaults when they attach rows to the catalog.

use serde::{Deserialize, Serialize};

fn default_table_type() -> String {
    "TABLE".to_string()
}

fn default_nullable() -> bool {
    true
}

// ============================================================================
// Descriptor Rows
// ============================================================================

/// What the backend reports about itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseInfoRow {
    /// Database product name.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Database product version.
    #[serde(default)]
    pub product_version: Option<String>,
    /// User the metadata is retrieved as.
    #[serde(default)]
    pub user_name: Option<String>,
}

/// What the driver reports about itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverInfoRow {
    /// Driver name.
    #[serde(default)]
    pub driver_name: Option<String>,
    /// Driver version.
    #[serde(default)]
    pub driver_version: Option<String>,
    /// Connection URL with credentials already stripped.
    #[serde(default)]
    pub connection_url: Option<String>,
}

// ============================================================================
// Listing Rows
// ============================================================================

/// One schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRow {
    /// Catalog name; empty when the backend has no catalogs.
    #[serde(default)]
    pub catalog: String,
    /// Schema name; empty when the backend has no schemas.
    #[serde(default)]
    pub name: String,
}

/// One table or view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Table name.
    pub name: String,
    /// Backend-reported type string.
    #[serde(rename = "type", default = "default_table_type")]
    pub type_name: String,
    /// Remarks, when the backend keeps them.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Defining query, for views on backends that report it.
    #[serde(default)]
    pub view_definition: Option<String>,
}

/// One column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRow {
    /// Column name.
    pub name: String,
    /// 1-based ordinal position; rows are renumbered on attach when this
    /// is missing or inconsistent.
    #[serde(default)]
    pub ordinal: Option<u32>,
    /// Backend-specific type name.
    #[serde(default)]
    pub data_type: Option<String>,
    /// Whether NULL values are allowed.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value expression.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Remarks, when the backend keeps them.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// A table's primary key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    /// Constraint name; empty when unreported.
    #[serde(default)]
    pub name: String,
    /// Member column names, in key order.
    #[serde(default)]
    pub columns: Vec<String>,
}

/// One declared foreign key of a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    /// Constraint name; empty when unreported.
    #[serde(default)]
    pub name: String,
    /// Referencing column names in this table, in constraint order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Catalog of the referenced table.
    #[serde(default)]
    pub referenced_catalog: String,
    /// Schema of the referenced table.
    #[serde(default)]
    pub referenced_schema: String,
    /// Name of the referenced table.
    #[serde(default)]
    pub referenced_table: String,
    /// Referenced column names, aligned with `columns`.
    #[serde(default)]
    pub referenced_columns: Vec<String>,
}

/// One index of a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexRow {
    /// Index name; empty when unreported.
    #[serde(default)]
    pub name: String,
    /// Covered column names, in index order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    #[serde(default)]
    pub unique: bool,
}

/// One routine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineRow {
    /// Routine name.
    pub name: String,
    /// Backend disambiguator for overloads.
    #[serde(default)]
    pub specific_name: Option<String>,
    /// Routine type string ("function" or "procedure", any case).
    #[serde(rename = "type", default)]
    pub routine_type: String,
    /// Return type name, for functions.
    #[serde(default)]
    pub return_type: Option<String>,
    /// Remarks, when the backend keeps them.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// One routine parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineParameterRow {
    /// Parameter name; empty for positional parameters.
    #[serde(default)]
    pub name: String,
    /// 1-based ordinal position.
    #[serde(default)]
    pub ordinal: Option<u32>,
    /// Backend-specific type name.
    #[serde(default)]
    pub data_type: Option<String>,
    /// Direction string ("in", "out", "inout", "result").
    #[serde(default)]
    pub mode: Option<String>,
}

/// One sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRow {
    /// Sequence name.
    pub name: String,
    /// First value.
    #[serde(default)]
    pub start: Option<i64>,
    /// Step between values.
    #[serde(default)]
    pub increment: Option<i64>,
    /// Lower bound.
    #[serde(default)]
    pub min_value: Option<i64>,
    /// Upper bound.
    #[serde(default)]
    pub max_value: Option<i64>,
    /// Whether the sequence wraps at its bounds.
    #[serde(default)]
    pub cycles: bool,
}

/// One synonym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymRow {
    /// Synonym name.
    pub name: String,
    /// Name of the object the synonym points at.
    #[serde(default)]
    pub referenced_object: String,
}
