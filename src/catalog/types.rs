//! Column data types as reported by metadata sources.
//!
//! Backends describe column types as free-form strings ("VARCHAR(255)",
//! "timestamp with time zone", "NUMBER(10,2)"). The catalog keeps the raw
//! string untouched for display and derives a broad [`TypeCategory`] from
//! it. Categories drive relationship compatibility: two columns can only be
//! weakly associated when their categories agree.

use std::fmt;

/// Broad classification of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Boolean and single-bit types.
    Boolean,
    /// Integer, floating point and fixed-precision decimal types.
    Numeric,
    /// Character and text types of any length.
    Text,
    /// Date, time and timestamp types.
    Temporal,
    /// Raw byte types (BLOB, BYTEA, VARBINARY).
    Binary,
    /// JSON document types.
    Json,
    /// UUID/GUID types.
    Identifier,
    /// Anything the parser did not recognize.
    Unknown,
}

impl TypeCategory {
    /// Classify a backend-reported type name.
    ///
    /// Parenthesized parameters are ignored: `varchar(255)` and
    /// `character varying(30)` both classify as [`TypeCategory::Text`].
    /// Unrecognized names classify as [`TypeCategory::Unknown`].
    pub fn from_type_name(name: &str) -> Self {
        let lowered = name.trim().to_lowercase();
        let base = match lowered.find('(') {
            Some(index) => lowered[..index].trim_end(),
            None => &lowered,
        };

        match base {
            "bool" | "boolean" | "bit" => Self::Boolean,

            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "int2"
            | "int4" | "int8" | "serial" | "bigserial" => Self::Numeric,
            "real" | "float" | "float4" | "float8" | "double" | "double precision" => {
                Self::Numeric
            }
            "decimal" | "numeric" | "number" | "money" => Self::Numeric,

            "char" | "character" | "nchar" | "varchar" | "nvarchar" | "character varying"
            | "longvarchar" | "text" | "string" | "clob" | "ntext" => Self::Text,

            "date" | "time" | "timestamp" | "datetime" | "datetime2" | "timestamptz"
            | "timestamp with time zone" | "timestamp without time zone" | "datetimeoffset"
            | "time with time zone" => Self::Temporal,

            "binary" | "varbinary" | "longvarbinary" | "blob" | "bytea" | "raw" | "image" => {
                Self::Binary
            }

            "json" | "jsonb" => Self::Json,

            "uuid" | "guid" | "uniqueidentifier" => Self::Identifier,

            _ => Self::Unknown,
        }
    }

    /// Check whether columns of this category can be matched against
    /// columns of `other` when inferring relationships.
    ///
    /// Unknown never matches, not even another unknown.
    pub fn joinable_with(self, other: TypeCategory) -> bool {
        self != Self::Unknown && self == other
    }
}

/// A column's declared type: the raw backend string plus its category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnType {
    /// Type name exactly as the backend reported it.
    pub name: String,
    /// Category derived from the name.
    pub category: TypeCategory,
}

impl ColumnType {
    /// Classify a backend-reported type string. Never fails; names the
    /// parser does not know keep their text and classify as unknown.
    pub fn parse(name: &str) -> Self {
        Self {
            category: TypeCategory::from_type_name(name),
            name: name.to_string(),
        }
    }

    /// The sentinel type used when a backend reports no type at all.
    pub fn unknown() -> Self {
        Self {
            name: super::UNKNOWN.to_string(),
            category: TypeCategory::Unknown,
        }
    }

    /// Returns true for integer, floating point and decimal types.
    pub fn is_numeric(&self) -> bool {
        self.category == TypeCategory::Numeric
    }

    /// Returns true for character and text types.
    pub fn is_text(&self) -> bool {
        self.category == TypeCategory::Text
    }

    /// Returns true for date/time types.
    pub fn is_temporal(&self) -> bool {
        self.category == TypeCategory::Temporal
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
