//! Sequences.

use super::schema::SchemaId;

/// A sequence generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    /// Schema this sequence belongs to.
    pub schema: SchemaId,
    /// Sequence name.
    pub name: String,
    /// First value, when the backend reports it.
    pub start: Option<i64>,
    /// Step between values.
    pub increment: Option<i64>,
    /// Lower bound.
    pub min_value: Option<i64>,
    /// Upper bound.
    pub max_value: Option<i64>,
    /// Whether the sequence wraps around at its bounds.
    pub cycles: bool,
}

impl Sequence {
    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.name])
    }
}
