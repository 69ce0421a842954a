//! Synonyms.

use super::schema::SchemaId;

/// An alias for another database object.
#[derive(Debug, Clone, PartialEq)]
pub struct Synonym {
    /// Schema this synonym belongs to.
    pub schema: SchemaId,
    /// Synonym name.
    pub name: String,
    /// Name of the object the synonym points at, as reported.
    pub referenced_object: String,
}

impl Synonym {
    /// Qualified dotted name, skipping empty parts.
    pub fn full_name(&self) -> String {
        super::join_qualified(&[&self.schema.catalog, &self.schema.name, &self.name])
    }
}
