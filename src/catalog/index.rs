//! Table indexes.

/// An index over a table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// Index name; empty when the backend reports none.
    pub name: String,
    /// Covered column names, in index order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl Index {
    /// Whether the named column is covered by this index.
    pub fn covers(&self, column: &str) -> bool {
        self.columns.iter().any(|member| member == column)
    }
}
