//! Visit-order comparators for named catalog objects.

use serde::{Deserialize, Serialize};

/// How a traversal orders tables or routines within a schema.
///
/// Natural order is the order objects were attached during retrieval,
/// which follows the order the backend reported them. Alphabetical
/// order sorts by bare object name, with storage order breaking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedObjectSort {
    /// Keep retrieval order.
    #[default]
    Natural,
    /// Sort by object name.
    Alphabetical,
}

impl NamedObjectSort {
    /// Reorders `items` in place according to this sort.
    ///
    /// The sort is stable, so equal names keep their storage order.
    pub(crate) fn apply<T, F>(&self, items: &mut [T], name: F)
    where
        F: Fn(&T) -> &str,
    {
        if let Self::Alphabetical = self {
            items.sort_by(|a, b| name(a).cmp(name(b)));
        }
    }
}
