//! Retrieval depth levels.
//!
//! An [`InfoLevel`] names how deep a crawl should go. Levels form a strict
//! ladder: each one retrieves everything the previous level does plus more.
//! Internally a level expands to a [`CrawlDepth`], the per-detail gate the
//! pipeline stages consult, so callers can also force individual details on
//! top of a base level (row counts being the usual case).

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much metadata a crawl retrieves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum InfoLevel {
    /// Schemas and table shells only.
    Minimum,
    /// Adds columns, primary keys, foreign keys and indexes.
    #[default]
    Standard,
    /// Adds remarks, view definitions, routines and routine parameters.
    Detailed,
    /// Adds sequences, synonyms and row counts.
    Maximum,
}

impl InfoLevel {
    /// Expand this level into per-detail retrieval gates.
    pub fn depth(self) -> CrawlDepth {
        let mut depth = CrawlDepth::default();
        depth.tables = true;
        if self >= InfoLevel::Standard {
            depth.columns = true;
            depth.primary_keys = true;
            depth.foreign_keys = true;
            depth.indexes = true;
        }
        if self >= InfoLevel::Detailed {
            depth.remarks = true;
            depth.view_definitions = true;
            depth.routines = true;
            depth.routine_parameters = true;
        }
        if self >= InfoLevel::Maximum {
            depth.sequences = true;
            depth.synonyms = true;
            depth.row_counts = true;
        }
        depth
    }
}

impl fmt::Display for InfoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Minimum => "minimum",
            Self::Standard => "standard",
            Self::Detailed => "detailed",
            Self::Maximum => "maximum",
        };
        write!(f, "{name}")
    }
}

/// Per-detail retrieval gates consulted by the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlDepth {
    /// Retrieve table shells (names, types, basic identity).
    pub tables: bool,
    /// Retrieve table columns.
    pub columns: bool,
    /// Retrieve primary keys.
    pub primary_keys: bool,
    /// Retrieve foreign keys.
    pub foreign_keys: bool,
    /// Retrieve indexes.
    pub indexes: bool,
    /// Retrieve object remarks.
    pub remarks: bool,
    /// Retrieve defining queries for views.
    pub view_definitions: bool,
    /// Retrieve routines.
    pub routines: bool,
    /// Retrieve routine parameters.
    pub routine_parameters: bool,
    /// Retrieve sequences.
    pub sequences: bool,
    /// Retrieve synonyms.
    pub synonyms: bool,
    /// Count rows per retained table.
    pub row_counts: bool,
}

impl CrawlDepth {
    /// Force row counting on top of whatever the level granted.
    pub fn with_row_counts(mut self) -> Self {
        self.row_counts = true;
        self
    }
}
