//! Retrieval stages and their fixed order.

use std::fmt;

use crate::level::CrawlDepth;

/// One step of the retrieval pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    DatabaseInfo,
    Schemas,
    Tables,
    Columns,
    PrimaryKeys,
    ForeignKeys,
    Indexes,
    Routines,
    RoutineParameters,
    Sequences,
    Synonyms,
    RowCounts,
}

/// The pipeline order. Every crawl walks this list front to back; a
/// stage never reads anything a later stage produces.
pub const PIPELINE: &[Stage] = &[
    Stage::DatabaseInfo,
    Stage::Schemas,
    Stage::Tables,
    Stage::Columns,
    Stage::PrimaryKeys,
    Stage::ForeignKeys,
    Stage::Indexes,
    Stage::Routines,
    Stage::RoutineParameters,
    Stage::Sequences,
    Stage::Synonyms,
    Stage::RowCounts,
];

impl Stage {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::DatabaseInfo => "database-info",
            Stage::Schemas => "schemas",
            Stage::Tables => "tables",
            Stage::Columns => "columns",
            Stage::PrimaryKeys => "primary-keys",
            Stage::ForeignKeys => "foreign-keys",
            Stage::Indexes => "indexes",
            Stage::Routines => "routines",
            Stage::RoutineParameters => "routine-parameters",
            Stage::Sequences => "sequences",
            Stage::Synonyms => "synonyms",
            Stage::RowCounts => "row-counts",
        }
    }

    /// Whether this stage runs at the given depth.
    pub fn is_active(&self, depth: &CrawlDepth) -> bool {
        match self {
            Stage::DatabaseInfo | Stage::Schemas => true,
            Stage::Tables => depth.tables,
            Stage::Columns => depth.columns,
            Stage::PrimaryKeys => depth.primary_keys,
            Stage::ForeignKeys => depth.foreign_keys,
            Stage::Indexes => depth.indexes,
            Stage::Routines => depth.routines,
            Stage::RoutineParameters => depth.routine_parameters,
            Stage::Sequences => depth.sequences,
            Stage::Synonyms => depth.synonyms,
            Stage::RowCounts => depth.row_counts,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
