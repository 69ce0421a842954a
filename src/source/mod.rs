//! Metadata source abstraction.
//!
//! A source adapter answers listing requests for one backend. The crawler
//! drives it stage by stage and never talks to a backend directly:
//!
//! ```text
//!   Crawler ──> MetadataSource ──> backend catalog views
//!      │              │
//!      │              ├─ list_schemas / list_tables / list_columns ...
//!      │              └─ Support<T>: per-operation opt-out
//!      └──────> Catalog
//! ```
//!
//! Adapters report what they can; an operation a backend has no notion of
//! returns [`Support::Unsupported`] rather than an error, and the crawl
//! moves on.

pub mod error;
mod memory;
mod registry;
pub mod rows;

use async_trait::async_trait;

use crate::catalog::{RoutineRef, SchemaId, TableRef};

pub use error::{SourceError, SourceResult};
pub use memory::operations;
pub use memory::{MemoryFixture, MemoryRoutine, MemorySchema, MemorySource, MemoryTable, ANY_OBJECT};
pub use registry::{SourceDescriptor, SourceRegistry};
pub use rows::{
    ColumnRow, DatabaseInfoRow, DriverInfoRow, ForeignKeyRow, IndexRow, PrimaryKeyRow,
    RoutineParameterRow, RoutineRow, SchemaRow, SequenceRow, SynonymRow, TableRow,
};

/// Outcome of an operation a backend may not implement.
///
/// Distinct from an error: an unsupported operation is an expected,
/// permanent property of the backend, not a retrieval failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support<T> {
    /// The operation ran and produced a value.
    Available(T),
    /// The backend has no notion of this operation.
    Unsupported,
}

impl<T> Support<T> {
    /// Returns the value, discarding support information.
    pub fn available(self) -> Option<T> {
        match self {
            Support::Available(value) => Some(value),
            Support::Unsupported => None,
        }
    }

    /// True when the backend does not implement the operation.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Support::Unsupported)
    }

    /// Maps the carried value, preserving support information.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Support<U> {
        match self {
            Support::Available(value) => Support::Available(f(value)),
            Support::Unsupported => Support::Unsupported,
        }
    }
}

/// Read-only access to one backend's metadata.
///
/// Listing operations take the narrowest parent reference that identifies
/// the objects wanted. Implementations must be safe to share across tasks;
/// the crawler issues up to [`max_concurrent_requests`] calls at a time
/// within a stage.
///
/// [`max_concurrent_requests`]: MetadataSource::max_concurrent_requests
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Describes the database product.
    async fn database_info(&self) -> SourceResult<DatabaseInfoRow>;

    /// Describes the driver or client library.
    async fn driver_info(&self) -> SourceResult<DriverInfoRow>;

    /// Lists every schema visible to the connection.
    async fn list_schemas(&self) -> SourceResult<Vec<SchemaRow>>;

    /// Lists tables and views in one schema.
    async fn list_tables(&self, schema: &SchemaId) -> SourceResult<Vec<TableRow>>;

    /// Lists the columns of one table.
    async fn list_columns(&self, table: &TableRef) -> SourceResult<Vec<ColumnRow>>;

    /// Retrieves the primary key of one table, if it has one.
    async fn primary_key(&self, table: &TableRef) -> SourceResult<Option<PrimaryKeyRow>>;

    /// Lists the declared foreign keys of one table.
    async fn list_foreign_keys(&self, table: &TableRef) -> SourceResult<Vec<ForeignKeyRow>>;

    /// Lists the indexes of one table.
    async fn list_indexes(&self, table: &TableRef) -> SourceResult<Vec<IndexRow>>;

    /// Lists routines in one schema.
    async fn list_routines(&self, schema: &SchemaId) -> SourceResult<Support<Vec<RoutineRow>>>;

    /// Lists the parameters of one routine, matched by its specific name
    /// when the backend disambiguates overloads.
    async fn list_routine_parameters(
        &self,
        routine: &RoutineRef,
    ) -> SourceResult<Vec<RoutineParameterRow>>;

    /// Lists sequences in one schema.
    async fn list_sequences(&self, schema: &SchemaId) -> SourceResult<Support<Vec<SequenceRow>>>;

    /// Lists synonyms in one schema.
    async fn list_synonyms(&self, schema: &SchemaId) -> SourceResult<Support<Vec<SynonymRow>>>;

    /// Counts the rows of one table.
    async fn row_count(&self, table: &TableRef) -> SourceResult<Support<u64>>;

    /// Upper bound on in-flight requests this adapter tolerates.
    ///
    /// Defaults to one: a strictly sequential source. Adapters backed by
    /// a connection pool raise this.
    fn max_concurrent_requests(&self) -> usize {
        1
    }
}

/// Conveniences composed from the base operations.
#[async_trait]
pub trait MetadataSourceExt: MetadataSource {
    /// Fetches database and driver descriptors together.
    async fn descriptors(&self) -> SourceResult<(DatabaseInfoRow, DriverInfoRow)> {
        let (database, driver) = futures::join!(self.database_info(), self.driver_info());
        Ok((database?, driver?))
    }
}

impl<T: MetadataSource + ?Sized> MetadataSourceExt for T {}
