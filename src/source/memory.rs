//! In-memory metadata source.
//!
//! Serves a fixed fixture instead of a live backend. This is the adapter
//! integration tests crawl against: fixtures load from JSON, and fault
//! injection turns individual operations into failures, stalls, or
//! unsupported calls.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{SourceError, SourceResult};
use super::rows::{
    ColumnRow, DatabaseInfoRow, DriverInfoRow, ForeignKeyRow, IndexRow, PrimaryKeyRow,
    RoutineParameterRow, RoutineRow, SchemaRow, SequenceRow, SynonymRow, TableRow,
};
use super::{MetadataSource, Support};
use crate::catalog::{RoutineRef, SchemaId, TableRef};
use async_trait::async_trait;

/// Operation names accepted by the fault-injection builders.
pub mod operations {
    pub const DATABASE_INFO: &str = "database_info";
    pub const DRIVER_INFO: &str = "driver_info";
    pub const LIST_SCHEMAS: &str = "list_schemas";
    pub const LIST_TABLES: &str = "list_tables";
    pub const LIST_COLUMNS: &str = "list_columns";
    pub const PRIMARY_KEY: &str = "primary_key";
    pub const LIST_FOREIGN_KEYS: &str = "list_foreign_keys";
    pub const LIST_INDEXES: &str = "list_indexes";
    pub const LIST_ROUTINES: &str = "list_routines";
    pub const LIST_ROUTINE_PARAMETERS: &str = "list_routine_parameters";
    pub const LIST_SEQUENCES: &str = "list_sequences";
    pub const LIST_SYNONYMS: &str = "list_synonyms";
    pub const ROW_COUNT: &str = "row_count";
}

/// Matches any object in a fault-injection rule.
pub const ANY_OBJECT: &str = "*";

// ============================================================================
// Fixture Shapes
// ============================================================================

/// A complete in-memory backend, deserialized from a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryFixture {
    /// Database descriptor.
    #[serde(default)]
    pub database: DatabaseInfoRow,
    /// Driver descriptor.
    #[serde(default)]
    pub driver: DriverInfoRow,
    /// Schemas with their nested objects.
    #[serde(default)]
    pub schemas: Vec<MemorySchema>,
}

/// One schema in a fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySchema {
    /// Identifying row.
    #[serde(flatten)]
    pub row: SchemaRow,
    /// Tables and views.
    #[serde(default)]
    pub tables: Vec<MemoryTable>,
    /// Routines.
    #[serde(default)]
    pub routines: Vec<MemoryRoutine>,
    /// Sequences.
    #[serde(default)]
    pub sequences: Vec<SequenceRow>,
    /// Synonyms.
    #[serde(default)]
    pub synonyms: Vec<SynonymRow>,
}

/// One table in a fixture, with everything the table-scoped operations
/// would retrieve for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryTable {
    /// Identifying row.
    #[serde(flatten)]
    pub row: TableRow,
    /// Columns in ordinal order.
    #[serde(default)]
    pub columns: Vec<ColumnRow>,
    /// Primary key, when declared.
    #[serde(default)]
    pub primary_key: Option<PrimaryKeyRow>,
    /// Declared foreign keys.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRow>,
    /// Indexes.
    #[serde(default)]
    pub indexes: Vec<IndexRow>,
    /// Row count; absent means the fixture records no count and the
    /// operation fails for this table.
    #[serde(default)]
    pub row_count: Option<u64>,
}

/// One routine in a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRoutine {
    /// Identifying row.
    #[serde(flatten)]
    pub row: RoutineRow,
    /// Parameters in ordinal order.
    #[serde(default)]
    pub parameters: Vec<RoutineParameterRow>,
}

// ============================================================================
// MemorySource
// ============================================================================

/// [`MetadataSource`] backed by a [`MemoryFixture`].
///
/// # Example
///
/// ```ignore
/// use orbweaver::source::MemorySource;
///
/// let source = MemorySource::from_json(include_str!("books.json"))?
///     .with_unsupported(operations::LIST_SYNONYMS)
///     .with_failure(operations::LIST_COLUMNS, "PUBLIC.COUPONS", "table is locked");
/// ```
pub struct MemorySource {
    fixture: MemoryFixture,
    /// When set, every operation fails with this connection-level message.
    unavailable: Option<String>,
    unsupported: HashSet<String>,
    /// (operation, object full name or [`ANY_OBJECT`]) to error message.
    failures: HashMap<(String, String), String>,
    delays: HashMap<String, Duration>,
    max_concurrency: usize,
}

impl MemorySource {
    /// Creates a source serving `fixture`.
    pub fn new(fixture: MemoryFixture) -> Self {
        Self {
            fixture,
            unavailable: None,
            unsupported: HashSet::new(),
            failures: HashMap::new(),
            delays: HashMap::new(),
            max_concurrency: 1,
        }
    }

    /// Parses a JSON fixture and creates a source serving it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Makes every operation fail as if the backend were unreachable.
    pub fn with_unavailable(mut self, message: impl Into<String>) -> Self {
        self.unavailable = Some(message.into());
        self
    }

    /// Marks one operation as unsupported by this backend.
    ///
    /// Only meaningful for the operations that return [`Support`].
    pub fn with_unsupported(mut self, operation: impl Into<String>) -> Self {
        self.unsupported.insert(operation.into());
        self
    }

    /// Makes `operation` fail with a backend error when called for
    /// `object` (a schema or table full name, or [`ANY_OBJECT`]).
    pub fn with_failure(
        mut self,
        operation: impl Into<String>,
        object: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures
            .insert((operation.into(), object.into()), message.into());
        self
    }

    /// Stalls `operation` for `delay` before answering.
    pub fn with_delay(mut self, operation: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(operation.into(), delay);
        self
    }

    /// Sets the advertised request concurrency.
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Applies injected faults for one call, in order: connection loss,
    /// stall, then per-object failure.
    async fn guard(&self, operation: &str, object: &str) -> SourceResult<()> {
        if let Some(message) = &self.unavailable {
            return Err(SourceError::unavailable(message.clone()));
        }
        if let Some(delay) = self.delays.get(operation) {
            tokio::time::sleep(*delay).await;
        }
        let exact = (operation.to_string(), object.to_string());
        let any = (operation.to_string(), ANY_OBJECT.to_string());
        if let Some(message) = self.failures.get(&exact).or_else(|| self.failures.get(&any)) {
            return Err(SourceError::backend(operation, message.clone()));
        }
        Ok(())
    }

    fn is_unsupported(&self, operation: &str) -> bool {
        self.unsupported.contains(operation)
    }

    fn schema(&self, id: &SchemaId) -> SourceResult<&MemorySchema> {
        self.fixture
            .schemas
            .iter()
            .find(|schema| schema.row.catalog == id.catalog && schema.row.name == id.name)
            .ok_or_else(|| {
                SourceError::backend("lookup", format!("unknown schema {}", id.full_name()))
            })
    }

    fn table(&self, table: &TableRef) -> SourceResult<&MemoryTable> {
        self.schema(&table.schema)?
            .tables
            .iter()
            .find(|candidate| candidate.row.name == table.name)
            .ok_or_else(|| {
                SourceError::backend("lookup", format!("unknown table {}", table.full_name()))
            })
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(MemoryFixture::default())
    }
}

#[async_trait]
impl MetadataSource for MemorySource {
    async fn database_info(&self) -> SourceResult<DatabaseInfoRow> {
        self.guard(operations::DATABASE_INFO, ANY_OBJECT).await?;
        Ok(self.fixture.database.clone())
    }

    async fn driver_info(&self) -> SourceResult<DriverInfoRow> {
        self.guard(operations::DRIVER_INFO, ANY_OBJECT).await?;
        Ok(self.fixture.driver.clone())
    }

    async fn list_schemas(&self) -> SourceResult<Vec<SchemaRow>> {
        self.guard(operations::LIST_SCHEMAS, ANY_OBJECT).await?;
        Ok(self
            .fixture
            .schemas
            .iter()
            .map(|schema| schema.row.clone())
            .collect())
    }

    async fn list_tables(&self, schema: &SchemaId) -> SourceResult<Vec<TableRow>> {
        self.guard(operations::LIST_TABLES, &schema.full_name())
            .await?;
        Ok(self
            .schema(schema)?
            .tables
            .iter()
            .map(|table| table.row.clone())
            .collect())
    }

    async fn list_columns(&self, table: &TableRef) -> SourceResult<Vec<ColumnRow>> {
        self.guard(operations::LIST_COLUMNS, &table.full_name())
            .await?;
        Ok(self.table(table)?.columns.clone())
    }

    async fn primary_key(&self, table: &TableRef) -> SourceResult<Option<PrimaryKeyRow>> {
        self.guard(operations::PRIMARY_KEY, &table.full_name())
            .await?;
        Ok(self.table(table)?.primary_key.clone())
    }

    async fn list_foreign_keys(&self, table: &TableRef) -> SourceResult<Vec<ForeignKeyRow>> {
        self.guard(operations::LIST_FOREIGN_KEYS, &table.full_name())
            .await?;
        Ok(self.table(table)?.foreign_keys.clone())
    }

    async fn list_indexes(&self, table: &TableRef) -> SourceResult<Vec<IndexRow>> {
        self.guard(operations::LIST_INDEXES, &table.full_name())
            .await?;
        Ok(self.table(table)?.indexes.clone())
    }

    async fn list_routines(&self, schema: &SchemaId) -> SourceResult<Support<Vec<RoutineRow>>> {
        if self.is_unsupported(operations::LIST_ROUTINES) {
            return Ok(Support::Unsupported);
        }
        self.guard(operations::LIST_ROUTINES, &schema.full_name())
            .await?;
        Ok(Support::Available(
            self.schema(schema)?
                .routines
                .iter()
                .map(|routine| routine.row.clone())
                .collect(),
        ))
    }

    async fn list_routine_parameters(
        &self,
        routine: &RoutineRef,
    ) -> SourceResult<Vec<RoutineParameterRow>> {
        self.guard(operations::LIST_ROUTINE_PARAMETERS, &routine.full_name())
            .await?;
        let found = self
            .schema(&routine.schema)?
            .routines
            .iter()
            .find(|candidate| {
                if routine.specific_name.is_empty() {
                    candidate.row.name == routine.name
                } else {
                    candidate.row.specific_name.as_deref() == Some(routine.specific_name.as_str())
                }
            })
            .ok_or_else(|| {
                SourceError::backend("lookup", format!("unknown routine {}", routine.full_name()))
            })?;
        Ok(found.parameters.clone())
    }

    async fn list_sequences(&self, schema: &SchemaId) -> SourceResult<Support<Vec<SequenceRow>>> {
        if self.is_unsupported(operations::LIST_SEQUENCES) {
            return Ok(Support::Unsupported);
        }
        self.guard(operations::LIST_SEQUENCES, &schema.full_name())
            .await?;
        Ok(Support::Available(self.schema(schema)?.sequences.clone()))
    }

    async fn list_synonyms(&self, schema: &SchemaId) -> SourceResult<Support<Vec<SynonymRow>>> {
        if self.is_unsupported(operations::LIST_SYNONYMS) {
            return Ok(Support::Unsupported);
        }
        self.guard(operations::LIST_SYNONYMS, &schema.full_name())
            .await?;
        Ok(Support::Available(self.schema(schema)?.synonyms.clone()))
    }

    async fn row_count(&self, table: &TableRef) -> SourceResult<Support<u64>> {
        if self.is_unsupported(operations::ROW_COUNT) {
            return Ok(Support::Unsupported);
        }
        self.guard(operations::ROW_COUNT, &table.full_name()).await?;
        match self.table(table)?.row_count {
            Some(count) => Ok(Support::Available(count)),
            None => Err(SourceError::backend(
                operations::ROW_COUNT,
                format!("no row count recorded for {}", table.full_name()),
            )),
        }
    }

    fn max_concurrent_requests(&self) -> usize {
        self.max_concurrency
    }
}
