//! Primary-key and foreign-key retrieval stages.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::catalog::{
    Catalog, ColumnPair, ColumnRef, ForeignKey, PrimaryKey, SchemaId, Table, TableRef,
};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::source::{ForeignKeyRow, MetadataSource};

/// Fetches each retained table's primary key and marks the member
/// columns.
pub(crate) async fn retrieve_primary_keys(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let table_refs: Vec<TableRef> = catalog.tables().map(Table::table_ref).collect();
    let limit = super::request_limit(options, source);

    let mut fetches = stream::iter(table_refs)
        .map(|table_ref| async move {
            let result = source.primary_key(&table_ref).await;
            (table_ref, result)
        })
        .buffered(limit);

    while let Some((table_ref, result)) = fetches.next().await {
        let row = match result {
            Ok(row) => row,
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(table = %table_ref, error = %error, "primary key retrieval failed");
                continue;
            }
        };
        let Some(row) = row else {
            continue;
        };
        let Some(table) = catalog.table_mut(&table_ref) else {
            continue;
        };
        for member in &row.columns {
            if let Some(column) = table.column_mut(member) {
                column.in_primary_key = true;
            }
        }
        table.primary_key = Some(PrimaryKey {
            name: row.name,
            columns: row.columns,
        });
    }

    debug!("primary keys retrieved");
    Ok(())
}

/// Fetches declared foreign keys for every retained table. Endpoint
/// validity is not checked here; dangling pairs are pruned after the
/// build so cross-schema targets retrieved later still count.
pub(crate) async fn retrieve_foreign_keys(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let table_refs: Vec<TableRef> = catalog.tables().map(Table::table_ref).collect();
    let limit = super::request_limit(options, source);

    let mut fetches = stream::iter(table_refs)
        .map(|table_ref| async move {
            let result = source.list_foreign_keys(&table_ref).await;
            (table_ref, result)
        })
        .buffered(limit);

    while let Some((table_ref, result)) = fetches.next().await {
        let rows = match result {
            Ok(rows) => rows,
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(table = %table_ref, error = %error, "foreign key retrieval failed");
                continue;
            }
        };
        let keys: Vec<ForeignKey> = rows
            .into_iter()
            .filter_map(|row| convert_foreign_key(&table_ref, row))
            .collect();
        if let Some(table) = catalog.table_mut(&table_ref) {
            table.foreign_keys = keys;
        }
    }

    debug!("foreign keys retrieved");
    Ok(())
}

/// Builds the column pairs of one declared key. Columns align by index;
/// a length mismatch keeps the aligned prefix and warns.
fn convert_foreign_key(table_ref: &TableRef, row: ForeignKeyRow) -> Option<ForeignKey> {
    if row.columns.len() != row.referenced_columns.len() {
        warn!(
            table = %table_ref,
            name = %row.name,
            referencing = row.columns.len(),
            referenced = row.referenced_columns.len(),
            "foreign key column lists disagree in length"
        );
    }
    let referenced_schema = SchemaId::new(row.referenced_catalog, row.referenced_schema);
    let pairs: Vec<ColumnPair> = row
        .columns
        .iter()
        .zip(row.referenced_columns.iter())
        .map(|(referencing, referenced)| ColumnPair {
            referenced: ColumnRef::new(
                referenced_schema.clone(),
                &row.referenced_table,
                referenced,
            ),
            referencing: ColumnRef::new(table_ref.schema.clone(), &table_ref.name, referencing),
        })
        .collect();
    if pairs.is_empty() {
        return None;
    }
    Some(ForeignKey::new(row.name, pairs))
}
