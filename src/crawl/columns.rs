//! Column retrieval stage.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Column, ColumnRef, ColumnType, Table, TableRef};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::level::CrawlDepth;
use crate::source::{ColumnRow, MetadataSource};

/// Fetches columns for every retained table, a bounded number of tables
/// in flight at once, and attaches them in reported-ordinal order.
pub(crate) async fn retrieve(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    depth: &CrawlDepth,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let table_refs: Vec<TableRef> = catalog.tables().map(Table::table_ref).collect();
    let limit = super::request_limit(options, source);

    let mut fetches = stream::iter(table_refs)
        .map(|table_ref| async move {
            let result = source.list_columns(&table_ref).await;
            (table_ref, result)
        })
        .buffered(limit);

    while let Some((table_ref, result)) = fetches.next().await {
        let rows = match result {
            Ok(rows) => rows,
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(table = %table_ref, error = %error, "column retrieval failed");
                continue;
            }
        };
        attach_columns(catalog, &table_ref, rows, options, depth);
    }

    debug!("columns retrieved");
    Ok(())
}

fn attach_columns(
    catalog: &mut Catalog,
    table_ref: &TableRef,
    rows: Vec<ColumnRow>,
    options: &CrawlOptions,
    depth: &CrawlDepth,
) {
    let kept: Vec<ColumnRow> = rows
        .into_iter()
        .filter(|row| {
            let full = ColumnRef::new(table_ref.schema.clone(), &table_ref.name, &row.name)
                .full_name();
            options.columns.matches(&full)
        })
        .collect();

    // Reported ordinals decide order; attached ordinals are renumbered
    // contiguously from 1, repairing gaps or duplicates the backend
    // reported.
    let mut indexed: Vec<(usize, ColumnRow)> = kept.into_iter().enumerate().collect();
    indexed.sort_by_key(|(position, row)| (row.ordinal.unwrap_or(u32::MAX), *position));

    let Some(table) = catalog.table_mut(table_ref) else {
        return;
    };
    for (position, (_, row)) in indexed.into_iter().enumerate() {
        let column_type = match &row.data_type {
            Some(name) => ColumnType::parse(name),
            None => ColumnType::unknown(),
        };
        let mut column = Column::new(row.name, (position + 1) as u32, column_type);
        column.nullable = row.nullable;
        column.default_value = row.default_value;
        if depth.remarks {
            column.remarks = row.remarks;
        }
        table.columns.push(column);
    }
}
