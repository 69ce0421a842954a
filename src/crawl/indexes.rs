//! Index retrieval stage.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Index, Table, TableRef};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::source::MetadataSource;

/// Fetches indexes for every retained table. Unique indexes mark their
/// member columns so the inference pass can treat them as key-like.
pub(crate) async fn retrieve(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let table_refs: Vec<TableRef> = catalog.tables().map(Table::table_ref).collect();
    let limit = super::request_limit(options, source);

    let mut fetches = stream::iter(table_refs)
        .map(|table_ref| async move {
            let result = source.list_indexes(&table_ref).await;
            (table_ref, result)
        })
        .buffered(limit);

    while let Some((table_ref, result)) = fetches.next().await {
        let rows = match result {
            Ok(rows) => rows,
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(table = %table_ref, error = %error, "index retrieval failed");
                continue;
            }
        };
        let Some(table) = catalog.table_mut(&table_ref) else {
            continue;
        };
        for row in rows {
            if row.unique {
                for member in &row.columns {
                    if let Some(column) = table.column_mut(member) {
                        column.in_unique_index = true;
                    }
                }
            }
            table.indexes.push(Index {
                name: row.name,
                columns: row.columns,
                unique: row.unique,
            });
        }
    }

    debug!("indexes retrieved");
    Ok(())
}
