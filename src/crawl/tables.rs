//! Table-shell retrieval stage.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::catalog::{Catalog, SchemaId, Table};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::level::CrawlDepth;
use crate::source::{MetadataSource, TableRow};

/// Lists tables per retained schema and attaches shells for the ones
/// that pass the type allow-list and the table rule. Remarks and view
/// definitions ride along on the listing rows and attach here when the
/// depth asks for them.
pub(crate) async fn retrieve(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    depth: &CrawlDepth,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let ids: Vec<SchemaId> = catalog.schemas.iter().map(|schema| schema.id.clone()).collect();
    let limit = super::request_limit(options, source);

    let mut listings = stream::iter(ids)
        .map(|id| async move {
            let result = source.list_tables(&id).await;
            (id, result)
        })
        .buffered(limit);

    while let Some((id, result)) = listings.next().await {
        let rows = match result {
            Ok(rows) => rows,
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(schema = %id, error = %error, "table listing failed");
                continue;
            }
        };
        attach_tables(catalog, &id, rows, options, depth);
    }

    debug!(tables = catalog.tables().count(), "table shells retrieved");
    Ok(())
}

fn attach_tables(
    catalog: &mut Catalog,
    id: &SchemaId,
    rows: Vec<TableRow>,
    options: &CrawlOptions,
    depth: &CrawlDepth,
) {
    let Some(schema) = catalog.schema_mut(id) else {
        return;
    };
    for row in rows {
        if !options.keeps_table_type(&row.type_name) {
            continue;
        }
        let mut table = Table::new(id.clone(), row.name, row.type_name);
        if !options.tables.matches(&table.full_name()) {
            continue;
        }
        if depth.remarks {
            table.remarks = row.remarks;
        }
        if depth.view_definitions {
            if let Some(definition) = row.view_definition {
                table.set_view_definition(definition);
            }
        }
        schema.tables.push(table);
    }
}
