//! Sequence, synonym, and row-count retrieval stages.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::catalog::{Catalog, SchemaId, Sequence, Synonym, Table, TableRef};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::source::{MetadataSource, Support};

/// Lists sequences per retained schema.
pub(crate) async fn retrieve_sequences(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let ids: Vec<SchemaId> = catalog.schemas.iter().map(|schema| schema.id.clone()).collect();
    let limit = super::request_limit(options, source);

    let mut listings = stream::iter(ids)
        .map(|id| async move {
            let result = source.list_sequences(&id).await;
            (id, result)
        })
        .buffered(limit);

    while let Some((id, result)) = listings.next().await {
        let rows = match result {
            Ok(Support::Available(rows)) => rows,
            Ok(Support::Unsupported) => {
                debug!(schema = %id, "sequences unsupported by source");
                continue;
            }
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(schema = %id, error = %error, "sequence listing failed");
                continue;
            }
        };
        let Some(schema) = catalog.schema_mut(&id) else {
            continue;
        };
        for row in rows {
            let sequence = Sequence {
                schema: id.clone(),
                name: row.name,
                start: row.start,
                increment: row.increment,
                min_value: row.min_value,
                max_value: row.max_value,
                cycles: row.cycles,
            };
            if !options.sequences.matches(&sequence.full_name()) {
                continue;
            }
            schema.sequences.push(sequence);
        }
    }

    debug!("sequences retrieved");
    Ok(())
}

/// Lists synonyms per retained schema.
pub(crate) async fn retrieve_synonyms(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let ids: Vec<SchemaId> = catalog.schemas.iter().map(|schema| schema.id.clone()).collect();
    let limit = super::request_limit(options, source);

    let mut listings = stream::iter(ids)
        .map(|id| async move {
            let result = source.list_synonyms(&id).await;
            (id, result)
        })
        .buffered(limit);

    while let Some((id, result)) = listings.next().await {
        let rows = match result {
            Ok(Support::Available(rows)) => rows,
            Ok(Support::Unsupported) => {
                debug!(schema = %id, "synonyms unsupported by source");
                continue;
            }
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(schema = %id, error = %error, "synonym listing failed");
                continue;
            }
        };
        let Some(schema) = catalog.schema_mut(&id) else {
            continue;
        };
        for row in rows {
            let synonym = Synonym {
                schema: id.clone(),
                name: row.name,
                referenced_object: row.referenced_object,
            };
            if !options.synonyms.matches(&synonym.full_name()) {
                continue;
            }
            schema.synonyms.push(synonym);
        }
    }

    debug!("synonyms retrieved");
    Ok(())
}

/// Counts rows for every retained table and attaches the counts through
/// the tables' set-once slots.
pub(crate) async fn retrieve_row_counts(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let table_refs: Vec<TableRef> = catalog.tables().map(Table::table_ref).collect();
    let limit = super::request_limit(options, source);

    let mut fetches = stream::iter(table_refs)
        .map(|table_ref| async move {
            let result = source.row_count(&table_ref).await;
            (table_ref, result)
        })
        .buffered(limit);

    while let Some((table_ref, result)) = fetches.next().await {
        let count = match result {
            Ok(Support::Available(count)) => count,
            Ok(Support::Unsupported) => {
                debug!(table = %table_ref, "row counts unsupported by source");
                continue;
            }
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(table = %table_ref, error = %error, "row count failed");
                continue;
            }
        };
        if let Some(table) = catalog.table(&table_ref) {
            table.set_row_count(count);
        }
    }

    debug!("row counts retrieved");
    Ok(())
}
