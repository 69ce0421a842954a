//! Routine and routine-parameter retrieval stages.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::catalog::{
    Catalog, ColumnType, ParameterMode, Routine, RoutineKind, RoutineParameter, RoutineRef,
    SchemaId,
};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::source::{MetadataSource, RoutineParameterRow, Support};

/// Lists routines per retained schema and attaches the ones the routine
/// rule and kind filter keep. A backend with no routine support skips
/// the stage quietly.
pub(crate) async fn retrieve_routines(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let ids: Vec<SchemaId> = catalog.schemas.iter().map(|schema| schema.id.clone()).collect();
    let limit = super::request_limit(options, source);

    let mut listings = stream::iter(ids)
        .map(|id| async move {
            let result = source.list_routines(&id).await;
            (id, result)
        })
        .buffered(limit);

    while let Some((id, result)) = listings.next().await {
        let rows = match result {
            Ok(Support::Available(rows)) => rows,
            Ok(Support::Unsupported) => {
                debug!(schema = %id, "routines unsupported by source");
                continue;
            }
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(schema = %id, error = %error, "routine listing failed");
                continue;
            }
        };
        let Some(schema) = catalog.schema_mut(&id) else {
            continue;
        };
        for row in rows {
            let kind = match RoutineKind::parse(&row.routine_type) {
                Ok(kind) => kind,
                Err(_) => {
                    warn!(
                        schema = %id,
                        routine = %row.name,
                        reported = %row.routine_type,
                        "unrecognized routine type, skipping"
                    );
                    continue;
                }
            };
            if !options.keeps_routine_kind(kind) {
                continue;
            }
            let specific_name = row.specific_name.unwrap_or_else(|| row.name.clone());
            let mut routine = Routine::new(id.clone(), row.name, specific_name, kind);
            if !options.routines.matches(&routine.full_name()) {
                continue;
            }
            routine.return_type = row.return_type.as_deref().map(ColumnType::parse);
            routine.remarks = row.remarks;
            schema.routines.push(routine);
        }
    }

    debug!(routines = catalog.routines().count(), "routines retrieved");
    Ok(())
}

/// Fetches parameters for every retained routine.
pub(crate) async fn retrieve_parameters(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let routine_refs: Vec<RoutineRef> = catalog.routines().map(Routine::routine_ref).collect();
    let limit = super::request_limit(options, source);

    let mut fetches = stream::iter(routine_refs)
        .map(|routine_ref| async move {
            let result = source.list_routine_parameters(&routine_ref).await;
            (routine_ref, result)
        })
        .buffered(limit);

    while let Some((routine_ref, result)) = fetches.next().await {
        let rows = match result {
            Ok(rows) => rows,
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(routine = %routine_ref, error = %error, "parameter retrieval failed");
                continue;
            }
        };
        attach_parameters(catalog, &routine_ref, rows, options);
    }

    debug!("routine parameters retrieved");
    Ok(())
}

fn attach_parameters(
    catalog: &mut Catalog,
    routine_ref: &RoutineRef,
    rows: Vec<RoutineParameterRow>,
    options: &CrawlOptions,
) {
    let kept: Vec<RoutineParameterRow> = rows
        .into_iter()
        .filter(|row| options.routine_parameters.matches(&row.name))
        .collect();

    let mut indexed: Vec<(usize, RoutineParameterRow)> = kept.into_iter().enumerate().collect();
    indexed.sort_by_key(|(position, row)| (row.ordinal.unwrap_or(u32::MAX), *position));

    let Some(schema) = catalog.schema_mut(&routine_ref.schema) else {
        return;
    };
    let Some(routine) = schema
        .routines
        .iter_mut()
        .find(|routine| routine.specific_name == routine_ref.specific_name)
    else {
        return;
    };
    for (position, (_, row)) in indexed.into_iter().enumerate() {
        let column_type = match &row.data_type {
            Some(name) => ColumnType::parse(name),
            None => ColumnType::unknown(),
        };
        routine.parameters.push(RoutineParameter {
            name: row.name,
            ordinal: (position + 1) as u32,
            column_type,
            mode: row.mode.as_deref().map(ParameterMode::parse).unwrap_or_default(),
        });
    }
}
