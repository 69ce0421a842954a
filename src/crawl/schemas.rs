//! Schema retrieval stage.

use tracing::{debug, warn};

use crate::catalog::{Catalog, Schema, SchemaId};
use crate::config::CrawlOptions;
use crate::error::{CrawlError, CrawlResult};
use crate::source::MetadataSource;

/// Lists schemas and attaches the ones the schema rule keeps, in the
/// order the source yields them.
pub(crate) async fn retrieve(
    source: &dyn MetadataSource,
    options: &CrawlOptions,
    catalog: &mut Catalog,
) -> CrawlResult<()> {
    let rows = match source.list_schemas().await {
        Ok(rows) => rows,
        Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
        Err(error) => {
            warn!(error = %error, "schema listing failed");
            return Ok(());
        }
    };

    for row in rows {
        let id = SchemaId::new(row.catalog, row.name);
        if !options.schemas.matches(&id.full_name()) {
            continue;
        }
        catalog.schemas.push(Schema::new(id));
    }
    debug!(schemas = catalog.schemas.len(), "schemas retrieved");
    Ok(())
}
