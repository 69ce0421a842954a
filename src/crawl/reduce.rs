//! Post-build catalog reduction.
//!
//! Runs after the last retrieval stage and before inference. Reduction
//! only ever removes: tables known to be empty (when asked), then key
//! pairs whose endpoints no longer resolve, so the finished catalog
//! never carries a reference to something it does not contain.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{Catalog, ColumnRef};
use crate::config::CrawlOptions;

pub(crate) fn reduce(catalog: &mut Catalog, options: &CrawlOptions) {
    if options.no_empty_tables {
        drop_empty_tables(catalog);
    }
    prune_dangling_keys(catalog);
}

/// Drops tables whose loaded row count is exactly zero. Tables without a
/// loaded count stay; not knowing is not the same as empty.
fn drop_empty_tables(catalog: &mut Catalog) {
    let mut dropped = 0usize;
    for schema in &mut catalog.schemas {
        let before = schema.tables.len();
        schema.tables.retain(|table| table.row_count() != Some(0));
        dropped += before - schema.tables.len();
    }
    if dropped > 0 {
        debug!(tables = dropped, "empty tables dropped");
    }
}

/// Removes foreign-key pairs with a dangling endpoint. A key losing some
/// pairs is marked partial; a key losing every pair is dropped.
fn prune_dangling_keys(catalog: &mut Catalog) {
    let mut existing = HashSet::new();
    for schema in &catalog.schemas {
        for table in &schema.tables {
            for column in &table.columns {
                existing.insert(ColumnRef::new(
                    schema.id.clone(),
                    &table.name,
                    &column.name,
                ));
            }
        }
    }

    let mut pruned_pairs = 0usize;
    let mut dropped_keys = 0usize;
    for schema in &mut catalog.schemas {
        for table in &mut schema.tables {
            table.foreign_keys.retain_mut(|key| {
                let before = key.pairs.len();
                key.pairs.retain(|pair| {
                    existing.contains(&pair.referenced) && existing.contains(&pair.referencing)
                });
                pruned_pairs += before - key.pairs.len();
                if key.pairs.is_empty() {
                    dropped_keys += 1;
                    return false;
                }
                if key.pairs.len() < before {
                    key.partial = true;
                }
                true
            });
        }
    }
    if pruned_pairs > 0 {
        debug!(
            pairs = pruned_pairs,
            keys = dropped_keys,
            "dangling foreign key endpoints pruned"
        );
    }
}
