//! Weak association analysis.
//!
//! Runs once per crawl, after retrieval and filtering have settled the
//! table set. Columns are bucketed by normalized name; columns sharing a
//! bucket with a compatible type category and a key column on at least one
//! side become association candidates, unless a declared foreign key
//! already connects their tables. Ties are broken by a total order so the
//! output is identical across runs.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::catalog::{Catalog, ColumnPair, ColumnRef, TableRef, TypeCategory};

use super::naming::NamingConvention;
use super::WeakAssociation;

/// One column's entry in the normalized-name index.
#[derive(Debug, Clone)]
struct Endpoint {
    column: ColumnRef,
    category: TypeCategory,
    key_like: bool,
    sole_primary_key: bool,
}

/// A directed candidate before tie-breaking.
#[derive(Debug, Clone)]
struct Candidate {
    pair: ColumnPair,
    partner_sole_primary_key: bool,
}

/// Finds undeclared relationships between columns of a finished catalog.
#[derive(Debug, Clone, Default)]
pub struct WeakAssociationAnalyzer {
    convention: NamingConvention,
}

impl WeakAssociationAnalyzer {
    /// Create an analyzer with a custom naming convention.
    pub fn new(convention: NamingConvention) -> Self {
        Self { convention }
    }

    /// Analyze a catalog and return its weak associations, ordered by
    /// (referencing column, referenced column).
    pub fn analyze(&self, catalog: &Catalog) -> Vec<WeakAssociation> {
        let (linked_tables, covered_pairs) = declared_key_lookup(catalog);
        let index = self.build_index(catalog);

        let mut candidates = Vec::new();
        for endpoints in index.values() {
            for (position, left) in endpoints.iter().enumerate() {
                for right in &endpoints[position + 1..] {
                    if let Some(candidate) =
                        examine(left, right, &linked_tables, &covered_pairs)
                    {
                        candidates.push(candidate);
                    }
                }
            }
        }

        // One partner per referencing column: sole-PK partners win, then
        // the lexicographically smaller partner.
        let mut best: HashMap<ColumnRef, Candidate> = HashMap::new();
        for candidate in candidates {
            let key = candidate.pair.referencing.clone();
            match best.get(&key) {
                Some(existing) if !prefer(&candidate, existing) => {}
                _ => {
                    best.insert(key, candidate);
                }
            }
        }

        let mut associations: Vec<WeakAssociation> = best
            .into_values()
            .map(|candidate| WeakAssociation {
                pair: candidate.pair,
            })
            .collect();
        associations
            .sort_by(|a, b| (&a.pair.referencing, &a.pair.referenced).cmp(&(&b.pair.referencing, &b.pair.referenced)));

        debug!(count = associations.len(), "weak association analysis complete");
        associations
    }

    /// Bucket every column of the catalog by its normalized name.
    fn build_index(&self, catalog: &Catalog) -> HashMap<String, Vec<Endpoint>> {
        let mut index: HashMap<String, Vec<Endpoint>> = HashMap::new();
        for table in catalog.tables() {
            let sole_primary_key = table
                .primary_key
                .as_ref()
                .filter(|pk| pk.is_single_column())
                .map(|pk| pk.columns[0].clone());
            for column in &table.columns {
                let key = self.convention.normalize(&column.name, &table.name);
                if key.is_empty() {
                    continue;
                }
                index.entry(key).or_default().push(Endpoint {
                    column: ColumnRef::new(table.schema.clone(), &table.name, &column.name),
                    category: column.column_type.category,
                    key_like: column.is_key_like(),
                    sole_primary_key: sole_primary_key.as_deref() == Some(&column.name),
                });
            }
        }
        index
    }
}

/// Test one same-key endpoint pair against the candidate conditions and
/// orient it.
fn examine(
    left: &Endpoint,
    right: &Endpoint,
    linked_tables: &HashSet<(TableRef, TableRef)>,
    covered_pairs: &HashSet<(ColumnRef, ColumnRef)>,
) -> Option<Candidate> {
    if left.column == right.column {
        return None;
    }
    if !left.category.joinable_with(right.category) {
        return None;
    }
    if !left.key_like && !right.key_like {
        return None;
    }
    if linked_tables.contains(&ordered_tables(
        left.column.table_ref(),
        right.column.table_ref(),
    )) {
        return None;
    }
    if covered_pairs.contains(&ordered_columns(left.column.clone(), right.column.clone())) {
        return None;
    }

    // The key side becomes the referenced end. With keys on both sides a
    // sole single-column primary key wins, then the smaller column ref.
    let (referenced, referencing) = match (left.key_like, right.key_like) {
        (true, false) => (left, right),
        (false, true) => (right, left),
        _ => {
            if left.sole_primary_key != right.sole_primary_key {
                if left.sole_primary_key {
                    (left, right)
                } else {
                    (right, left)
                }
            } else if left.column <= right.column {
                (left, right)
            } else {
                (right, left)
            }
        }
    };

    Some(Candidate {
        pair: ColumnPair {
            referenced: referenced.column.clone(),
            referencing: referencing.column.clone(),
        },
        partner_sole_primary_key: referenced.sole_primary_key,
    })
}

/// Whether `new` beats `old` for the same referencing column.
fn prefer(new: &Candidate, old: &Candidate) -> bool {
    if new.partner_sole_primary_key != old.partner_sole_primary_key {
        return new.partner_sole_primary_key;
    }
    new.pair.referenced < old.pair.referenced
}

/// Collect which table pairs and column pairs declared foreign keys
/// already cover.
fn declared_key_lookup(
    catalog: &Catalog,
) -> (
    HashSet<(TableRef, TableRef)>,
    HashSet<(ColumnRef, ColumnRef)>,
) {
    let mut linked_tables = HashSet::new();
    let mut covered_pairs = HashSet::new();
    for table in catalog.tables() {
        for foreign_key in &table.foreign_keys {
            for pair in &foreign_key.pairs {
                linked_tables.insert(ordered_tables(
                    pair.referenced.table_ref(),
                    pair.referencing.table_ref(),
                ));
                covered_pairs.insert(ordered_columns(
                    pair.referenced.clone(),
                    pair.referencing.clone(),
                ));
            }
        }
    }
    (linked_tables, covered_pairs)
}

fn ordered_tables(a: TableRef, b: TableRef) -> (TableRef, TableRef) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn ordered_columns(a: ColumnRef, b: ColumnRef) -> (ColumnRef, ColumnRef) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
