//! Integration tests for post-crawl catalog reduction.
//!
//! The reduction pass runs at the end of every crawl: tables whose
//! loaded row count is zero go when `no_empty_tables` asks for it, and
//! declared keys with filtered-away endpoints are pruned always.

use orbweaver::catalog::Catalog;
use orbweaver::config::CrawlOptions;
use orbweaver::crawl::crawl;
use orbweaver::level::InfoLevel;
use orbweaver::source::MemorySource;

fn books_source() -> MemorySource {
    MemorySource::from_json(include_str!("../fixtures/books.json")).expect("fixture parses")
}

fn table_names(catalog: &Catalog) -> Vec<&str> {
    catalog.tables().map(|table| table.name.as_str()).collect()
}

#[tokio::test]
async fn test_no_empty_tables_needs_loaded_counts() {
    // Without row counts loaded, every count is unknown and unknown
    // never means empty.
    let options = CrawlOptions::builder().no_empty_tables(true).build();

    let catalog = crawl(&books_source(), options)
        .await
        .expect("crawl succeeds");

    assert!(table_names(&catalog).contains(&"PUBLISHERS"));
}

#[tokio::test]
async fn test_row_count_flag_enables_the_reduction_below_maximum() {
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Standard)
        .load_row_counts(true)
        .no_empty_tables(true)
        .build();

    let catalog = crawl(&books_source(), options)
        .await
        .expect("crawl succeeds");

    let names = table_names(&catalog);
    assert!(!names.contains(&"PUBLISHERS"));
    assert!(names.contains(&"TITLES"));
    assert!(names.contains(&"SCRATCH"), "unknown count is not zero");
}

#[tokio::test]
async fn test_excluding_a_key_column_drops_its_keys() {
    let options = CrawlOptions::builder()
        .exclude_columns("BOOKS\\.TITLES\\.ID")
        .expect("valid pattern")
        .build();

    let catalog = crawl(&books_source(), options)
        .await
        .expect("crawl succeeds");

    // Both declared keys ended on TITLES.ID; with the column filtered
    // away neither may survive.
    for survivor in catalog.tables() {
        for foreign_key in &survivor.foreign_keys {
            for pair in &foreign_key.pairs {
                assert_ne!(
                    (pair.referenced.table.as_str(), pair.referenced.column.as_str()),
                    ("TITLES", "ID"),
                    "{} still references the excluded column",
                    foreign_key.name
                );
            }
        }
    }
    let title_writers = catalog
        .tables()
        .find(|table| table.name == "TITLE_WRITERS")
        .expect("junction retained");
    assert!(title_writers.foreign_keys.is_empty());
}

#[tokio::test]
async fn test_composite_key_losing_one_endpoint_becomes_partial() {
    let fixture = r#"{
        "schemas": [{
            "name": "SALES",
            "tables": [
                {
                    "name": "ORDERS",
                    "columns": [
                        { "name": "ORDER_ID", "ordinal": 1, "data_type": "INTEGER" },
                        { "name": "REGION_ID", "ordinal": 2, "data_type": "INTEGER" }
                    ],
                    "primary_key": { "name": "PK_ORDERS", "columns": ["ORDER_ID", "REGION_ID"] }
                },
                {
                    "name": "SHIPMENTS",
                    "columns": [
                        { "name": "ORDER_REF", "ordinal": 1, "data_type": "INTEGER" },
                        { "name": "REGION_REF", "ordinal": 2, "data_type": "INTEGER" }
                    ],
                    "foreign_keys": [{
                        "name": "FK_SHIPMENT_ORDER",
                        "columns": ["ORDER_REF", "REGION_REF"],
                        "referenced_schema": "SALES",
                        "referenced_table": "ORDERS",
                        "referenced_columns": ["ORDER_ID", "REGION_ID"]
                    }]
                }
            ]
        }]
    }"#;
    let source = MemorySource::from_json(fixture).expect("fixture parses");
    let options = CrawlOptions::builder()
        .exclude_columns("SALES\\.ORDERS\\.REGION_ID")
        .expect("valid pattern")
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    let shipments = catalog
        .tables()
        .find(|table| table.name == "SHIPMENTS")
        .expect("SHIPMENTS retained");
    assert_eq!(shipments.foreign_keys.len(), 1);
    let key = &shipments.foreign_keys[0];
    assert!(key.partial, "a shrunk key must say so");
    assert_eq!(key.pairs.len(), 1);
    assert_eq!(key.pairs[0].referencing.column, "ORDER_REF");
    assert_eq!(key.pairs[0].referenced.column, "ORDER_ID");
}

#[tokio::test]
async fn test_reduction_keeps_schemas_even_when_all_tables_go() {
    let fixture = r#"{
        "schemas": [{
            "name": "EMPTIES",
            "tables": [
                { "name": "VOID", "row_count": 0 }
            ]
        }]
    }"#;
    let source = MemorySource::from_json(fixture).expect("fixture parses");
    let options = CrawlOptions::builder()
        .load_row_counts(true)
        .no_empty_tables(true)
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert_eq!(catalog.schemas.len(), 1);
    assert_eq!(catalog.tables().count(), 0);
}
