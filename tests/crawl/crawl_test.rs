//! Integration tests for the staged crawl pipeline.
//!
//! Every test drives a full crawl of an in-memory source through the
//! public API and checks what ended up in the catalog: how deep each
//! info level goes, how inclusion rules and table-type filters cut the
//! object set, and how backend failures degrade single objects without
//! sinking the run.

use std::time::Duration;

use orbweaver::catalog::{Catalog, ParameterMode, RoutineKind, Table};
use orbweaver::config::CrawlOptions;
use orbweaver::crawl::crawl;
use orbweaver::error::CrawlError;
use orbweaver::inclusion::InclusionRule;
use orbweaver::level::InfoLevel;
use orbweaver::source::{operations, MemorySource};

fn books_source() -> MemorySource {
    MemorySource::from_json(include_str!("../fixtures/books.json")).expect("fixture parses")
}

fn table<'a>(catalog: &'a Catalog, name: &str) -> &'a Table {
    catalog
        .tables()
        .find(|table| table.name == name)
        .unwrap_or_else(|| panic!("table {name} missing from catalog"))
}

fn table_names(catalog: &Catalog) -> Vec<&str> {
    catalog.tables().map(|table| table.name.as_str()).collect()
}

// ============================================================================
// Info Level Gating
// ============================================================================

#[tokio::test]
async fn test_minimum_level_retrieves_table_shells_only() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Minimum)
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert_eq!(catalog.database_info.product_name, "HyperSQL Database Engine");
    assert_eq!(catalog.driver_info.driver_name, "HSQL Database Engine Driver");
    assert_eq!(catalog.schemas.len(), 1);
    assert_eq!(
        table_names(&catalog),
        vec![
            "WRITERS",
            "TITLES",
            "TITLE_WRITERS",
            "PUBLISHERS",
            "SCRATCH",
            "WRITER_EMAILS",
        ]
    );
    for shell in catalog.tables() {
        assert!(shell.columns.is_empty(), "{} has columns", shell.name);
        assert!(shell.primary_key.is_none());
        assert!(shell.foreign_keys.is_empty());
        assert_eq!(shell.row_count(), None);
    }
}

#[tokio::test]
async fn test_standard_level_adds_columns_and_keys() {
    let source = books_source();
    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    let titles = table(&catalog, "TITLES");
    assert_eq!(titles.columns.len(), 5);
    let ordinals: Vec<u32> = titles.columns.iter().map(|column| column.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    assert_eq!(
        titles.primary_key.as_ref().map(|pk| pk.name.as_str()),
        Some("PK_TITLES")
    );
    assert_eq!(titles.foreign_keys.len(), 1);
    assert_eq!(titles.foreign_keys[0].name, "FK_PREVIOUS_EDITION");
    assert_eq!(
        titles.column("EDITION").and_then(|c| c.default_value.as_deref()),
        Some("1")
    );

    let writers = table(&catalog, "WRITERS");
    assert!(writers.column("ID").expect("ID column").in_primary_key);
    assert!(writers.column("EMAIL").expect("EMAIL column").in_unique_index);
    assert!(!writers.column("NAME").expect("NAME column").in_unique_index);

    // Remarks, view definitions and routines arrive one level up.
    assert_eq!(writers.remarks, None);
    assert_eq!(table(&catalog, "WRITER_EMAILS").view_definition(), None);
    assert_eq!(catalog.routines().count(), 0);

    // A table the backend reports no columns for stays in the catalog.
    assert!(table(&catalog, "SCRATCH").columns.is_empty());
}

#[tokio::test]
async fn test_detailed_level_adds_remarks_views_and_routines() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Detailed)
        .routines(InclusionRule::IncludeAll)
        .routine_parameters(InclusionRule::IncludeAll)
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert_eq!(
        table(&catalog, "WRITERS").remarks.as_deref(),
        Some("People who write titles")
    );
    assert_eq!(
        table(&catalog, "WRITER_EMAILS").view_definition(),
        Some("SELECT NAME, EMAIL FROM WRITERS")
    );

    let mut routines: Vec<&str> = catalog
        .routines()
        .map(|routine| routine.name.as_str())
        .collect();
    routines.sort_unstable();
    assert_eq!(routines, vec!["ECHO_TITLE", "NEW_WRITER"]);

    let echo = catalog
        .routines()
        .find(|routine| routine.name == "ECHO_TITLE")
        .expect("ECHO_TITLE retained");
    assert_eq!(echo.kind, RoutineKind::Function);
    assert_eq!(echo.specific_name, "ECHO_TITLE_10101");
    assert_eq!(
        echo.return_type.as_ref().map(|t| t.name.as_str()),
        Some("VARCHAR(255)")
    );
    assert_eq!(echo.parameters.len(), 1);

    let new_writer = catalog
        .routines()
        .find(|routine| routine.name == "NEW_WRITER")
        .expect("NEW_WRITER retained");
    assert_eq!(new_writer.kind, RoutineKind::Procedure);
    let modes: Vec<ParameterMode> = new_writer
        .parameters
        .iter()
        .map(|parameter| parameter.mode)
        .collect();
    assert_eq!(
        modes,
        vec![ParameterMode::In, ParameterMode::In, ParameterMode::Out]
    );

    // Sequences, synonyms and row counts stay behind the maximum gate.
    assert!(catalog.schemas[0].sequences.is_empty());
    assert!(catalog.schemas[0].synonyms.is_empty());
    assert_eq!(table(&catalog, "TITLES").row_count(), None);
}

#[tokio::test]
async fn test_maximum_level_adds_sequences_synonyms_and_row_counts() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Maximum)
        .sequences(InclusionRule::IncludeAll)
        .synonyms(InclusionRule::IncludeAll)
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    let schema = &catalog.schemas[0];
    assert_eq!(schema.sequences.len(), 1);
    assert_eq!(schema.sequences[0].name, "TITLE_ID_SEQ");
    assert_eq!(schema.sequences[0].start, Some(1));
    assert_eq!(schema.sequences[0].increment, Some(1));
    assert!(!schema.sequences[0].cycles);

    assert_eq!(schema.synonyms.len(), 1);
    assert_eq!(schema.synonyms[0].name, "PUBLICATIONS");
    assert_eq!(schema.synonyms[0].referenced_object, "TITLES");

    assert_eq!(table(&catalog, "TITLES").row_count(), Some(12));
    assert_eq!(table(&catalog, "PUBLISHERS").row_count(), Some(0));
    // The fixture records no count for SCRATCH, so it stays unknown.
    assert_eq!(table(&catalog, "SCRATCH").row_count(), None);
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_temporary_table_type_filter() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Minimum)
        .table_types(["GLOBAL TEMPORARY"])
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert_eq!(catalog.schemas.len(), 1);
    assert_eq!(table_names(&catalog), vec!["TEMP_AUTHOR_LIST"]);
}

#[tokio::test]
async fn test_default_table_types_drop_temporary_tables() {
    let source = books_source();
    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    assert!(!table_names(&catalog).contains(&"TEMP_AUTHOR_LIST"));
}

#[tokio::test]
async fn test_excluding_a_table_prunes_keys_that_reference_it() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .exclude_tables("BOOKS\\.TITLES")
        .expect("valid pattern")
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert!(!table_names(&catalog).contains(&"TITLES"));
    // TITLE_WRITERS declared a key into TITLES; it must not survive.
    assert!(table(&catalog, "TITLE_WRITERS").foreign_keys.is_empty());
    for survivor in catalog.tables() {
        for foreign_key in &survivor.foreign_keys {
            for pair in &foreign_key.pairs {
                assert_ne!(pair.referenced.table, "TITLES");
                assert_ne!(pair.referencing.table, "TITLES");
            }
        }
    }
    // No inferred association may touch the excluded table either.
    for association in &catalog.weak_associations {
        assert_ne!(association.referencing().table, "TITLES");
        assert_ne!(association.referenced().table, "TITLES");
    }
}

#[tokio::test]
async fn test_excluded_schema_yields_empty_catalog() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .exclude_schemas("BOOKS")
        .expect("valid pattern")
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert!(catalog.schemas.is_empty());
    assert_eq!(catalog.tables().count(), 0);
}

#[tokio::test]
async fn test_no_empty_tables_drops_zero_count_tables() {
    let source = books_source();
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Maximum)
        .no_empty_tables(true)
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    let names = table_names(&catalog);
    assert!(!names.contains(&"PUBLISHERS"), "zero rows, must be dropped");
    assert!(names.contains(&"TITLES"));
    // Unknown counts are not zero counts.
    assert!(names.contains(&"SCRATCH"));
    // Inference ran after the reduction, so nothing points at the
    // dropped table.
    for association in &catalog.weak_associations {
        assert_ne!(association.referenced().table, "PUBLISHERS");
    }
}

// ============================================================================
// Graceful Degradation
// ============================================================================

#[tokio::test]
async fn test_unavailable_source_aborts_the_crawl() {
    let source = books_source().with_unavailable("connection refused");

    let error = crawl(&source, CrawlOptions::default())
        .await
        .expect_err("crawl aborts");
    assert!(matches!(error, CrawlError::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_failure_on_one_table_keeps_the_rest() {
    let source = books_source().with_failure(
        operations::LIST_COLUMNS,
        "BOOKS.TITLES",
        "socket reset by peer",
    );

    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    // The failing table degrades to a shell; its neighbors are intact.
    assert!(table(&catalog, "TITLES").columns.is_empty());
    assert_eq!(table(&catalog, "WRITERS").columns.len(), 3);
}

#[tokio::test]
async fn test_unsupported_operations_leave_empty_collections() {
    let source = books_source()
        .with_unsupported(operations::LIST_SEQUENCES)
        .with_unsupported(operations::LIST_SYNONYMS)
        .with_unsupported(operations::ROW_COUNT);
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Maximum)
        .sequences(InclusionRule::IncludeAll)
        .synonyms(InclusionRule::IncludeAll)
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    assert!(catalog.schemas[0].sequences.is_empty());
    assert!(catalog.schemas[0].synonyms.is_empty());
    assert!(catalog.tables().all(|table| table.row_count().is_none()));
    assert_eq!(table(&catalog, "TITLES").columns.len(), 5);
}

#[tokio::test]
async fn test_stage_deadline_keeps_earlier_stages() {
    let source = books_source().with_delay(operations::ROW_COUNT, Duration::from_secs(5));
    let options = CrawlOptions::builder()
        .load_row_counts(true)
        .stage_timeout(Duration::from_millis(50))
        .build();

    let catalog = crawl(&source, options).await.expect("crawl succeeds");

    // Everything attached before the stalled stage is intact.
    assert_eq!(table(&catalog, "TITLES").columns.len(), 5);
    assert!(table(&catalog, "TITLES").primary_key.is_some());
    assert_eq!(table(&catalog, "TITLES").foreign_keys.len(), 1);
    // The stalled stage contributed nothing.
    assert!(catalog.tables().all(|table| table.row_count().is_none()));
}

// ============================================================================
// Ordinal Repair
// ============================================================================

#[tokio::test]
async fn test_ordinals_renumber_contiguously() {
    // Gaps, a duplicate and a missing ordinal, as backends report them.
    let fixture = r#"{
        "schemas": [{
            "name": "PUBLIC",
            "tables": [{
                "name": "GAPPY",
                "columns": [
                    { "name": "A", "ordinal": 10, "data_type": "INTEGER" },
                    { "name": "B", "data_type": "INTEGER" },
                    { "name": "C", "ordinal": 2, "data_type": "INTEGER" },
                    { "name": "D", "ordinal": 2, "data_type": "INTEGER" }
                ]
            }]
        }]
    }"#;
    let source = MemorySource::from_json(fixture).expect("fixture parses");

    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    let gappy = table(&catalog, "GAPPY");
    let order: Vec<(&str, u32)> = gappy
        .columns
        .iter()
        .map(|column| (column.name.as_str(), column.ordinal))
        .collect();
    // Reported ordinals decide order, listing position breaks the tie,
    // unreported ordinals go last; positions come out contiguous.
    assert_eq!(order, vec![("C", 1), ("D", 2), ("A", 3), ("B", 4)]);
}

// ============================================================================
// Determinism
// ============================================================================

#[tokio::test]
async fn test_same_options_crawl_the_same_catalog() {
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Maximum)
        .routines(InclusionRule::IncludeAll)
        .sequences(InclusionRule::IncludeAll)
        .synonyms(InclusionRule::IncludeAll)
        .build();

    let first = crawl(&books_source(), options.clone())
        .await
        .expect("first crawl");
    let second = crawl(&books_source(), options).await.expect("second crawl");

    assert_eq!(table_names(&first), table_names(&second));
    let associations = |catalog: &Catalog| -> Vec<String> {
        catalog
            .weak_associations
            .iter()
            .map(|association| association.to_string())
            .collect()
    };
    assert_eq!(associations(&first), associations(&second));
    assert_eq!(
        first.crawl_info.database_version,
        second.crawl_info.database_version
    );
}
