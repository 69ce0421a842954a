//! Integration tests for weak association inference over a crawled
//! catalog.
//!
//! The fixture models a book database where the junction table omits
//! half of its foreign keys and a view repeats a uniquely indexed
//! column, so every association inferred here is one the backend never
//! declared.

use insta::assert_snapshot;
use orbweaver::catalog::{Catalog, Table};
use orbweaver::config::CrawlOptions;
use orbweaver::crawl::{crawl, Crawler};
use orbweaver::inference::{NamingConvention, WeakAssociationAnalyzer};
use orbweaver::source::MemorySource;

fn books_source() -> MemorySource {
    MemorySource::from_json(include_str!("../fixtures/books.json")).expect("fixture parses")
}

fn table<'a>(catalog: &'a Catalog, name: &str) -> &'a Table {
    catalog
        .tables()
        .find(|table| table.name == name)
        .unwrap_or_else(|| panic!("table {name} missing from catalog"))
}

fn rendered(catalog: &Catalog) -> Vec<String> {
    catalog
        .weak_associations
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ============================================================================
// Inference Over a Crawl
// ============================================================================

#[tokio::test]
async fn test_inferred_associations_over_books() {
    let source = books_source();

    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    let joined = rendered(&catalog).join("\n");
    assert_snapshot!(joined, @r"
    BOOKS.TITLES.PUBLISHER_ID ~~> BOOKS.PUBLISHERS.ID
    BOOKS.TITLE_WRITERS.WRITER_ID ~~> BOOKS.WRITERS.ID
    BOOKS.WRITER_EMAILS.EMAIL ~~> BOOKS.WRITERS.EMAIL
    ");
}

#[tokio::test]
async fn test_declared_foreign_keys_are_not_reinvented() {
    let source = books_source();

    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    // TITLE_WRITERS.TITLE_ID lands in the same name bucket as
    // TITLES.ID but is already covered by FK_TW_TITLE.
    for association in rendered(&catalog) {
        assert!(
            !association.contains("TITLE_ID"),
            "declared link resurfaced as {association}"
        );
    }
}

#[tokio::test]
async fn test_inference_is_deterministic() {
    let source = books_source();

    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    let analyzer = WeakAssociationAnalyzer::new(NamingConvention::default());
    let first: Vec<String> = analyzer
        .analyze(&catalog)
        .iter()
        .map(ToString::to_string)
        .collect();
    let second: Vec<String> = analyzer
        .analyze(&catalog)
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first, rendered(&catalog));
}

// ============================================================================
// Convention Tuning
// ============================================================================

#[tokio::test]
async fn test_plural_folding_disabled_narrows_matches() {
    let source = books_source();

    // Without plural folding "WRITER_ID" normalizes to "writer" while
    // "WRITERS.ID" normalizes to "writers", so only the exact column
    // name match survives.
    let convention = NamingConvention::default().with_plural_folding(false);
    let catalog = Crawler::new(&source, CrawlOptions::default())
        .with_convention(convention)
        .crawl()
        .await
        .expect("crawl succeeds");

    assert_eq!(
        rendered(&catalog),
        vec!["BOOKS.WRITER_EMAILS.EMAIL ~~> BOOKS.WRITERS.EMAIL"]
    );
}

#[tokio::test]
async fn test_inference_can_be_switched_off() {
    let source = books_source();

    let catalog = Crawler::new(&source, CrawlOptions::default())
        .with_inference(false)
        .crawl()
        .await
        .expect("crawl succeeds");

    assert!(catalog.weak_associations.is_empty());
    assert!(catalog.tables().count() > 0, "crawl still filled the catalog");
}

// ============================================================================
// Catalog Queries
// ============================================================================

#[tokio::test]
async fn test_associations_for_sees_both_endpoints() {
    let source = books_source();

    let catalog = crawl(&source, CrawlOptions::default())
        .await
        .expect("crawl succeeds");

    let writers = table(&catalog, "WRITERS").table_ref();
    assert_eq!(catalog.associations_for(&writers).len(), 2);

    let junction = table(&catalog, "TITLE_WRITERS").table_ref();
    assert_eq!(catalog.associations_for(&junction).len(), 1);

    let publishers = table(&catalog, "PUBLISHERS").table_ref();
    assert_eq!(catalog.associations_for(&publishers).len(), 1);

    let scratch = table(&catalog, "SCRATCH").table_ref();
    assert!(catalog.associations_for(&scratch).is_empty());
}
