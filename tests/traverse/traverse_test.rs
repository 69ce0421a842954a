//! Integration tests for catalog traversal over a crawled fixture.
//!
//! A recording handler captures every callback in order, which makes
//! the protocol itself (header, info, body, end) assertable as a plain
//! transcript. The same fixture is crawled fresh for each test.

use insta::assert_snapshot;
use orbweaver::catalog::{CrawlInfo, DatabaseInfo, DriverInfo, Routine, Sequence, Synonym, Table};
use orbweaver::config::CrawlOptions;
use orbweaver::crawl::crawl;
use orbweaver::inclusion::InclusionRule;
use orbweaver::inference::WeakAssociation;
use orbweaver::level::InfoLevel;
use orbweaver::source::MemorySource;
use orbweaver::traverse::{
    HandlerResult, NamedObjectSort, Phase, TraversalError, TraversalHandler, TraversalOptions,
    Traverser,
};

fn books_source() -> MemorySource {
    MemorySource::from_json(include_str!("../fixtures/books.json")).expect("fixture parses")
}

fn full_options() -> CrawlOptions {
    CrawlOptions::builder()
        .info_level(InfoLevel::Maximum)
        .routines(InclusionRule::IncludeAll)
        .routine_parameters(InclusionRule::IncludeAll)
        .sequences(InclusionRule::IncludeAll)
        .synonyms(InclusionRule::IncludeAll)
        .build()
}

/// Records one line per callback so a whole traversal can be compared
/// as a transcript.
#[derive(Default)]
struct Recorder {
    transcript: Vec<String>,
}

impl TraversalHandler for Recorder {
    fn begin(&mut self) -> HandlerResult {
        self.transcript.push("begin".into());
        Ok(())
    }

    fn handle_header_start(&mut self) -> HandlerResult {
        self.transcript.push("header:start".into());
        Ok(())
    }

    fn handle_crawl_info(&mut self, _info: &CrawlInfo) -> HandlerResult {
        self.transcript.push("header:crawl-info".into());
        Ok(())
    }

    fn handle_header_end(&mut self) -> HandlerResult {
        self.transcript.push("header:end".into());
        Ok(())
    }

    fn handle_info_start(&mut self) -> HandlerResult {
        self.transcript.push("info:start".into());
        Ok(())
    }

    fn handle_database_info(&mut self, info: &DatabaseInfo) -> HandlerResult {
        self.transcript.push(format!("database {}", info.product_name));
        Ok(())
    }

    fn handle_driver_info(&mut self, info: &DriverInfo) -> HandlerResult {
        self.transcript.push(format!("driver {}", info.driver_name));
        Ok(())
    }

    fn handle_info_end(&mut self) -> HandlerResult {
        self.transcript.push("info:end".into());
        Ok(())
    }

    fn handle_table(&mut self, table: &Table, associations: &[&WeakAssociation]) -> HandlerResult {
        self.transcript
            .push(format!("table {} [{}]", table.name, associations.len()));
        Ok(())
    }

    fn handle_routine(&mut self, routine: &Routine) -> HandlerResult {
        self.transcript.push(format!("routine {}", routine.name));
        Ok(())
    }

    fn handle_sequence(&mut self, sequence: &Sequence) -> HandlerResult {
        self.transcript.push(format!("sequence {}", sequence.name));
        Ok(())
    }

    fn handle_synonym(&mut self, synonym: &Synonym) -> HandlerResult {
        self.transcript.push(format!("synonym {}", synonym.name));
        Ok(())
    }

    fn end(&mut self) -> HandlerResult {
        self.transcript.push("end".into());
        Ok(())
    }
}

// ============================================================================
// Protocol Order
// ============================================================================

#[tokio::test]
async fn test_full_traversal_visits_in_protocol_order() {
    let source = books_source();
    let catalog = crawl(&source, full_options()).await.expect("crawl succeeds");

    let recorder = Traverser::new(&catalog, Recorder::default())
        .traverse()
        .expect("traversal succeeds");

    assert_eq!(
        recorder.transcript,
        vec![
            "begin",
            "header:start",
            "header:crawl-info",
            "header:end",
            "info:start",
            "database HyperSQL Database Engine",
            "driver HSQL Database Engine Driver",
            "info:end",
            "table WRITERS [2]",
            "table TITLES [1]",
            "table TITLE_WRITERS [1]",
            "table PUBLISHERS [1]",
            "table SCRATCH [0]",
            "table WRITER_EMAILS [1]",
            "routine ECHO_TITLE",
            "routine NEW_WRITER",
            "sequence TITLE_ID_SEQ",
            "synonym PUBLICATIONS",
            "end",
        ]
    );
}

#[tokio::test]
async fn test_alphabetical_sort_reorders_tables() {
    let source = books_source();
    let catalog = crawl(&source, full_options()).await.expect("crawl succeeds");

    let options = TraversalOptions {
        table_sort: NamedObjectSort::Alphabetical,
        routine_sort: NamedObjectSort::Alphabetical,
    };
    let recorder = Traverser::new(&catalog, Recorder::default())
        .with_options(options)
        .traverse()
        .expect("traversal succeeds");

    let tables: Vec<&String> = recorder
        .transcript
        .iter()
        .filter(|line| line.starts_with("table "))
        .collect();
    assert_eq!(
        tables,
        vec![
            "table PUBLISHERS [1]",
            "table SCRATCH [0]",
            "table TITLES [1]",
            "table TITLE_WRITERS [1]",
            "table WRITERS [2]",
            "table WRITER_EMAILS [1]",
        ]
    );
}

#[tokio::test]
async fn test_associations_arrive_with_their_table() {
    #[derive(Default)]
    struct WritersLinks {
        links: Vec<String>,
    }

    impl TraversalHandler for WritersLinks {
        fn handle_table(
            &mut self,
            table: &Table,
            associations: &[&WeakAssociation],
        ) -> HandlerResult {
            if table.name == "WRITERS" {
                self.links = associations.iter().map(ToString::to_string).collect();
            }
            Ok(())
        }
    }

    let source = books_source();
    let catalog = crawl(&source, full_options()).await.expect("crawl succeeds");

    let handler = Traverser::new(&catalog, WritersLinks::default())
        .traverse()
        .expect("traversal succeeds");

    assert_eq!(
        handler.links,
        vec![
            "BOOKS.TITLE_WRITERS.WRITER_ID ~~> BOOKS.WRITERS.ID",
            "BOOKS.WRITER_EMAILS.EMAIL ~~> BOOKS.WRITERS.EMAIL",
        ]
    );
}

// ============================================================================
// Failure and Misuse
// ============================================================================

#[tokio::test]
async fn test_handler_error_stops_the_body() {
    #[derive(Default)]
    struct TripsOnTitles {
        seen: Vec<String>,
    }

    impl TraversalHandler for TripsOnTitles {
        fn handle_table(&mut self, table: &Table, _: &[&WeakAssociation]) -> HandlerResult {
            self.seen.push(table.name.clone());
            if table.name == "TITLES" {
                return Err("no titles today".into());
            }
            Ok(())
        }
    }

    let source = books_source();
    let catalog = crawl(&source, full_options()).await.expect("crawl succeeds");

    let mut traverser = Traverser::new(&catalog, TripsOnTitles::default());
    traverser.begin().expect("begin succeeds");
    traverser.header().expect("header succeeds");
    traverser.info().expect("info succeeds");

    match traverser.body() {
        Err(TraversalError::Handler { phase, source }) => {
            assert_eq!(phase, Phase::Body);
            assert_eq!(source.to_string(), "no titles today");
        }
        other => panic!("expected a handler error, got {other:?}"),
    }

    let handler = traverser.into_handler();
    assert_eq!(handler.seen, vec!["WRITERS", "TITLES"]);
}

#[tokio::test]
async fn test_traversal_rejects_out_of_order_steps() {
    let source = books_source();
    let catalog = crawl(&source, full_options()).await.expect("crawl succeeds");

    let mut traverser = Traverser::new(&catalog, Recorder::default());

    let error = traverser.body().expect_err("body before begin fails");
    assert_eq!(
        error.to_string(),
        "body() is not allowed in the not started phase"
    );

    traverser.begin().expect("begin succeeds");
    let error = traverser.info().expect_err("info before header fails");
    assert!(matches!(
        error,
        TraversalError::InvalidState {
            step: "info",
            phase: Phase::Header,
        }
    ));
}

// ============================================================================
// Determinism
// ============================================================================

#[tokio::test]
async fn test_two_crawls_traverse_identically() {
    let source = books_source();
    let first = crawl(&source, full_options()).await.expect("crawl succeeds");
    let second = crawl(&source, full_options()).await.expect("crawl succeeds");

    let options = TraversalOptions {
        table_sort: NamedObjectSort::Alphabetical,
        routine_sort: NamedObjectSort::Alphabetical,
    };

    let mut stepwise = Traverser::new(&first, Recorder::default()).with_options(options);
    stepwise.begin().expect("begin succeeds");
    stepwise.header().expect("header succeeds");
    stepwise.info().expect("info succeeds");
    stepwise.body().expect("body succeeds");
    stepwise.end().expect("end succeeds");
    assert_eq!(stepwise.phase(), Phase::Finished);

    let one_shot = Traverser::new(&second, Recorder::default())
        .with_options(options)
        .traverse()
        .expect("traversal succeeds");

    assert_eq!(stepwise.into_handler().transcript, one_shot.transcript);
}

#[tokio::test]
async fn test_sorted_transcript_is_byte_stable() {
    let source = books_source();
    let catalog = crawl(&source, full_options()).await.expect("crawl succeeds");

    let options = TraversalOptions {
        table_sort: NamedObjectSort::Alphabetical,
        routine_sort: NamedObjectSort::Alphabetical,
    };
    let recorder = Traverser::new(&catalog, Recorder::default())
        .with_options(options)
        .traverse()
        .expect("traversal succeeds");

    assert_snapshot!(recorder.transcript.join("\n"), @r"
    begin
    header:start
    header:crawl-info
    header:end
    info:start
    database HyperSQL Database Engine
    driver HSQL Database Engine Driver
    info:end
    table PUBLISHERS [1]
    table SCRATCH [0]
    table TITLES [1]
    table TITLE_WRITERS [1]
    table WRITERS [2]
    table WRITER_EMAILS [1]
    routine ECHO_TITLE
    routine NEW_WRITER
    sequence TITLE_ID_SEQ
    synonym PUBLICATIONS
    end
    ");
}
