//! Integration tests for crawl option defaults and validation.
//!
//! Checks the documented default rule set, the mapping from patterns to
//! include/exclude rules, routine kind parsing, and the source registry
//! lookups options resolution relies on.

use orbweaver::catalog::RoutineKind;
use orbweaver::config::CrawlOptions;
use orbweaver::error::ConfigError;
use orbweaver::inclusion::InclusionRule;
use orbweaver::level::InfoLevel;
use orbweaver::source::{SourceDescriptor, SourceRegistry};

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_default_rule_set() {
    let options = CrawlOptions::default();

    assert_eq!(options.info_level, InfoLevel::Standard);

    // Relational core defaults open, optional kinds default closed.
    assert!(matches!(options.schemas, InclusionRule::IncludeAll));
    assert!(matches!(options.tables, InclusionRule::IncludeAll));
    assert!(matches!(options.columns, InclusionRule::IncludeAll));
    assert!(matches!(options.routines, InclusionRule::ExcludeAll));
    assert!(matches!(
        options.routine_parameters,
        InclusionRule::ExcludeAll
    ));
    assert!(matches!(options.sequences, InclusionRule::ExcludeAll));
    assert!(matches!(options.synonyms, InclusionRule::ExcludeAll));

    assert!(!options.load_row_counts);
    assert!(!options.no_empty_tables);
}

#[test]
fn test_default_table_types() {
    let options = CrawlOptions::default();

    for kept in ["TABLE", "BASE TABLE", "VIEW"] {
        assert!(options.keeps_table_type(kept), "{kept} must be kept");
    }
    assert!(!options.keeps_table_type("GLOBAL TEMPORARY"));
    // The filter compares exactly as the backend reports the type.
    assert!(!options.keeps_table_type("table"));

    let everything = CrawlOptions::builder().all_table_types().build();
    assert!(everything.keeps_table_type("GLOBAL TEMPORARY"));
    assert!(everything.keeps_table_type("ALIAS"));
}

#[test]
fn test_default_routine_kinds() {
    let options = CrawlOptions::default();
    assert!(options.keeps_routine_kind(RoutineKind::Function));
    assert!(options.keeps_routine_kind(RoutineKind::Procedure));
}

// ============================================================================
// Pattern Rules
// ============================================================================

#[test]
fn test_include_and_exclude_pattern_mapping() {
    let options = CrawlOptions::builder()
        .include_tables(".*regexp.*")
        .expect("valid pattern")
        .include_routines(".*regexp.*")
        .expect("valid pattern")
        .exclude_columns(".*regexp.*")
        .expect("valid pattern")
        .build();

    // Tables and routines keep only matching names.
    assert!(options.tables.matches("HAS_regexp_INSIDE"));
    assert!(!options.tables.matches("PLAIN"));
    assert!(options.routines.matches("HAS_regexp_INSIDE"));
    assert!(!options.routines.matches("PLAIN"));

    // Columns keep everything except matching names.
    assert!(!options.columns.matches("HAS_regexp_INSIDE"));
    assert!(options.columns.matches("PLAIN"));
}

#[test]
fn test_exclude_is_the_negation_of_include() {
    let include = InclusionRule::include("BOOKS\\..*").expect("valid pattern");
    let exclude = InclusionRule::exclude("BOOKS\\..*").expect("valid pattern");

    for name in ["BOOKS.TITLES", "BOOKS.", "PUBLIC.TITLES", "BOOKS", ""] {
        assert_eq!(
            include.matches(name),
            !exclude.matches(name),
            "rules disagree on {name:?}"
        );
    }
}

#[test]
fn test_patterns_match_whole_names_only() {
    let rule = InclusionRule::include("TITLES").expect("valid pattern");
    assert!(rule.matches("TITLES"));
    assert!(!rule.matches("BOOKS.TITLES"));
    assert!(!rule.matches("TITLES_ARCHIVE"));
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let error = CrawlOptions::builder()
        .include_tables("(unclosed")
        .expect_err("pattern must not compile");
    match error {
        ConfigError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Routine Kinds
// ============================================================================

#[test]
fn test_routine_kind_names_parse_case_insensitively() {
    let options = CrawlOptions::builder()
        .routine_kinds_named(["FUNCTION", "procedure"])
        .expect("both names known")
        .build();
    assert!(options.keeps_routine_kind(RoutineKind::Function));
    assert!(options.keeps_routine_kind(RoutineKind::Procedure));
}

#[test]
fn test_unknown_routine_kind_name_is_rejected() {
    let error = CrawlOptions::builder()
        .routine_kinds_named(["function", "trigger"])
        .expect_err("trigger is not a routine kind");
    match error {
        ConfigError::UnknownRoutineType(name) => assert_eq!(name, "trigger"),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Depth Resolution
// ============================================================================

#[test]
fn test_row_count_flag_deepens_any_level() {
    let options = CrawlOptions::builder()
        .info_level(InfoLevel::Minimum)
        .load_row_counts(true)
        .build();
    let depth = options.depth();
    assert!(depth.row_counts);
    assert!(!depth.columns);
}

#[test]
fn test_depth_follows_the_level() {
    let depth = CrawlOptions::builder()
        .info_level(InfoLevel::Detailed)
        .build()
        .depth();
    assert!(depth.columns && depth.routines && depth.remarks);
    assert!(!depth.sequences && !depth.row_counts);
}

// ============================================================================
// Source Registry
// ============================================================================

#[test]
fn test_registry_lookup_and_fallback() {
    let mut registry = SourceRegistry::new();
    registry.register(SourceDescriptor::new(
        "hsqldb",
        "HyperSQL DataBase",
        "jdbc:hsqldb:",
    ));
    registry.register(SourceDescriptor::new(
        "postgresql",
        "PostgreSQL",
        "jdbc:postgresql:",
    ));

    assert_eq!(registry.lookup("hsqldb").title, "HyperSQL DataBase");
    assert!(registry.is_registered("postgresql"));

    // Unknown identifiers answer with the documented fallback.
    let fallback = registry.lookup("oracle");
    assert_eq!(fallback.id, registry.fallback().id);
    assert!(!registry.is_registered("oracle"));
}

#[test]
fn test_registry_url_lookup() {
    let mut registry = SourceRegistry::new();
    registry.register(SourceDescriptor::new(
        "hsqldb",
        "HyperSQL DataBase",
        "jdbc:hsqldb:",
    ));

    let matched = registry.lookup_by_url("jdbc:hsqldb:mem:books");
    assert_eq!(matched.id, "hsqldb");

    // Unclaimed URLs resolve to the fallback, never to an error.
    let unclaimed = registry.lookup_by_url("jdbc:oracle:thin:@db");
    assert_eq!(unclaimed.id, registry.fallback().id);
}

#[test]
fn test_registry_iterates_in_registration_order() {
    let mut registry = SourceRegistry::new();
    registry.register(SourceDescriptor::new("z", "Z First", "jdbc:z:"));
    registry.register(SourceDescriptor::new("a", "A Second", "jdbc:a:"));

    let ids: Vec<&str> = registry
        .iter()
        .map(|descriptor| descriptor.id.as_str())
        .collect();
    assert_eq!(ids, vec!["z", "a"]);
}
