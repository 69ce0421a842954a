//! Crawl options.
//!
//! Options bound one crawl: how deep it goes, which objects it keeps,
//! and how hard it leans on the source. Invalid patterns fail when the
//! options are built, never mid-crawl.

use std::collections::BTreeSet;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::catalog::RoutineKind;
use crate::error::ConfigError;
use crate::inclusion::InclusionRule;
use crate::level::{CrawlDepth, InfoLevel};

/// Table types retained when no explicit allow-list is given.
static DEFAULT_TABLE_TYPES: Lazy<BTreeSet<String>> = Lazy::new(|| {
    ["TABLE", "BASE TABLE", "VIEW"]
        .into_iter()
        .map(String::from)
        .collect()
});

/// Everything that shapes one crawl.
///
/// The zero-configuration default crawls at [`InfoLevel::Standard`],
/// keeps every schema, table, and column, and leaves routines,
/// sequences, and synonyms out until a rule opts them in.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// How much detail to retrieve.
    pub info_level: InfoLevel,
    /// Rule against schema full names.
    pub schemas: InclusionRule,
    /// Rule against table full names.
    pub tables: InclusionRule,
    /// Rule against column full names.
    pub columns: InclusionRule,
    /// Rule against routine full names.
    pub routines: InclusionRule,
    /// Rule against routine parameter names.
    pub routine_parameters: InclusionRule,
    /// Rule against sequence full names.
    pub sequences: InclusionRule,
    /// Rule against synonym full names.
    pub synonyms: InclusionRule,
    /// Allow-list of backend-reported table type strings, matched
    /// case-sensitively. `None` keeps every type.
    pub table_types: Option<BTreeSet<String>>,
    /// Routine kinds to keep.
    pub routine_kinds: BTreeSet<RoutineKind>,
    /// Count rows even when the level alone would not.
    pub load_row_counts: bool,
    /// Drop tables known to hold zero rows after the crawl.
    pub no_empty_tables: bool,
    /// Upper bound on in-flight source requests within a stage. The
    /// source's own advertised limit caps this further.
    pub max_concurrency: usize,
    /// Deadline for any single retrieval stage.
    pub stage_timeout: Option<Duration>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            info_level: InfoLevel::default(),
            schemas: InclusionRule::IncludeAll,
            tables: InclusionRule::IncludeAll,
            columns: InclusionRule::IncludeAll,
            routines: InclusionRule::ExcludeAll,
            routine_parameters: InclusionRule::ExcludeAll,
            sequences: InclusionRule::ExcludeAll,
            synonyms: InclusionRule::ExcludeAll,
            table_types: Some(DEFAULT_TABLE_TYPES.clone()),
            routine_kinds: [RoutineKind::Function, RoutineKind::Procedure]
                .into_iter()
                .collect(),
            load_row_counts: false,
            no_empty_tables: false,
            max_concurrency: 8,
            stage_timeout: None,
        }
    }
}

impl CrawlOptions {
    pub fn builder() -> CrawlOptionsBuilder {
        CrawlOptionsBuilder::default()
    }

    /// Stage gates implied by the level and the row-count override.
    pub fn depth(&self) -> CrawlDepth {
        let depth = self.info_level.depth();
        if self.load_row_counts {
            depth.with_row_counts()
        } else {
            depth
        }
    }

    /// True when a table of this backend-reported type is retained.
    pub fn keeps_table_type(&self, type_name: &str) -> bool {
        match &self.table_types {
            None => true,
            Some(types) => types.contains(type_name),
        }
    }

    /// True when routines of this kind are retained.
    pub fn keeps_routine_kind(&self, kind: RoutineKind) -> bool {
        self.routine_kinds.contains(&kind)
    }
}

/// Builder for [`CrawlOptions`].
///
/// Pattern-taking methods compile their regex immediately and fail with
/// [`ConfigError::InvalidPattern`], so a bad rule never reaches a crawl.
///
/// # Example
///
/// ```ignore
/// let options = CrawlOptions::builder()
///     .info_level(InfoLevel::Maximum)
///     .include_tables(".*BOOKS.*")?
///     .exclude_columns(".*\\.PASSWORD")?
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrawlOptionsBuilder {
    options: CrawlOptions,
}

impl CrawlOptionsBuilder {
    pub fn info_level(mut self, level: InfoLevel) -> Self {
        self.options.info_level = level;
        self
    }

    /// Replaces the schema rule wholesale.
    pub fn schemas(mut self, rule: InclusionRule) -> Self {
        self.options.schemas = rule;
        self
    }

    pub fn include_schemas(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.schemas = InclusionRule::include(pattern)?;
        Ok(self)
    }

    pub fn exclude_schemas(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.schemas = InclusionRule::exclude(pattern)?;
        Ok(self)
    }

    /// Replaces the table rule wholesale.
    pub fn tables(mut self, rule: InclusionRule) -> Self {
        self.options.tables = rule;
        self
    }

    pub fn include_tables(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.tables = InclusionRule::include(pattern)?;
        Ok(self)
    }

    pub fn exclude_tables(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.tables = InclusionRule::exclude(pattern)?;
        Ok(self)
    }

    /// Replaces the column rule wholesale.
    pub fn columns(mut self, rule: InclusionRule) -> Self {
        self.options.columns = rule;
        self
    }

    pub fn include_columns(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.columns = InclusionRule::include(pattern)?;
        Ok(self)
    }

    pub fn exclude_columns(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.columns = InclusionRule::exclude(pattern)?;
        Ok(self)
    }

    /// Replaces the routine rule wholesale.
    pub fn routines(mut self, rule: InclusionRule) -> Self {
        self.options.routines = rule;
        self
    }

    pub fn include_routines(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.routines = InclusionRule::include(pattern)?;
        Ok(self)
    }

    pub fn exclude_routines(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.routines = InclusionRule::exclude(pattern)?;
        Ok(self)
    }

    /// Replaces the routine parameter rule wholesale.
    pub fn routine_parameters(mut self, rule: InclusionRule) -> Self {
        self.options.routine_parameters = rule;
        self
    }

    pub fn exclude_routine_parameters(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.routine_parameters = InclusionRule::exclude(pattern)?;
        Ok(self)
    }

    /// Replaces the sequence rule wholesale.
    pub fn sequences(mut self, rule: InclusionRule) -> Self {
        self.options.sequences = rule;
        self
    }

    pub fn include_sequences(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.sequences = InclusionRule::include(pattern)?;
        Ok(self)
    }

    /// Replaces the synonym rule wholesale.
    pub fn synonyms(mut self, rule: InclusionRule) -> Self {
        self.options.synonyms = rule;
        self
    }

    pub fn include_synonyms(mut self, pattern: &str) -> Result<Self, ConfigError> {
        self.options.synonyms = InclusionRule::include(pattern)?;
        Ok(self)
    }

    /// Restricts retained tables to these backend type strings.
    pub fn table_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.table_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Keeps tables of every backend type.
    pub fn all_table_types(mut self) -> Self {
        self.options.table_types = None;
        self
    }

    pub fn routine_kinds<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = RoutineKind>,
    {
        self.options.routine_kinds = kinds.into_iter().collect();
        self
    }

    /// Parses routine kind names case-insensitively; an unknown name is
    /// [`ConfigError::UnknownRoutineType`].
    pub fn routine_kinds_named<I, S>(mut self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.routine_kinds = names
            .into_iter()
            .map(|name| RoutineKind::parse(name.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub fn load_row_counts(mut self, load: bool) -> Self {
        self.options.load_row_counts = load;
        self
    }

    pub fn no_empty_tables(mut self, reduce: bool) -> Self {
        self.options.no_empty_tables = reduce;
        self
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.options.max_concurrency = limit;
        self
    }

    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.options.stage_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> CrawlOptions {
        self.options
    }
}
