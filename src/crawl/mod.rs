//! Staged catalog retrieval.
//!
//! A crawl is a fixed pipeline of stages, each of which asks the
//! metadata source about one family of objects and attaches the
//! results to the catalog built by the stages before it:
//!
//! ```text
//! database-info ─ schemas ─ tables ─ columns ─ primary-keys
//!       ─ foreign-keys ─ indexes ─ routines ─ routine-parameters
//!       ─ sequences ─ synonyms ─ row-counts
//! ```
//!
//! The info level decides where the pipeline stops ([`Stage::is_active`]),
//! and inclusion rules decide which retrieved objects are kept. Stages
//! that would discard everything they retrieve are skipped outright, so
//! default options never touch routine, sequence, or synonym endpoints.
//!
//! Within a stage, per-object requests run concurrently through a
//! bounded buffer while the catalog itself is only touched from the
//! coordinating task. Results are buffered in request order, which
//! keeps catalog contents deterministic for a given source.
//!
//! # Example
//!
//! ```no_run
//! use orbweaver::config::CrawlOptions;
//! use orbweaver::crawl::Crawler;
//! use orbweaver::level::InfoLevel;
//! use orbweaver::source::MemorySource;
//!
//! # async fn run(source: MemorySource) -> orbweaver::error::CrawlResult<()> {
//! let options = CrawlOptions::builder()
//!     .info_level(InfoLevel::Detailed)
//!     .build();
//! let catalog = Crawler::new(&source, options).crawl().await?;
//! for table in catalog.tables() {
//!     println!("{}", table.full_name());
//! }
//! # Ok(())
//! # }
//! ```

mod columns;
mod extras;
mod indexes;
mod keys;
mod reduce;
mod routines;
mod schemas;
mod stage;
mod tables;

pub use stage::{Stage, PIPELINE};

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CrawlInfo, DatabaseInfo, DriverInfo};
use crate::config::{CrawlOptions, InferenceSettings};
use crate::error::{CrawlError, CrawlResult};
use crate::inference::{NamingConvention, WeakAssociationAnalyzer};
use crate::level::CrawlDepth;
use crate::source::{DatabaseInfoRow, DriverInfoRow, MetadataSource};

/// Upper bound on in-flight requests for one stage.
///
/// Honors both the configured ceiling and whatever parallelism the
/// source itself admits, and never drops below one.
pub(crate) fn request_limit(options: &CrawlOptions, source: &dyn MetadataSource) -> usize {
    options
        .max_concurrency
        .min(source.max_concurrent_requests())
        .max(1)
}

/// Runs the retrieval pipeline against a metadata source.
///
/// A crawler borrows its source for the duration of the run and owns
/// everything else it needs, so one source can back several crawls
/// with different options.
pub struct Crawler<'a> {
    source: &'a dyn MetadataSource,
    options: CrawlOptions,
    convention: NamingConvention,
    infer: bool,
}

impl<'a> Crawler<'a> {
    /// Creates a crawler with the default naming convention and
    /// weak-association inference enabled.
    pub fn new(source: &'a dyn MetadataSource, options: CrawlOptions) -> Self {
        Self {
            source,
            options,
            convention: NamingConvention::default(),
            infer: true,
        }
    }

    /// Replaces the naming convention used for inference.
    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Enables or disables weak-association inference.
    pub fn with_inference(mut self, enabled: bool) -> Self {
        self.infer = enabled;
        self
    }

    /// Applies file-based inference settings: the on/off switch and the
    /// naming convention they describe.
    pub fn with_inference_settings(self, settings: &InferenceSettings) -> Self {
        self.with_convention(settings.to_convention())
            .with_inference(settings.enabled)
    }

    /// Runs every active stage in pipeline order and returns the
    /// finished catalog.
    ///
    /// Only an unreachable source aborts the run. Stage-level failures
    /// are logged and leave the affected objects degraded, and a stage
    /// that overruns the configured deadline keeps whatever it attached
    /// before the cutoff.
    pub async fn crawl(&self) -> CrawlResult<Catalog> {
        let depth = self.options.depth();
        let mut catalog = Catalog::default();
        info!(level = %self.options.info_level, "starting metadata crawl");

        for &stage in PIPELINE {
            if !stage.is_active(&depth) {
                debug!(stage = %stage, "stage inactive at this info level");
                continue;
            }
            if self.skipped_by_rules(stage) {
                debug!(stage = %stage, "stage excluded by inclusion rules");
                continue;
            }
            match self.options.stage_timeout {
                Some(limit) => match timeout(limit, self.run_stage(stage, &depth, &mut catalog)).await {
                    Ok(result) => result?,
                    Err(_) => {
                        warn!(stage = %stage, "stage deadline passed, keeping partial results");
                    }
                },
                None => self.run_stage(stage, &depth, &mut catalog).await?,
            }
        }

        reduce::reduce(&mut catalog, &self.options);

        if self.infer {
            let analyzer = WeakAssociationAnalyzer::new(self.convention.clone());
            let associations = analyzer.analyze(&catalog);
            catalog.weak_associations = associations;
        }

        info!(
            schemas = catalog.schemas.len(),
            tables = catalog.tables().count(),
            associations = catalog.weak_associations.len(),
            "crawl complete"
        );
        Ok(catalog)
    }

    /// True when a stage could only ever retrieve objects the rules
    /// would then discard.
    fn skipped_by_rules(&self, stage: Stage) -> bool {
        match stage {
            Stage::Routines | Stage::RoutineParameters => {
                self.options.routines.excludes_everything()
                    || self.options.routine_kinds.is_empty()
            }
            Stage::Sequences => self.options.sequences.excludes_everything(),
            Stage::Synonyms => self.options.synonyms.excludes_everything(),
            _ => false,
        }
    }

    async fn run_stage(
        &self,
        stage: Stage,
        depth: &CrawlDepth,
        catalog: &mut Catalog,
    ) -> CrawlResult<()> {
        match stage {
            Stage::DatabaseInfo => self.retrieve_info(catalog).await,
            Stage::Schemas => schemas::retrieve(self.source, &self.options, catalog).await,
            Stage::Tables => tables::retrieve(self.source, &self.options, depth, catalog).await,
            Stage::Columns => columns::retrieve(self.source, &self.options, depth, catalog).await,
            Stage::PrimaryKeys => {
                keys::retrieve_primary_keys(self.source, &self.options, catalog).await
            }
            Stage::ForeignKeys => {
                keys::retrieve_foreign_keys(self.source, &self.options, catalog).await
            }
            Stage::Indexes => indexes::retrieve(self.source, &self.options, catalog).await,
            Stage::Routines => {
                routines::retrieve_routines(self.source, &self.options, catalog).await
            }
            Stage::RoutineParameters => {
                routines::retrieve_parameters(self.source, &self.options, catalog).await
            }
            Stage::Sequences => extras::retrieve_sequences(self.source, &self.options, catalog).await,
            Stage::Synonyms => extras::retrieve_synonyms(self.source, &self.options, catalog).await,
            Stage::RowCounts => {
                extras::retrieve_row_counts(self.source, &self.options, catalog).await
            }
        }
    }

    /// Retrieves the database and driver descriptors.
    ///
    /// Descriptor failures other than an unreachable source degrade to
    /// the unknown sentinels rather than aborting, so a catalog always
    /// carries headers.
    async fn retrieve_info(&self, catalog: &mut Catalog) -> CrawlResult<()> {
        match self.source.database_info().await {
            Ok(row) => catalog.database_info = database_info_from_row(row),
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(error = %error, "database descriptor retrieval failed");
            }
        }
        match self.source.driver_info().await {
            Ok(row) => catalog.driver_info = driver_info_from_row(row),
            Err(error) if error.is_fatal() => return Err(CrawlError::SourceUnavailable(error)),
            Err(error) => {
                warn!(error = %error, "driver descriptor retrieval failed");
            }
        }
        catalog.crawl_info = CrawlInfo::new(&catalog.database_info, &catalog.driver_info);
        Ok(())
    }
}

fn database_info_from_row(row: DatabaseInfoRow) -> DatabaseInfo {
    let defaults = DatabaseInfo::default();
    DatabaseInfo {
        product_name: row.product_name.unwrap_or(defaults.product_name),
        product_version: row.product_version.unwrap_or(defaults.product_version),
        user_name: row.user_name,
    }
}

fn driver_info_from_row(row: DriverInfoRow) -> DriverInfo {
    let defaults = DriverInfo::default();
    DriverInfo {
        driver_name: row.driver_name.unwrap_or(defaults.driver_name),
        driver_version: row.driver_version.unwrap_or(defaults.driver_version),
        connection_url: row.connection_url,
    }
}

/// Crawls a metadata source with the given options.
///
/// Convenience wrapper over [`Crawler`] with inference enabled and the
/// default naming convention.
pub async fn crawl(source: &dyn MetadataSource, options: CrawlOptions) -> CrawlResult<Catalog> {
    Crawler::new(source, options).crawl().await
}
