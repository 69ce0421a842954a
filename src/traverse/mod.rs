//! Read-only traversal of a finished catalog.
//!
//! A [`Traverser`] walks a catalog in a fixed protocol and reports
//! what it finds to a caller-supplied [`TraversalHandler`]. Formatters
//! and lint passes implement the handler trait; the traverser owns
//! ordering and phase sequencing so every consumer sees the catalog
//! the same way:
//!
//! ```text
//! not started ──begin()──▶ header ──header()──▶ info
//!        ──info()──▶ body ──end()──▶ finished
//! ```
//!
//! The header phase reports the crawl descriptor, the info phase the
//! database and driver descriptors, and the body phase every retained
//! schema object. Handlers that do not care about a phase simply keep
//! the default no-op methods; visibility decisions such as "do not
//! print driver details" belong to the handler, not the traverser.
//!
//! Within the body, schemas are visited in identifier order. Tables
//! and routines follow the configured [`NamedObjectSort`]; sequences
//! and synonyms are always visited in name order. Each table visit
//! carries the weak associations touching that table.
//!
//! # Example
//!
//! ```
//! use orbweaver::catalog::{Catalog, Table};
//! use orbweaver::inference::WeakAssociation;
//! use orbweaver::traverse::{HandlerResult, TraversalHandler, Traverser};
//!
//! struct TableCounter(usize);
//!
//! impl TraversalHandler for TableCounter {
//!     fn handle_table(
//!         &mut self,
//!         _table: &Table,
//!         _associations: &[&WeakAssociation],
//!     ) -> HandlerResult {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::default();
//! let counter = Traverser::new(&catalog, TableCounter(0)).traverse()?;
//! assert_eq!(counter.0, 0);
//! # Ok(())
//! # }
//! ```

mod order;

pub use order::NamedObjectSort;

use std::error::Error;
use std::fmt;

use thiserror::Error as ThisError;

use crate::catalog::{
    Catalog, CrawlInfo, DatabaseInfo, DriverInfo, Routine, Schema, Sequence, Synonym, Table,
};
use crate::inference::WeakAssociation;

/// Result type handler methods return.
///
/// Handlers report their own failures as boxed errors; the traverser
/// wraps them in [`TraversalError::Handler`] and stops.
pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Where a traversal currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has run yet.
    NotStarted,
    /// `begin` has run, header handlers are next.
    Header,
    /// Header handlers have run, info handlers are next.
    Info,
    /// Info handlers have run, object visits are next.
    Body,
    /// `end` has run, no further calls are allowed.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotStarted => "not started",
            Phase::Header => "header",
            Phase::Info => "info",
            Phase::Body => "body",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Errors raised while driving a traversal.
#[derive(Debug, ThisError)]
pub enum TraversalError {
    /// A step was invoked out of protocol order.
    #[error("{step}() is not allowed in the {phase} phase")]
    InvalidState {
        /// The step that was attempted.
        step: &'static str,
        /// The phase the traverser was in.
        phase: Phase,
    },

    /// A handler method failed, aborting the rest of the traversal.
    #[error("handler failed in the {phase} phase")]
    Handler {
        /// The phase the failing handler was invoked from.
        phase: Phase,
        /// The handler's own error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Result type for traverser steps.
pub type TraversalResult<T> = Result<T, TraversalError>;

/// Visit-order configuration for a traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOptions {
    /// Order tables are visited in within a schema.
    pub table_sort: NamedObjectSort,
    /// Order routines are visited in within a schema.
    pub routine_sort: NamedObjectSort,
}

/// Receiver for traversal events.
///
/// Every method has a no-op default, so implementations only override
/// the events they care about. Methods take `&mut self` because most
/// handlers accumulate output.
pub trait TraversalHandler {
    /// Called once, before anything else.
    fn begin(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Opens the header phase.
    fn handle_header_start(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Reports the descriptor of the crawl that built the catalog.
    fn handle_crawl_info(&mut self, _info: &CrawlInfo) -> HandlerResult {
        Ok(())
    }

    /// Closes the header phase.
    fn handle_header_end(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Opens the info phase.
    fn handle_info_start(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Reports what the database said about itself.
    fn handle_database_info(&mut self, _info: &DatabaseInfo) -> HandlerResult {
        Ok(())
    }

    /// Reports what the driver said about itself.
    fn handle_driver_info(&mut self, _info: &DriverInfo) -> HandlerResult {
        Ok(())
    }

    /// Closes the info phase.
    fn handle_info_end(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Visits one table, with the weak associations touching it.
    fn handle_table(&mut self, _table: &Table, _associations: &[&WeakAssociation]) -> HandlerResult {
        Ok(())
    }

    /// Visits one routine.
    fn handle_routine(&mut self, _routine: &Routine) -> HandlerResult {
        Ok(())
    }

    /// Visits one sequence.
    fn handle_sequence(&mut self, _sequence: &Sequence) -> HandlerResult {
        Ok(())
    }

    /// Visits one synonym.
    fn handle_synonym(&mut self, _synonym: &Synonym) -> HandlerResult {
        Ok(())
    }

    /// Called once, after everything else.
    fn end(&mut self) -> HandlerResult {
        Ok(())
    }
}

/// Drives a [`TraversalHandler`] over a finished catalog.
///
/// The stepwise methods [`begin`](Self::begin), [`header`](Self::header),
/// [`info`](Self::info), [`body`](Self::body), and [`end`](Self::end)
/// must run in that order; [`traverse`](Self::traverse) runs them all
/// and hands the handler back. The catalog is borrowed shared, so a
/// handler failure never leaves it half-modified.
pub struct Traverser<'a, H> {
    catalog: &'a Catalog,
    handler: H,
    options: TraversalOptions,
    phase: Phase,
}

impl<'a, H: TraversalHandler> Traverser<'a, H> {
    /// Creates a traverser with natural visit order.
    pub fn new(catalog: &'a Catalog, handler: H) -> Self {
        Self {
            catalog,
            handler,
            options: TraversalOptions::default(),
            phase: Phase::NotStarted,
        }
    }

    /// Replaces the visit-order configuration.
    pub fn with_options(mut self, options: TraversalOptions) -> Self {
        self.options = options;
        self
    }

    /// The phase the traverser is currently in.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Consumes the traverser and returns the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Runs the whole protocol and returns the handler.
    pub fn traverse(mut self) -> Result<H, TraversalError> {
        self.begin()?;
        self.header()?;
        self.info()?;
        self.body()?;
        self.end()?;
        Ok(self.handler)
    }

    /// Enters the traversal. Allowed exactly once, before any other step.
    pub fn begin(&mut self) -> TraversalResult<()> {
        self.expect(Phase::NotStarted, "begin")?;
        let wrap = |source| TraversalError::Handler {
            phase: Phase::NotStarted,
            source,
        };
        self.handler.begin().map_err(wrap)?;
        self.phase = Phase::Header;
        Ok(())
    }

    /// Runs the header handlers and advances to the info phase.
    pub fn header(&mut self) -> TraversalResult<()> {
        self.expect(Phase::Header, "header")?;
        let wrap = |source| TraversalError::Handler {
            phase: Phase::Header,
            source,
        };
        self.handler.handle_header_start().map_err(wrap)?;
        self.handler
            .handle_crawl_info(&self.catalog.crawl_info)
            .map_err(wrap)?;
        self.handler.handle_header_end().map_err(wrap)?;
        self.phase = Phase::Info;
        Ok(())
    }

    /// Runs the info handlers and advances to the body phase.
    pub fn info(&mut self) -> TraversalResult<()> {
        self.expect(Phase::Info, "info")?;
        let wrap = |source| TraversalError::Handler {
            phase: Phase::Info,
            source,
        };
        self.handler.handle_info_start().map_err(wrap)?;
        self.handler
            .handle_database_info(&self.catalog.database_info)
            .map_err(wrap)?;
        self.handler
            .handle_driver_info(&self.catalog.driver_info)
            .map_err(wrap)?;
        self.handler.handle_info_end().map_err(wrap)?;
        self.phase = Phase::Body;
        Ok(())
    }

    /// Visits every retained schema object. Call at most once.
    pub fn body(&mut self) -> TraversalResult<()> {
        self.expect(Phase::Body, "body")?;
        let wrap = |source| TraversalError::Handler {
            phase: Phase::Body,
            source,
        };

        let mut schemas: Vec<&Schema> = self.catalog.schemas.iter().collect();
        schemas.sort_by(|a, b| a.id.cmp(&b.id));

        for schema in schemas {
            let mut tables: Vec<&Table> = schema.tables.iter().collect();
            self.options.table_sort.apply(&mut tables, |table| &table.name);
            for table in tables {
                let associations = self.catalog.associations_for(&table.table_ref());
                self.handler.handle_table(table, &associations).map_err(wrap)?;
            }

            let mut routines: Vec<&Routine> = schema.routines.iter().collect();
            self.options
                .routine_sort
                .apply(&mut routines, |routine| &routine.name);
            for routine in routines {
                self.handler.handle_routine(routine).map_err(wrap)?;
            }

            let mut sequences: Vec<&Sequence> = schema.sequences.iter().collect();
            sequences.sort_by(|a, b| a.name.cmp(&b.name));
            for sequence in sequences {
                self.handler.handle_sequence(sequence).map_err(wrap)?;
            }

            let mut synonyms: Vec<&Synonym> = schema.synonyms.iter().collect();
            synonyms.sort_by(|a, b| a.name.cmp(&b.name));
            for synonym in synonyms {
                self.handler.handle_synonym(synonym).map_err(wrap)?;
            }
        }
        Ok(())
    }

    /// Leaves the traversal. Every later step errors.
    pub fn end(&mut self) -> TraversalResult<()> {
        self.expect(Phase::Body, "end")?;
        let wrap = |source| TraversalError::Handler {
            phase: Phase::Body,
            source,
        };
        self.handler.end().map_err(wrap)?;
        self.phase = Phase::Finished;
        Ok(())
    }

    fn expect(&self, phase: Phase, step: &'static str) -> TraversalResult<()> {
        if self.phase != phase {
            return Err(TraversalError::InvalidState {
                step,
                phase: self.phase,
            });
        }
        Ok(())
    }
}
