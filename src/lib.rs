//! # Orbweaver
//!
//! A database metadata crawler: builds filtered, navigable schema
//! catalogs with inferred relationships.
//!
//! ## Architecture
//!
//! Orbweaver turns the raw listings of a metadata source into one
//! immutable catalog value:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  MetadataSource                          │
//! │   (backend adapter: schemas, tables, columns, keys...)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [crawl - staged pipeline]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Catalog (Schemas, Tables, Routines...)          │
//! │      filtered by InclusionRule, gated by InfoLevel       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [inference - naming heuristic]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Catalog + WeakAssociations (undeclared FKs)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [traverse - visitor protocol]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Formatters, diagram writers, lint passes...        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! A crawl runs the retrieval stages in a fixed order, each stage
//! deepening the catalog built by the ones before it. How deep the
//! pipeline goes is decided by the requested [`level::InfoLevel`],
//! which objects are kept by [`inclusion::InclusionRule`] patterns.
//! Backends that cannot answer a request degrade the affected objects
//! to documented sentinels instead of failing the crawl; only an
//! unreachable source aborts.
//!
//! Once built, a catalog is never mutated again. Downstream consumers
//! read it through the [`traverse`] protocol, which fixes visit order
//! and phase sequencing so every consumer sees the same sequence.

pub mod catalog;
pub mod config;
pub mod crawl;
pub mod error;
pub mod inclusion;
pub mod inference;
pub mod level;
pub mod source;
pub mod traverse;

// Re-export the crawl entry points (primary API)
pub use crawl::{crawl, Crawler};

// Re-export the types almost every caller touches
pub use catalog::Catalog;
pub use config::{CrawlOptions, Settings};
pub use error::{ConfigError, CrawlError, CrawlResult};
pub use inclusion::InclusionRule;
pub use level::InfoLevel;
pub use source::{MetadataSource, MetadataSourceExt};
pub use traverse::{TraversalHandler, Traverser};
