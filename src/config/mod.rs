//! Configuration module.
//!
//! Handles crawl options, the TOML settings file, and environment
//! variable expansion.

pub mod options;
mod settings;

pub use options::{CrawlOptions, CrawlOptionsBuilder};
pub use settings::{
    expand_env_vars, CrawlSettings, InferenceSettings, Settings, SettingsError, SourceSettings,
    TraversalSettings,
};
