//! TOML-based configuration.
//!
//! Supports a config file (orbweaver.toml) with environment variable
//! expansion in source URLs.
//!
//! Example configuration:
//! ```toml
//! [sources.production]
//! kind = "postgresql"
//! url = "${CATALOG_URL}"
//! default_schema = "public"
//!
//! [crawl]
//! info_level = "maximum"
//! include_tables = ".*BOOKS.*"
//! exclude_columns = ".*\\.PASSWORD"
//! load_row_counts = true
//! max_concurrency = 4
//! stage_timeout_seconds = 30
//!
//! [inference]
//! enabled = true
//! key_suffixes = ["_id", "_key", "_fk"]
//!
//! [traversal]
//! table_sort = "alphabetical"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::options::{CrawlOptions, CrawlOptionsBuilder};
use crate::error::ConfigError;
use crate::inference::NamingConvention;
use crate::level::InfoLevel;
use crate::source::{SourceDescriptor, SourceRegistry};
use crate::traverse::{NamedObjectSort, TraversalOptions};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named metadata sources.
    #[serde(default)]
    pub sources: HashMap<String, SourceSettings>,

    /// Crawl configuration.
    #[serde(default)]
    pub crawl: CrawlSettings,

    /// Weak-association inference configuration.
    #[serde(default)]
    pub inference: InferenceSettings,

    /// Traversal visit-order configuration.
    #[serde(default)]
    pub traversal: TraversalSettings,
}

/// One named source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceSettings {
    /// Source kind identifier, resolved against a [`SourceRegistry`].
    pub kind: String,

    /// Connection URL (supports ${ENV_VAR} expansion).
    pub url: String,

    /// Default schema for this source.
    #[serde(default)]
    pub default_schema: Option<String>,
}

impl SourceSettings {
    /// Resolves the kind against a registry; unknown kinds resolve to
    /// the registry's fallback descriptor.
    pub fn descriptor<'r>(&self, registry: &'r SourceRegistry) -> &'r SourceDescriptor {
        registry.lookup(&self.kind)
    }

    /// Connection URL with environment variables expanded.
    pub fn resolved_url(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.url)
    }
}

/// Crawl configuration, the file-format mirror of [`CrawlOptions`].
///
/// When both an include and an exclude pattern are given for one object
/// kind, the exclude pattern wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Retrieval level: "minimum", "standard", "detailed", "maximum".
    pub info_level: InfoLevel,

    pub include_schemas: Option<String>,
    pub exclude_schemas: Option<String>,
    pub include_tables: Option<String>,
    pub exclude_tables: Option<String>,
    pub include_columns: Option<String>,
    pub exclude_columns: Option<String>,
    pub include_routines: Option<String>,
    pub exclude_routines: Option<String>,
    pub include_sequences: Option<String>,
    pub include_synonyms: Option<String>,

    /// Backend table type strings to keep; absent keeps the defaults.
    pub table_types: Option<Vec<String>>,

    /// Routine kind names to keep; absent keeps functions and procedures.
    pub routine_kinds: Option<Vec<String>>,

    pub load_row_counts: bool,
    pub no_empty_tables: bool,
    pub max_concurrency: usize,
    pub stage_timeout_seconds: Option<u64>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            info_level: InfoLevel::default(),
            include_schemas: None,
            exclude_schemas: None,
            include_tables: None,
            exclude_tables: None,
            include_columns: None,
            exclude_columns: None,
            include_routines: None,
            exclude_routines: None,
            include_sequences: None,
            include_synonyms: None,
            table_types: None,
            routine_kinds: None,
            load_row_counts: false,
            no_empty_tables: false,
            max_concurrency: 8,
            stage_timeout_seconds: None,
        }
    }
}

impl CrawlSettings {
    /// Compiles these settings into crawl options. Pattern errors surface
    /// here, before any crawl starts.
    pub fn to_options(&self) -> Result<CrawlOptions, ConfigError> {
        let mut builder = CrawlOptions::builder()
            .info_level(self.info_level)
            .load_row_counts(self.load_row_counts)
            .no_empty_tables(self.no_empty_tables)
            .max_concurrency(self.max_concurrency);

        if let Some(pattern) = &self.include_schemas {
            builder = builder.include_schemas(pattern)?;
        }
        if let Some(pattern) = &self.exclude_schemas {
            builder = builder.exclude_schemas(pattern)?;
        }
        if let Some(pattern) = &self.include_tables {
            builder = builder.include_tables(pattern)?;
        }
        if let Some(pattern) = &self.exclude_tables {
            builder = builder.exclude_tables(pattern)?;
        }
        if let Some(pattern) = &self.include_columns {
            builder = builder.include_columns(pattern)?;
        }
        if let Some(pattern) = &self.exclude_columns {
            builder = builder.exclude_columns(pattern)?;
        }
        if let Some(pattern) = &self.include_routines {
            builder = builder.include_routines(pattern)?;
        }
        if let Some(pattern) = &self.exclude_routines {
            builder = builder.exclude_routines(pattern)?;
        }
        if let Some(pattern) = &self.include_sequences {
            builder = builder.include_sequences(pattern)?;
        }
        if let Some(pattern) = &self.include_synonyms {
            builder = builder.include_synonyms(pattern)?;
        }
        if let Some(types) = &self.table_types {
            builder = builder.table_types(types.iter().cloned());
        }
        if let Some(kinds) = &self.routine_kinds {
            builder = builder.routine_kinds_named(kinds)?;
        }
        if let Some(seconds) = self.stage_timeout_seconds {
            builder = builder.stage_timeout(Duration::from_secs(seconds));
        }

        Ok(builder.build())
    }

    /// The builder primed with these settings, for callers that want to
    /// layer programmatic overrides on top of the file.
    pub fn to_builder(&self) -> Result<CrawlOptionsBuilder, ConfigError> {
        let options = self.to_options()?;
        let mut builder = CrawlOptions::builder()
            .info_level(options.info_level)
            .schemas(options.schemas)
            .tables(options.tables)
            .columns(options.columns)
            .routines(options.routines)
            .routine_parameters(options.routine_parameters)
            .sequences(options.sequences)
            .synonyms(options.synonyms)
            .routine_kinds(options.routine_kinds)
            .load_row_counts(options.load_row_counts)
            .no_empty_tables(options.no_empty_tables)
            .max_concurrency(options.max_concurrency);
        builder = match options.table_types {
            Some(types) => builder.table_types(types),
            None => builder.all_table_types(),
        };
        if let Some(timeout) = options.stage_timeout {
            builder = builder.stage_timeout(timeout);
        }
        Ok(builder)
    }
}

/// Weak-association inference settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Run inference after the crawl.
    pub enabled: bool,

    /// Suffixes stripped from column names when deriving match keys.
    pub key_suffixes: Option<Vec<String>>,

    /// Column names treated as a table's identity column.
    pub identity_names: Option<Vec<String>>,

    /// Strip a leading `{table}_` prefix from column names.
    pub strip_table_prefix: bool,

    /// Fold plural table names to singular match keys.
    pub fold_plurals: bool,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            key_suffixes: None,
            identity_names: None,
            strip_table_prefix: true,
            fold_plurals: true,
        }
    }
}

/// Traversal visit-order settings, the file-format mirror of
/// [`TraversalOptions`].
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TraversalSettings {
    /// Order tables are visited in within a schema.
    pub table_sort: NamedObjectSort,

    /// Order routines are visited in within a schema.
    pub routine_sort: NamedObjectSort,
}

impl TraversalSettings {
    /// Builds the traversal options these settings describe.
    pub fn to_options(&self) -> TraversalOptions {
        TraversalOptions {
            table_sort: self.table_sort,
            routine_sort: self.routine_sort,
        }
    }
}

impl InferenceSettings {
    /// Builds the naming convention these settings describe.
    pub fn to_convention(&self) -> NamingConvention {
        let mut convention = NamingConvention::default()
            .with_table_prefix_stripping(self.strip_table_prefix)
            .with_plural_folding(self.fold_plurals);
        if let Some(suffixes) = &self.key_suffixes {
            convention = convention.with_key_suffixes(suffixes.clone());
        }
        if let Some(names) = &self.identity_names {
            convention = convention.with_identity_names(names.clone());
        }
        convention
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `ORBWEAVER_CONFIG`
    /// 2. `./orbweaver.toml`
    ///
    /// Falls back to defaults when neither exists.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("ORBWEAVER_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("orbweaver.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(Settings::default())
    }

    /// Get a source by name.
    pub fn get_source(&self, name: &str) -> Result<&SourceSettings, SettingsError> {
        self.sources
            .get(name)
            .ok_or_else(|| SettingsError::SourceNotFound(name.to_string()))
    }

    /// Get the default source ("default" if present, otherwise the first
    /// one defined).
    pub fn default_source(&self) -> Option<(&str, &SourceSettings)> {
        if let Some(source) = self.sources.get("default") {
            return Some(("default", source));
        }
        self.sources.iter().next().map(|(k, v)| (k.as_str(), v))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                // A lone $, keep it.
                result.push('$');
            } else {
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}
