//! Inclusion rules for filtering named database objects.
//!
//! Every filterable object kind (schema, table, column, routine, routine
//! parameter, sequence, synonym) is gated by one [`InclusionRule`] evaluated
//! against the object's fully qualified dotted name. Rules are immutable
//! once built and patterns are compiled up front, so a bad pattern fails
//! configuration instead of failing mid-crawl.

use regex::Regex;

use crate::error::ConfigError;

/// A filter over fully qualified object names.
///
/// Pattern variants match the way the backend qualifies names, against the
/// whole name: `Include("BOOKS")` does not accept `PUBLIC.BOOKS`.
#[derive(Debug, Clone)]
pub enum InclusionRule {
    /// Accept every name.
    IncludeAll,
    /// Reject every name.
    ExcludeAll,
    /// Accept names fully matching the pattern, reject the rest.
    Include(Regex),
    /// Reject names fully matching the pattern, accept the rest.
    Exclude(Regex),
}

impl InclusionRule {
    /// Build a pattern-include rule. The pattern must compile.
    pub fn include(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::Include(compile_anchored(pattern)?))
    }

    /// Build a pattern-exclude rule. The pattern must compile.
    ///
    /// For any name, `exclude(p)` answers the exact opposite of
    /// `include(p)`.
    pub fn exclude(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::Exclude(compile_anchored(pattern)?))
    }

    /// Evaluate this rule against a fully qualified name.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::ExcludeAll => false,
            Self::Include(pattern) => pattern.is_match(name),
            Self::Exclude(pattern) => !pattern.is_match(name),
        }
    }

    /// Check whether no name can ever pass this rule.
    ///
    /// Lets the crawler skip listings whose every row it would discard.
    pub fn excludes_everything(&self) -> bool {
        matches!(self, Self::ExcludeAll)
    }
}

impl Default for InclusionRule {
    fn default() -> Self {
        Self::IncludeAll
    }
}

/// Compile a pattern that must cover the whole input to match.
fn compile_anchored(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
