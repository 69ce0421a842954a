//! Column-name normalization for association matching.
//!
//! Two columns are candidates for a weak association when their names
//! normalize to the same key. The normalization convention is a value so
//! embedders can swap the suffix list or switch off parts of it; the
//! default follows the common `author_id` / `AUTHORS.ID` shape of
//! relational schemas.

use inflector::Inflector;

/// Irregular plurals the inflector mishandles in database contexts.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("half", "halves"),
    ("self", "selves"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("crisis", "crises"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("appendix", "appendices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("criterion", "criteria"),
];

/// Pluralize a word, irregulars first, inflector as fallback.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular || lower == *plural {
            return plural.to_string();
        }
    }
    word.to_plural()
}

/// Singularize a word, irregulars first, inflector as fallback.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular || lower == *plural {
            return singular.to_string();
        }
    }
    word.to_singular()
}

/// The normalization convention applied to column names before matching.
///
/// Normalization runs in order: case-fold, key-suffix strip, table-prefix
/// strip, singular fold. A column whose whole name is an identity name
/// ("ID") or whose name the stripping consumes entirely takes its key from
/// the owning table instead, so `AUTHORS.ID` and `BOOKS.AUTHOR_ID` meet at
/// the key `author`.
#[derive(Debug, Clone)]
pub struct NamingConvention {
    /// Suffixes stripped once from the end of a column name.
    pub key_suffixes: Vec<String>,
    /// Column names that stand for the owning table's identity.
    pub identity_names: Vec<String>,
    /// Whether a leading `<table>_` prefix is stripped.
    pub strip_table_prefix: bool,
    /// Whether keys are folded to singular.
    pub fold_plurals: bool,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            key_suffixes: vec!["_id".into(), "_key".into(), "_fk".into()],
            identity_names: vec!["id".into()],
            strip_table_prefix: true,
            fold_plurals: true,
        }
    }
}

impl NamingConvention {
    /// Builder: replace the stripped suffix list.
    pub fn with_key_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.key_suffixes = suffixes.into_iter().map(|s| s.to_lowercase()).collect();
        self
    }

    /// Builder: replace the identity column names.
    pub fn with_identity_names(mut self, names: Vec<String>) -> Self {
        self.identity_names = names.into_iter().map(|s| s.to_lowercase()).collect();
        self
    }

    /// Builder: enable or disable table-prefix stripping.
    pub fn with_table_prefix_stripping(mut self, enabled: bool) -> Self {
        self.strip_table_prefix = enabled;
        self
    }

    /// Builder: enable or disable singular folding.
    pub fn with_plural_folding(mut self, enabled: bool) -> Self {
        self.fold_plurals = enabled;
        self
    }

    /// Normalize a column name in the context of its owning table.
    pub fn normalize(&self, column_name: &str, table_name: &str) -> String {
        let mut key = column_name.to_lowercase();
        let table_lower = table_name.to_lowercase();

        if self.identity_names.iter().any(|name| *name == key) {
            return self.table_key(&table_lower);
        }

        for suffix in &self.key_suffixes {
            if let Some(stripped) = key.strip_suffix(suffix.as_str()) {
                key = stripped.trim_end_matches('_').to_string();
                break;
            }
        }

        if self.strip_table_prefix {
            for prefix in [&table_lower, &self.table_key(&table_lower)] {
                if prefix.is_empty() {
                    continue;
                }
                let prefixed = format!("{prefix}_");
                if let Some(stripped) = key.strip_prefix(prefixed.as_str()) {
                    if !stripped.is_empty() {
                        key = stripped.to_string();
                    }
                    break;
                }
            }
        }

        if key.is_empty() {
            return self.table_key(&table_lower);
        }
        if self.fold_plurals {
            key = singularize(&key);
        }
        key
    }

    /// The key a table's identity columns map to.
    fn table_key(&self, table_lower: &str) -> String {
        if self.fold_plurals {
            singularize(table_lower)
        } else {
            table_lower.to_string()
        }
    }
}
