//! Registry of known source kinds.
//!
//! The registry is an ordinary value built at startup: embedders register
//! a descriptor per backend they ship an adapter for, then pass the
//! registry by reference to whatever resolves connection settings. There
//! is no global state; two registries never observe each other.

use crate::catalog::UNKNOWN;

/// Describes one registered source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Stable identifier, such as `"hsqldb"`.
    pub id: String,
    /// Human-readable name for display.
    pub title: String,
    /// Connection URL prefix claimed by this source kind; empty when the
    /// kind cannot be recognized from a URL.
    pub url_prefix: String,
}

impl SourceDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// True when this descriptor claims `url`.
    pub fn matches_url(&self, url: &str) -> bool {
        !self.url_prefix.is_empty() && url.starts_with(&self.url_prefix)
    }
}

/// Ordered collection of source descriptors with an unknown-kind fallback.
///
/// Lookups never fail: an identifier or URL nobody claims resolves to the
/// fallback descriptor, so callers downstream need no missing-kind branch.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    descriptors: Vec<SourceDescriptor>,
    fallback: SourceDescriptor,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            fallback: SourceDescriptor::new(UNKNOWN, "Unknown source", ""),
        }
    }

    /// Registers a descriptor. A descriptor with an already-registered id
    /// replaces the old one in place, keeping its registration position.
    pub fn register(&mut self, descriptor: SourceDescriptor) {
        match self
            .descriptors
            .iter_mut()
            .find(|existing| existing.id == descriptor.id)
        {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
    }

    /// Resolves an identifier, falling back for unknown ids.
    pub fn lookup(&self, id: &str) -> &SourceDescriptor {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.id == id)
            .unwrap_or(&self.fallback)
    }

    /// Resolves a connection URL, falling back for unclaimed URLs.
    pub fn lookup_by_url(&self, url: &str) -> &SourceDescriptor {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.matches_url(url))
            .unwrap_or(&self.fallback)
    }

    /// True when `id` has a registered descriptor.
    pub fn is_registered(&self, id: &str) -> bool {
        self.descriptors.iter().any(|descriptor| descriptor.id == id)
    }

    /// Descriptor returned for unrecognized lookups.
    pub fn fallback(&self) -> &SourceDescriptor {
        &self.fallback
    }

    /// Registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
