//! Per-run search result caching.
//!
//! Several catalog items generate the same search term ("cohiba" serves
//! every Cohiba line), and repeating the query would hammer the source and
//! risk returning different results mid-run. The cache is injected by the
//! caller rather than held as module state, so a run owns its cache and
//! consistency is scoped to that run.

use std::collections::HashMap;
use std::sync::Mutex;

use ukprice_core::RawListing;

use crate::normalize::normalize;

/// Canonical cache key for a search against one source. Terms are normalized
/// so "Siglo VI" and "siglo vi" share an entry.
#[must_use]
pub fn cache_key(source_id: &str, term: &str) -> String {
    format!("{source_id}:{}", normalize(term))
}

/// Storage for search results keyed by [`cache_key`].
///
/// Takes `&self` so one cache can be shared across concurrent lookups.
pub trait SearchCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<RawListing>>;
    fn put(&self, key: &str, listings: Vec<RawListing>);
}

/// In-memory cache for a single run.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<RawListing>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached search terms.
    ///
    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SearchCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<RawListing>> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, listings: Vec<RawListing>) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), listings);
    }
}
