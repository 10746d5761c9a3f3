//! Feature importance cache
//!
//! Memoizes importance rankings per model name. Keys are bounded by the
//! number of served models, so there is no eviction: once `capacity` is
//! reached, further results are computed and returned but not stored.
//!
//! Entries are never invalidated. The registry is populated once at startup
//! and never reloaded; a reload would have to build a fresh cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

/// Thread-safe, capacity-bounded memo table
pub struct BoundedCache<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl<V> BoundedCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached value, or compute, store (if room) and return it.
    ///
    /// `compute` runs outside the lock; two racing callers may both compute,
    /// and the second write replaces an identical value.
    pub fn get_or_try_insert_with<E, F>(&self, key: &str, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.entries.read().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(value));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let value = Arc::new(compute()?);

        let mut entries = self.entries.write();
        if entries.len() < self.capacity || entries.contains_key(key) {
            entries.insert(key.to_string(), Arc::clone(&value));
        } else {
            tracing::debug!("Importance cache full ({} entries), not storing {}", self.capacity, key);
        }

        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
