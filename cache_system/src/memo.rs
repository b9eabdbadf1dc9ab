//! Memoization cache implementation
//!
//! `MemoCache` stores values computed from pure functions of their key.
//! Lookups take a read lock; a miss upgrades to the write lock and re-checks
//! before computing, so each key is computed at most once.

use crate::errors::CacheError;
use crate::stats::CacheStats;
use config::CacheConfig;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Thread-safe memoization cache
pub struct MemoCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = match self.entries.try_read() {
            Ok(entries) => entries.len().to_string(),
            Err(_) => "locked".to_string(),
        };

        f.debug_struct("MemoCache")
            .field("enabled", &self.enabled)
            .field("entries", &entries)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an enabled cache with default capacity
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything; every lookup recomputes
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Create a cache from configuration
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        if config.initial_capacity == 0 {
            return Err(CacheError::InvalidCapacity(config.initial_capacity));
        }
        Ok(Self::with_capacity(config.initial_capacity))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a cached value without computing it
    pub fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    /// Get the value for `key`, computing and storing it on first access.
    ///
    /// `compute` runs while the write lock is held and must not access this cache.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> Result<V, CacheError>
    where
        F: FnOnce() -> V,
    {
        self.try_get_or_insert_with::<CacheError, _>(key, || Ok(compute()))
    }

    /// Fallible variant of [`MemoCache::get_or_insert_with`]; failures are not cached.
    pub fn try_get_or_insert_with<E, F>(&self, key: K, compute: F) -> Result<V, E>
    where
        E: From<CacheError>,
        F: FnOnce() -> Result<V, E>,
    {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute();
        }

        if let Some(value) = self.get(&key)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;

        // Another caller may have filled the slot between the two locks
        if let Some(value) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "debug-logging")]
        tracing::trace!("memo cache miss, {} entries cached", entries.len());

        let value = compute()?;
        entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached entries; counters are kept
    pub fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        entries.clear();
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
