//! A time-limited cache for computed results such as dashboard aggregates.
//!
//! Entries are keyed by an endpoint name plus its canonical query parameters
//! (see [cache_key]). An entry is reused while it is younger than the cache's
//! TTL and removed the first time it is read after that. Any mutation of
//! expenses, categories or payment methods should call [invalidate] so that
//! the next read recomputes from the database.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::Error;

/// How long cached results are reused by default.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

/// Cached values of type `V` that expire after a fixed TTL.
#[derive(Debug)]
pub struct ResultCache<V> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Get the value stored under `key` if it has not expired.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Get the value stored under `key` as if the current time were `now`.
    ///
    /// An expired entry is removed.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;

        if now.saturating_duration_since(entry.created_at) < self.ttl {
            return Some(entry.value.clone());
        }

        tracing::debug!("cache entry {key} expired");
        self.entries.remove(key);
        None
    }

    /// Store `value` under `key`, replacing any existing entry.
    pub fn put(&mut self, key: String, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Store `value` under `key` as if it were created at `now`.
    pub fn put_at(&mut self, key: String, value: V, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: now,
            },
        );
    }

    /// Remove every entry.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a cache key from `endpoint` and `params`.
///
/// Parameters are sorted by name so that the key does not depend on the order
/// in which they were given, e.g. `expense_data?a=1&b=2`.
pub fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
    let mut params = params.to_vec();
    params.sort_by(|(left, _), (right, _)| left.cmp(right));

    let query = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{endpoint}?{query}")
}

/// Return the cached value for `key`, or compute, store and return it.
///
/// A poisoned cache lock is treated as a miss: the value is computed and
/// returned but not stored.
pub fn get_or_compute<V: Clone>(
    cache: &Arc<Mutex<ResultCache<V>>>,
    key: &str,
    compute: impl FnOnce() -> Result<V, Error>,
) -> Result<V, Error> {
    match cache.lock() {
        Ok(mut cache) => {
            if let Some(value) = cache.get(key) {
                tracing::debug!("cache hit for {key}");
                return Ok(value);
            }
        }
        Err(error) => {
            tracing::warn!("could not read result cache, recomputing {key}: {error}");
            return compute();
        }
    }

    tracing::debug!("cache miss for {key}");
    let value = compute()?;

    match cache.lock() {
        Ok(mut cache) => cache.put(key.to_owned(), value.clone()),
        Err(error) => tracing::warn!("could not store {key} in result cache: {error}"),
    }

    Ok(value)
}

/// Drop every cached result after data has changed.
pub fn invalidate<V: Clone>(cache: &Arc<Mutex<ResultCache<V>>>) {
    match cache.lock() {
        Ok(mut cache) => {
            cache.invalidate_all();
            tracing::debug!("result cache cleared");
        }
        Err(error) => {
            // Clear the poisoned cache anyway so stale results are never served.
            let mut cache = error.into_inner();
            cache.invalidate_all();
            tracing::warn!("result cache lock was poisoned, cleared it anyway");
        }
    }
}
