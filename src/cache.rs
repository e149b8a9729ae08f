//! Time-bounded result cache injected at the analysis boundary.
//!
//! The computation functions never touch a cache; `Analyzer` consults one
//! only when the caller provides it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::core::types::Bar;

/// Minimal cache interface.
pub trait ResultCache<K, V>: Send + Sync {
    /// Fresh value for `key`, if any.
    fn get(&self, key: &K) -> Option<V>;
    /// Store `value` under `key`.
    fn insert(&self, key: K, value: V);
}

/// In-memory cache whose entries expire after a fixed TTL.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, (Instant, V)>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache with the given time to live.
    pub fn new(ttl: Duration) -> Self {
        Self { entries: RwLock::new(HashMap::new()), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn fresh(&self, stored_at: Instant) -> bool {
        stored_at.elapsed() < self.ttl
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// `compute` runs without the lock held.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.lookup(&key) {
            tracing::debug!("cache hit");
            return value;
        }
        tracing::debug!("cache miss");
        let value = compute();
        self.store(key, value.clone());
        value
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until the next
    /// insert or purge.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn lookup(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        let (stored_at, value) = entries.get(key)?;
        self.fresh(*stored_at).then(|| value.clone())
    }

    /// Insert `value`, evicting whatever has expired so the map only holds
    /// entries younger than the TTL plus the new one.
    fn store(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }
}

impl<K, V> ResultCache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.lookup(key)
    }

    fn insert(&self, key: K, value: V) {
        self.store(key, value);
    }
}

/// Stable fingerprint of a bar sequence, for use in cache keys.
pub fn fingerprint_bars(bars: &[Bar]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bars.len().hash(&mut hasher);
    for bar in bars {
        bar.timestamp.hash(&mut hasher);
        for value in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
            value.to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}
