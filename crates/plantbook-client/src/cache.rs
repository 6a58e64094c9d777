//! TTL response cache.
//!
//! Plant records change rarely, and agents tend to ask about the same plant
//! several times in one conversation (details, then summary, then a
//! comparison). Caching successful lookups for hours avoids a round trip per
//! tool call. Failures are never cached.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Thread-safe map whose entries expire `ttl` after insertion.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, (Instant, V)>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a clone of the live entry for `key`, dropping it if expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut map = self.lock();
        match map.get(key) {
            Some((inserted_at, value)) if inserted_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace an entry. Expired entries are swept on every insert
    /// so the map cannot grow without bound.
    pub fn insert(&self, key: K, value: V) {
        let ttl = self.ttl;
        let mut map = self.lock();
        map.retain(|_, (inserted_at, _)| inserted_at.elapsed() < ttl);
        map.insert(key, (Instant::now(), value));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn clear(&self) {
        self.lock().clear();
    }
}
