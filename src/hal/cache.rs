//! Response cache keyed by request URL.
//!
//! [`HalClient`](crate::hal::HalClient) consults the cache before every GET
//! (when [`HalConfig::cache_enabled`](crate::HalConfig::cache_enabled) is set)
//! and stores every successfully built value after it. Keys are full URLs
//! including the query string, so different pages or projections of the same
//! resource are cached separately.
//!
//! Hosts can plug in their own storage by implementing [`ResourceCache`];
//! [`InMemoryCache`] is the default.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, Utc};

use crate::hal::resource::HalValue;

/// Storage for built values.
///
/// Implementations must be safe to share between tasks. Writes for the
/// same key are last-write-wins.
pub trait ResourceCache: Send + Sync + fmt::Debug {
    /// Returns the cached value for a URL, if present and fresh.
    fn get(&self, key: &str) -> Option<HalValue>;

    /// Stores a value for a URL.
    fn put(&self, key: &str, value: &HalValue);

    /// Removes the value for a URL.
    fn evict(&self, key: &str);

    /// Removes every value.
    fn clear(&self);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: HalValue,
    cached_at: DateTime<Utc>,
}

/// Process-local cache with optional expiry.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    lifetime: Option<TimeDelta>,
}

impl InMemoryCache {
    /// Creates a cache whose entries never expire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose entries expire after `lifetime`.
    #[must_use]
    pub fn with_lifetime(lifetime: Option<TimeDelta>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            lifetime,
        }
    }

    /// Returns the number of stored entries, including expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.lifetime
            .map_or(true, |lifetime| Utc::now() - entry.cached_at < lifetime)
    }
}

impl ResourceCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<HalValue> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if self.is_fresh(entry) {
            tracing::debug!(key, cached_at = %entry.cached_at, "Cache hit");
            Some(entry.value.clone())
        } else {
            tracing::debug!(key, "Cache entry expired");
            None
        }
    }

    fn put(&self, key: &str, value: &HalValue) {
        let entry = CacheEntry {
            value: value.clone(),
            cached_at: Utc::now(),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), entry);
    }

    fn evict(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_put_then_get_returns_value() {
        let cache = InMemoryCache::new();
        let value = HalValue::Data(json!({"a": 1}));

        cache.put("http://localhost/a", &value);

        assert_eq!(cache.get("http://localhost/a"), Some(value));
        assert_eq!(cache.get("http://localhost/b"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = InMemoryCache::new();
        cache.put("k", &HalValue::Data(json!(1)));
        cache.put("k", &HalValue::Data(json!(2)));

        assert_eq!(cache.get("k"), Some(HalValue::Data(json!(2))));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_and_clear() {
        let cache = InMemoryCache::new();
        cache.put("a", &HalValue::Data(json!(1)));
        cache.put("b", &HalValue::Data(json!(2)));

        cache.evict("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_lifetime_expires_immediately() {
        let cache = InMemoryCache::with_lifetime(Some(TimeDelta::zero()));
        cache.put("k", &HalValue::Data(json!(1)));

        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_long_lifetime_keeps_entry() {
        let cache = InMemoryCache::with_lifetime(Some(TimeDelta::hours(1)));
        cache.put("k", &HalValue::Data(json!(1)));

        assert!(cache.get("k").is_some());
    }

    #[test]
    fn test_cache_is_shareable_across_threads() {
        let cache: Arc<dyn ResourceCache> = Arc::new(InMemoryCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.put(&format!("k{i}"), &HalValue::Data(json!(i))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..4 {
            assert_eq!(cache.get(&format!("k{i}")), Some(HalValue::Data(json!(i))));
        }
    }
}
