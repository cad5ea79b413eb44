use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Key/value store with per-entry expiry, injected into services that
/// want to avoid refetching market data.
pub trait CacheStore<V>: Send + Sync {
    /// Get a live value.
    fn get(&self, key: &str) -> Option<V>;

    /// Store a value that expires after `ttl`.
    fn set(&self, key: String, value: V, ttl: Duration);
}

/// A thread-safe in-memory cache with TTL support.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    /// Create a new cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a value, evicting it if expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.evict_if_expired(key);
            None
        }
    }

    /// Remove `key` only if its entry is still expired, so a value stored
    /// concurrently after the expired read survives.
    fn evict_if_expired(&self, key: &str) {
        self.data
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
    }

    /// Set a value with the default TTL.
    pub fn insert(&self, key: String, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Set a value with a custom TTL.
    pub fn set_with_ttl(&self, key: String, value: V, ttl: Duration) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.data.remove(key).map(|(_, entry)| entry.value)
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    /// Remove all expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, expired ones included until the next cleanup.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<V: Clone + Send + Sync> CacheStore<V> for Cache<V> {
    fn get(&self, key: &str) -> Option<V> {
        Cache::get(self, key)
    }

    fn set(&self, key: String, value: V, ttl: Duration) {
        self.set_with_ttl(key, value, ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_cache_basic() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("AAPL".to_string(), 187.5);
        assert_eq!(cache.get("AAPL"), Some(187.5));
        assert_eq!(cache.get("MSFT"), None);
    }

    #[test]
    fn test_cache_expiration() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.insert("AAPL".to_string(), 1.0);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("AAPL"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_keeps_fresh_value() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set_with_ttl("AAPL".to_string(), 1.0, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));

        // A writer refreshes the key between an expired read and its eviction
        cache.insert("AAPL".to_string(), 2.0);
        cache.evict_if_expired("AAPL");
        assert_eq!(cache.get("AAPL"), Some(2.0));

        cache.set_with_ttl("MSFT".to_string(), 3.0, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));
        cache.evict_if_expired("MSFT");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_store_trait_ttl() {
        let store: Arc<dyn CacheStore<String>> =
            Arc::new(Cache::<String>::new(Duration::from_secs(60)));
        store.set("short".to_string(), "a".to_string(), Duration::from_millis(10));
        store.set("long".to_string(), "b".to_string(), Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(store.get("short"), None);
        assert_eq!(store.get("long"), Some("b".to_string()));
    }

    #[test]
    fn test_cache_remove_and_clear() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        assert_eq!(cache.remove("a"), Some(1));
        assert_eq!(cache.remove("a"), None);
        assert!(cache.contains("b"));

        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_cache_cleanup() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.insert("stale".to_string(), 1);
        cache.set_with_ttl("fresh".to_string(), 2, Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(20));
        cache.cleanup();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(2));
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.insert("key".to_string(), 1);
        cache.insert("key".to_string(), 2);

        assert_eq!(cache.get("key"), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
