//! SharedLruCache: one lock around an [`LruCache`]
//!
//! `get` reorders the ring, so every operation needs exclusive access.
//! There is no finer-grained split; the lock is held for the whole call.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::LruCache;

/// Thread-safe handle to an LRU cache. Clones share the same cache.
pub struct SharedLruCache<K, V, S = RandomState> {
    inner: Arc<Mutex<LruCache<K, V, S>>>,
}

impl<K, V, S> Clone for SharedLruCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new shared cache with the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        LruCache::new(capacity).map(Self::from)
    }
}

impl<K, V, S> From<LruCache<K, V, S>> for SharedLruCache<K, V, S> {
    fn from(cache: LruCache<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V, S> SharedLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Check if `key` is cached
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Get a copy of the value and mark its key most recently used
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Get a copy of the value without changing recency
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Insert or overwrite `key`; returns the evicted pair, if any
    pub fn set(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().set(key, value)
    }

    /// Remove `key`; missing keys are a no-op
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key)
    }

    /// Run `f` with the lock held, for compound operations that must not
    /// interleave with other callers.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V, S>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedLruCache::new(2).unwrap();

        cache.set(1, "a".to_string());
        cache.set(2, "b".to_string());

        assert_eq!(cache.get(&1), Ok("a".to_string()));
        assert_eq!(cache.peek(&2), Some("b".to_string()));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), 2);

        // 2 is least recent after the get above
        assert_eq!(cache.set(3, "c".to_string()), Some((2, "b".to_string())));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn test_shared_errors() {
        assert!(matches!(
            SharedLruCache::<u32, u32>::new(0),
            Err(Error::InvalidCapacity(0))
        ));

        let cache = SharedLruCache::<u32, u32>::new(1).unwrap();
        assert_eq!(cache.get(&7), Err(Error::KeyNotFound));
        assert_eq!(cache.delete(&7), None);
    }

    #[test]
    fn test_shared_clones_share_state() {
        let cache = SharedLruCache::new(4).unwrap();
        let other = cache.clone();

        other.set("k", 1);
        assert!(cache.contains("k"));

        cache.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn test_shared_concurrent_sets() {
        let cache = SharedLruCache::new(16).unwrap();

        thread::scope(|s| {
            for t in 0..4u64 {
                let cache = cache.clone();
                s.spawn(move || {
                    for i in 0..500u64 {
                        let key = (t * 1000 + i) % 64;
                        cache.set(key, i);
                        let _ = cache.get(&key);
                        if i % 7 == 0 {
                            cache.delete(&key);
                        }
                    }
                });
            }
        });

        assert!(cache.len() <= 16);
        cache.with_lock(|inner| inner.check_invariants()).unwrap();
    }

    #[test]
    fn test_shared_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedLruCache<String, Vec<u8>>>();
    }
}
