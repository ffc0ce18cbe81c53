//! Naive LRU cache used as a test oracle
//!
//! Entries live in a `Vec` ordered least to most recently used. Every
//! operation is a linear scan and a touched entry is re-appended. It is slow
//! on purpose: the point is that it is obviously correct, so [`LruCache`]
//! can be checked against it. Do not optimize it.
//!
//! [`LruCache`]: crate::LruCache

use std::borrow::Borrow;

/// Linear-scan LRU cache with the same observable contract as `LruCache`
#[derive(Debug, Clone)]
pub struct SimpleLruCache<K, V> {
    items: Vec<(K, V)>,
    capacity: usize,
}

impl<K: Eq, V> SimpleLruCache<K, V> {
    /// Create an empty oracle. A capacity of 0 keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the oracle is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Check if `key` is stored
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.items.iter().any(|(k, _)| k.borrow() == key)
    }

    /// Get a value, moving its entry to the most recent end
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let pos = self.position(key)?;
        let entry = self.items.remove(pos);
        self.items.push(entry);
        self.items.last().map(|(_, v)| v)
    }

    /// Insert or overwrite; returns the pair dropped off the old end, if any
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(pos) = self.position(&key) {
            self.items.remove(pos);
            self.items.push((key, value));
            return None;
        }

        let evicted = if self.items.len() >= self.capacity && !self.items.is_empty() {
            Some(self.items.remove(0))
        } else {
            None
        };

        if self.capacity > 0 {
            self.items.push((key, value));
        }
        evicted
    }

    /// Remove `key` if present
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let pos = self.position(key)?;
        Some(self.items.remove(pos).1)
    }

    /// Keys from most to least recently used
    pub fn keys_mru(&self) -> impl Iterator<Item = &K> + '_ {
        self.items.iter().rev().map(|(k, _)| k)
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.items.iter().position(|(k, _)| k.borrow() == key)
    }
}
