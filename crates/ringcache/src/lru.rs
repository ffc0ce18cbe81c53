//! LRU (Least Recently Used) cache implementation
//!
//! A key -> slot index kept in lockstep with a [`SlotRing`]. Every touch is a
//! `move_to_front` followed by a head reassignment, so inserts never search
//! for a victim: the slot behind `head` is always the one to reuse.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ring::SlotRing;

/// LRU cache with fixed capacity
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, usize, S>,
    ring: SlotRing<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// Get the number of stored entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the fixed number of slots
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Iterate entries from most to least recently used, without promoting
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.ring
            .walk()
            .take(self.map.len())
            .filter_map(move |idx| self.ring.entry(idx))
            .map(|(key, value)| (key, value))
    }

    /// Iterate keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache using `hasher` for the key index
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        let ring = SlotRing::new(capacity)?;
        debug!(capacity, "created LRU cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
            ring,
        })
    }

    /// Remove every entry. Slots are emptied in place and stay allocated.
    pub fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.ring.clear_entries();
        debug!(dropped, "cleared LRU cache");
    }

    /// Check if `key` is cached. Does not affect recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Get a value and mark its key most recently used
    ///
    /// # Errors
    /// * `Error::KeyNotFound` - if `key` is not cached; the cache is untouched
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key).ok_or(Error::KeyNotFound)?;
        self.promote(idx);

        self.ring
            .entry(idx)
            .map(|(_, value)| value)
            .ok_or_else(|| empty_slot(idx))
    }

    /// Mutable variant of [`get`](Self::get), with the same promotion
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key).ok_or(Error::KeyNotFound)?;
        self.promote(idx);

        self.ring
            .entry_mut(idx)
            .as_mut()
            .map(|(_, value)| value)
            .ok_or_else(|| empty_slot(idx))
    }

    /// Read a value without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.ring.entry(idx).map(|(_, value)| value)
    }

    /// Insert or overwrite `key`, making it the most recently used.
    ///
    /// Overwriting never evicts. Inserting a new key into a full cache
    /// reuses the least recently used slot and returns the pair it held.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some((_, slot_value)) = self.ring.entry_mut(idx) {
                *slot_value = value;
            }
            self.promote(idx);
            return None;
        }

        // The tail is either the LRU entry or, when not full, an empty slot.
        // It already sits right behind head, so only head moves.
        let idx = self.ring.tail();
        let evicted = self.ring.entry_mut(idx).take();
        if let Some((old_key, _)) = &evicted {
            self.map.remove(old_key);
            trace!(slot = idx, "evicted least recently used entry");
        }

        self.map.insert(key.clone(), idx);
        *self.ring.entry_mut(idx) = Some((key, value));
        self.ring.set_head(idx);

        evicted
    }

    /// Remove `key`, returning its value. Missing keys are a no-op.
    ///
    /// Unlike [`get`](Self::get), an absent key is not an error.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        let entry = self.ring.entry_mut(idx).take();

        // Park the emptied slot at the tail so it is reused first.
        self.ring.move_to_front(idx);
        self.ring.set_head(self.ring.next(idx));
        trace!(slot = idx, "deleted entry");

        entry.map(|(_, value)| value)
    }

    /// Verify the ring links, the index/ring bijection, and that empty
    /// slots are clustered behind the occupied ones.
    ///
    /// # Errors
    /// * `Error::InvariantViolation` - describing the first broken invariant
    pub fn check_invariants(&self) -> Result<()> {
        self.ring.check_links()?;

        let len = self.map.len();
        let capacity = self.ring.capacity();
        if len > capacity {
            return Err(Error::InvariantViolation(format!(
                "{} entries exceed capacity {}",
                len, capacity
            )));
        }

        for (position, idx) in self.ring.walk().enumerate() {
            match (position < len, self.ring.entry(idx)) {
                (true, Some((key, _))) => {
                    if self.map.get(key) != Some(&idx) {
                        return Err(Error::InvariantViolation(format!(
                            "slot {} holds a key the index maps elsewhere",
                            idx
                        )));
                    }
                }
                (true, None) => {
                    return Err(Error::InvariantViolation(format!(
                        "empty slot {} at recency position {} of {}",
                        idx, position, len
                    )));
                }
                (false, Some(_)) => {
                    return Err(Error::InvariantViolation(format!(
                        "occupied slot {} past the last recency position",
                        idx
                    )));
                }
                (false, None) => {}
            }
        }

        Ok(())
    }

    fn promote(&mut self, idx: usize) {
        self.ring.move_to_front(idx);
        self.ring.set_head(idx);
    }
}

fn empty_slot(idx: usize) -> Error {
    Error::InvariantViolation(format!("index points at empty slot {}", idx))
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
