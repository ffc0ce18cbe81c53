//! # ringcache
//!
//! Fixed-capacity key/value cache with LRU eviction and O(1) operations.
//!
//! ## Architecture
//! - **Slot Ring**: `capacity` preallocated slots in a circular doubly-linked
//!   list, linked by index. Walking from `head` gives most to least recently
//!   used; empty slots cluster at the tail.
//! - **Index**: AHash map from key to slot, kept in lockstep with the ring
//! - **Shared**: optional single-mutex wrapper for multi-threaded callers
//! - **Reference**: linear-scan oracle for differential testing
//!
//! ## Example
//!
//! ```
//! use ringcache::{Error, LruCache};
//!
//! let mut cache = LruCache::new(2)?;
//! cache.set(1, "a");
//! cache.set(2, "b");
//! cache.get(&1)?;
//! cache.set(3, "c"); // evicts 2
//!
//! assert!(cache.contains(&1));
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.get(&2), Err(Error::KeyNotFound));
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]

mod error;
mod lru;
pub mod reference;
mod ring;
mod shared;

pub use error::{Error, Result};
pub use lru::LruCache;
pub use shared::SharedLruCache;
