//! Error types for ringcache

use std::fmt;

/// Result type alias for ringcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be at least one slot
    InvalidCapacity(usize),

    /// Key not present in the cache
    KeyNotFound,

    /// Ring and index disagree (reported by `check_invariants`)
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(cap) => {
                write!(f, "Invalid capacity: {} (must be greater than 0)", cap)
            }
            Error::KeyNotFound => write!(f, "Key not found"),
            Error::InvariantViolation(msg) => write!(f, "Invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
