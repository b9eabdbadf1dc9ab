//! Error types for cache operations
//!
//! This module defines the errors that can occur
//! while constructing or using a memoization cache.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid cache capacity: {0}")]
    InvalidCapacity(usize),

    #[error("Cache lock poisoned: {0}")]
    Poisoned(String),
}
