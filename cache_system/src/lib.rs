//! Cache system for memoizing derived metadata
//!
//! This crate provides a thread-safe, in-process memoization cache
//! with configurable capacity and hit/miss statistics.

pub mod errors;
pub mod memo;
pub mod prelude;
pub mod stats;

// Re-export centralized config
pub use config::CacheConfig;

pub use errors::CacheError;
pub use memo::MemoCache;
pub use stats::CacheStats;
