//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::errors::CacheError;
pub use crate::memo::MemoCache;
pub use crate::stats::CacheStats;

// Re-export centralized config
pub use config::CacheConfig;
