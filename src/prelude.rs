//! Convenience re-exports for common QueryHaus usage
//!
//! This prelude module re-exports the most commonly used items from the QueryHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use queryhaus::prelude::*;
//!
//! let query = Query::query(Criteria::eq("name", "Walter"));
//! assert!(query.criteria().is_some());
//! ```

// Core QueryHaus components
pub use crate::core::QueryHaus;
pub use crate::errors::QueryHausError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, DialectKind, MappingConfig};

// Query model, mapping, rendering and execution
pub use relational_core::prelude::*;

// Re-export relational_core for derive-generated code
pub use relational_core;

// Re-export cache system
pub use cache_system::prelude::*;

// Re-export the entity derive
pub use table_derive::Entity;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;
