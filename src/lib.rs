//! # QueryHaus
//!
//! Immutable query building, aggregate path resolution and dialect-aware SQL
//! rendering for relational entity graphs, with a PostgreSQL executor.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use queryhaus::prelude::*;
//!
//! #[derive(Entity)]
//! #[table(name = "person")]
//! pub struct Person {
//!     #[id]
//!     pub id: i64,
//!     pub name: String,
//!     pub age: i32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let haus = QueryHaus::new(&config).await?;
//!
//!     let query = Query::query(Criteria::eq("name", "Walter"));
//!     let pageable = Pageable::of_sorted(0, 20, Sort::by(["age"]).descending())?
//!         .with_boundary(Boundary::by("age", 18..)?);
//!
//!     let template = haus.template()?;
//!     let page = template.page::<Person>(&query, &pageable).await?;
//!     println!("{} of {} people", page.number_of_elements(), page.total_elements());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::QueryHaus;
pub use errors::QueryHausError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, DialectKind, MappingConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated derive code to work correctly
pub use relational_core;
pub use table_derive;
pub use cache_system;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
