//! Relational Core - query shaping and aggregate mapping for QueryHaus
//!
//! This crate provides the immutable query model (criteria, boundaries, groups,
//! joins, sorting and paging), the entity mapping context with aggregate path
//! resolution, and the dialect-aware statement renderer.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod entity_template;
pub mod errors;
pub mod identifier;
pub mod mapping;
pub mod prelude;
pub mod query_builder;
pub mod render;
pub mod traits;
pub mod validation;

pub use entity_template::{EntityTemplate, PgExecutor};
pub use errors::QueryError;
pub use identifier::{IdentifierProcessing, SqlIdentifier, Table};
pub use mapping::{AggregatePath, Entity, MappingContext};
pub use query_builder::{
    Boundary, Criteria, Direction, Groups, JoinClause, JoinType, Joins, Order, Page, PageRequest,
    Pageable, Query, Range, Scope, Sort,
};
pub use render::{Dialect, PreparedStatement, SelectSpec, StatementMapper};
pub use traits::StatementExecutor;
pub use type_mapping::SqlValue;
pub use validation::ValidationError;
