//! Convenience re-exports for common relational-core usage

// Query model
pub use crate::query_builder::{
    Boundary, Criteria, Direction, Groups, JoinClause, JoinType, Joins, NullHandling, Order, Page,
    PageRequest, Pageable, Query, Range, Scope, Sort,
};

// Mapping
pub use crate::mapping::{
    AggregatePath, Entity, EntityDescriptor, MappingContext, NamingStrategy, PropertyDescriptor,
    TableInfo,
};

// Rendering
pub use crate::render::{Dialect, PreparedStatement, SelectSpec, StatementMapper};

// Execution
pub use crate::entity_template::{EntityTemplate, PgExecutor};
pub use crate::traits::StatementExecutor;

// Errors and identifiers
pub use crate::errors::QueryError;
pub use crate::identifier::{IdentifierProcessing, SqlIdentifier, Table};
pub use crate::validation::ValidationError;

pub use type_mapping::SqlValue;
