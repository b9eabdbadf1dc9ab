//! Query builder utilities
//!
//! This module provides the immutable query model: criteria trees, range
//! boundaries, grouping, joins, sorting and pagination.

pub mod boundary;
pub mod criteria;
pub mod grouping;
pub mod join;
pub mod ordering;
pub mod pagination;
pub mod query;
pub mod range;

#[cfg(test)]
mod tests;

pub use boundary::{Boundary, Scope};
pub use criteria::{Combinator, Comparator, Condition, Criteria};
pub use grouping::Groups;
pub use join::{JoinClause, JoinCondition, JoinType, Joins};
pub use ordering::{Direction, NullHandling, Order, Sort};
pub use pagination::{Page, PageRequest, Pageable};
pub use query::Query;
pub use range::Range;
