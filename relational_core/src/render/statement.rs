//! Statement inputs and outputs
//!
//! [`SelectSpec`] is what gets rendered: a table, optionally the mapped entity
//! stored in it, and a [`Query`]. [`PreparedStatement`] is what comes out: SQL
//! text plus the values for its bind markers in positional order.

use crate::errors::QueryError;
use crate::identifier::Table;
use crate::mapping::{Entity, MappingContext, PersistentEntity};
use crate::query_builder::{Boundary, Criteria, Groups, Joins, Pageable, Query, Sort};
use std::fmt;
use std::sync::Arc;
use type_mapping::SqlValue;

/// Description of a SELECT against one table
#[derive(Debug, Clone)]
pub struct SelectSpec {
    table: Table,
    entity: Option<Arc<PersistentEntity>>,
    query: Query,
    distinct: bool,
}

impl SelectSpec {
    /// Select from a plain table; property names render as `table.name`
    pub fn create(table: &str) -> Result<Self, QueryError> {
        Ok(Self::from_table(Table::new(table)?))
    }

    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            entity: None,
            query: Query::empty(),
            distinct: false,
        }
    }

    /// Select from the table of `T`; property names map to its columns.
    ///
    /// Render it with a mapper over the same `context`.
    pub fn for_entity<T: Entity>(context: &MappingContext) -> Result<Self, QueryError> {
        let entity = context.persistent_entity::<T>()?;
        Ok(Self {
            table: Table::from_identifier(entity.table_name().clone()),
            entity: Some(entity),
            query: Query::empty(),
            distinct: false,
        })
    }

    pub fn with_projection<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_query(self.query.columns(columns))
    }

    /// Replace the query
    pub fn with_query(&self, query: Query) -> Self {
        Self {
            query,
            ..self.clone()
        }
    }

    pub fn with_criteria(&self, criteria: Criteria) -> Self {
        self.with_query(self.query.and_criteria(criteria))
    }

    pub fn with_sort(&self, sort: &Sort) -> Result<Self, QueryError> {
        Ok(self.with_query(self.query.sort(sort)?))
    }

    pub fn with_page(&self, pageable: &Pageable) -> Result<Self, QueryError> {
        Ok(self.with_query(self.query.with(pageable)?))
    }

    pub fn with_boundary(&self, boundary: &Boundary) -> Self {
        self.with_query(self.query.with_boundary(boundary))
    }

    pub fn with_group_by(&self, groups: Groups) -> Self {
        self.with_query(self.query.group_by(groups))
    }

    pub fn with_join(&self, joins: Joins) -> Self {
        self.with_query(self.query.join(joins))
    }

    pub fn distinct(&self) -> Self {
        Self {
            distinct: true,
            ..self.clone()
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn entity(&self) -> Option<&Arc<PersistentEntity>> {
        self.entity.as_ref()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }
}

/// One bound parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Zero-based position
    pub index: usize,
    /// Placeholder as it appears in the SQL text
    pub marker: String,
    pub value: SqlValue,
}

/// Rendered SQL with its bind values
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    sql: String,
    bindings: Vec<Binding>,
}

impl PreparedStatement {
    pub fn new(sql: String, bindings: Vec<Binding>) -> Self {
        Self { sql, bindings }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Value bound at zero-based position `index`
    pub fn binding(&self, index: usize) -> Option<&SqlValue> {
        self.bindings.get(index).map(|binding| &binding.value)
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.bindings.iter().map(|binding| &binding.value)
    }
}

impl fmt::Display for PreparedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
