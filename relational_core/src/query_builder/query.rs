//! The immutable query value
//!
//! Every transformation returns a new `Query`; the receiver is never touched,
//! so a query can be shared and branched from freely.

use super::boundary::Boundary;
use super::criteria::Criteria;
use super::grouping::Groups;
use super::join::Joins;
use super::ordering::Sort;
use super::pagination::Pageable;
use crate::errors::QueryError;
use crate::identifier::SqlIdentifier;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    criteria: Option<Criteria>,
    columns: Vec<SqlIdentifier>,
    joins: Option<Joins>,
    groups: Option<Groups>,
    sort: Sort,
    limit: Option<u64>,
    offset: u64,
}

impl Query {
    /// Query without criteria, projection, sort or paging
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn query(criteria: Criteria) -> Self {
        Self {
            criteria: Some(criteria),
            ..Self::default()
        }
    }

    /// Append plain column names to the projection
    pub fn columns<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_identifiers(columns.into_iter().map(|c| SqlIdentifier::unquoted(c)))
    }

    /// Append identifiers to the projection; duplicates are kept
    pub fn column_identifiers<I>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = SqlIdentifier>,
    {
        let mut query = self.clone();
        query.columns.extend(columns);
        query
    }

    /// Append `sort` to the current sort. Case-insensitive orders are rejected.
    pub fn sort(&self, sort: &Sort) -> Result<Self, QueryError> {
        assert_no_case_sort(sort)?;

        let mut query = self.clone();
        query.sort = self.sort.and(sort);
        Ok(query)
    }

    pub fn limit(&self, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }

    pub fn offset(&self, offset: u64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    /// Apply paging: boundary first, then sort, limit and offset
    pub fn with(&self, pageable: &Pageable) -> Result<Self, QueryError> {
        let request = match pageable.request() {
            Some(request) => request,
            None => return Ok(self.clone()),
        };

        let bounded = match pageable.boundary() {
            Some(boundary) => self.with_boundary(boundary),
            None => self.clone(),
        };

        Ok(bounded
            .sort(request.sort())?
            .limit(request.page_size())
            .offset(request.offset()))
    }

    /// AND the boundary's predicates into the criteria
    pub fn with_boundary(&self, boundary: &Boundary) -> Self {
        match boundary.to_criteria() {
            Some(bounds) => self.and_criteria(bounds),
            None => self.clone(),
        }
    }

    /// AND `criteria` into the existing criteria
    pub fn and_criteria(&self, criteria: Criteria) -> Self {
        let merged = match &self.criteria {
            Some(existing) => existing.and_with(criteria),
            None => criteria,
        };
        Self {
            criteria: Some(merged),
            ..self.clone()
        }
    }

    /// Replace the grouping
    pub fn group_by(&self, groups: Groups) -> Self {
        Self {
            groups: Some(groups),
            ..self.clone()
        }
    }

    /// Replace the joins
    pub fn join(&self, joins: Joins) -> Self {
        Self {
            joins: Some(joins),
            ..self.clone()
        }
    }

    pub fn criteria(&self) -> Option<&Criteria> {
        self.criteria.as_ref()
    }

    pub fn projection(&self) -> &[SqlIdentifier] {
        &self.columns
    }

    pub fn sorting(&self) -> &Sort {
        &self.sort
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn row_offset(&self) -> u64 {
        self.offset
    }

    pub fn groups(&self) -> Option<&Groups> {
        self.groups.as_ref()
    }

    pub fn joins(&self) -> Option<&Joins> {
        self.joins.as_ref()
    }

    pub fn is_limited(&self) -> bool {
        self.limit.is_some()
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_sorted()
    }

    pub fn has_groups(&self) -> bool {
        self.groups.as_ref().is_some_and(Groups::is_not_empty)
    }

    pub fn has_join(&self) -> bool {
        self.joins.as_ref().is_some_and(Joins::is_not_empty)
    }
}

fn assert_no_case_sort(sort: &Sort) -> Result<(), QueryError> {
    match sort.iter().find(|order| order.is_ignore_case()) {
        Some(order) => Err(QueryError::invalid_argument(format!(
            "Given sort contained an Order for {} with ignore case; ignore case sorting is not supported",
            order.property()
        ))),
        None => Ok(()),
    }
}
