//! Range boundaries over named properties
//!
//! A `Boundary` is an ordered list of scopes, each restricting one property
//! to a [`Range`]. Property names are validated when the scope is created.

use super::criteria::Criteria;
use super::range::Range;
use crate::errors::QueryError;
use crate::validation::validate_safe_expression;
use std::ops::Bound;
use type_mapping::SqlValue;

/// One property restricted to a range
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    property: String,
    range: Range<SqlValue>,
}

impl Scope {
    pub fn by<T: Into<SqlValue>>(
        property: impl Into<String>,
        range: impl Into<Range<T>>,
    ) -> Result<Self, QueryError> {
        let property = property.into();
        validate_safe_expression(&property, "Boundary property")
            .map_err(|e| QueryError::invalid_argument(e.to_string()))?;

        Ok(Self {
            property,
            range: range.into().map(Into::into),
        })
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn range(&self) -> &Range<SqlValue> {
        &self.range
    }

    /// Lower bound comparison ANDed with upper bound comparison; `None` when unbounded
    pub fn to_criteria(&self) -> Option<Criteria> {
        let lower = match self.range.lower() {
            Bound::Included(value) => Some(Criteria::gte(self.property.as_str(), value.clone())),
            Bound::Excluded(value) => Some(Criteria::gt(self.property.as_str(), value.clone())),
            Bound::Unbounded => None,
        };
        let upper = match self.range.upper() {
            Bound::Included(value) => Some(Criteria::lte(self.property.as_str(), value.clone())),
            Bound::Excluded(value) => Some(Criteria::lt(self.property.as_str(), value.clone())),
            Bound::Unbounded => None,
        };

        match (lower, upper) {
            (Some(lower), Some(upper)) => Some(Criteria::and(vec![lower, upper])),
            (Some(single), None) | (None, Some(single)) => Some(single),
            (None, None) => None,
        }
    }
}

/// Ordered scopes that together restrict a query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundary {
    scopes: Vec<Scope>,
}

impl Boundary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(scopes: Vec<Scope>) -> Self {
        Self { scopes }
    }

    /// Single-scope boundary
    pub fn by<T: Into<SqlValue>>(
        property: impl Into<String>,
        range: impl Into<Range<T>>,
    ) -> Result<Self, QueryError> {
        Ok(Self::of(vec![Scope::by(property, range)?]))
    }

    /// Returns a new boundary with `scope` appended
    pub fn and(&self, scope: Scope) -> Self {
        let mut scopes = self.scopes.clone();
        scopes.push(scope);
        Self { scopes }
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// All scope predicates combined with AND; `None` if no scope restricts anything
    pub fn to_criteria(&self) -> Option<Criteria> {
        let parts: Vec<Criteria> = self.scopes.iter().filter_map(Scope::to_criteria).collect();
        Criteria::and(parts).simplify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::criteria::{Comparator, Condition};

    fn comparators(criteria: &Criteria) -> Vec<Comparator> {
        criteria.conditions().iter().map(|c| c.comparator).collect()
    }

    #[test]
    fn test_lower_inclusive_only() {
        let boundary = Boundary::by("age", 5..).unwrap();
        let criteria = boundary.to_criteria().unwrap();

        assert_eq!(
            criteria,
            Criteria::Condition(Condition {
                field: "age".to_string(),
                comparator: Comparator::Gte,
                value: Some(SqlValue::Integer(5)),
            })
        );
    }

    #[test]
    fn test_bound_operators() {
        let closed = Boundary::by("age", 5..=10).unwrap().to_criteria().unwrap();
        assert_eq!(comparators(&closed), vec![Comparator::Gte, Comparator::Lte]);

        let open = Boundary::by("age", Range::open(5, 10))
            .unwrap()
            .to_criteria()
            .unwrap();
        assert_eq!(comparators(&open), vec![Comparator::Gt, Comparator::Lt]);

        let half = Boundary::by("age", ..10).unwrap().to_criteria().unwrap();
        assert_eq!(comparators(&half), vec![Comparator::Lt]);
    }

    #[test]
    fn test_unbounded_scope_contributes_nothing() {
        let boundary = Boundary::by("age", Range::<i32>::unbounded()).unwrap();
        assert!(boundary.is_not_empty());
        assert_eq!(boundary.to_criteria(), None);
        assert_eq!(Boundary::empty().to_criteria(), None);
    }

    #[test]
    fn test_multiple_scopes_are_anded_in_order() {
        let boundary = Boundary::by("age", 5..=10)
            .unwrap()
            .and(Scope::by("name", Range::closed("A", "M")).unwrap());

        let criteria = boundary.to_criteria().unwrap();
        let fields: Vec<&str> = criteria
            .conditions()
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(fields, vec!["age", "age", "name", "name"]);
    }

    #[test]
    fn test_unsafe_property_names_rejected() {
        for property in ["age;", "age --", "a b", "", "name'"] {
            let result = Scope::by(property, 1..2);
            assert!(
                matches!(result, Err(QueryError::InvalidArgument(_))),
                "{:?} should be rejected",
                property
            );
        }
    }

    #[test]
    fn test_expression_property_allowed() {
        assert!(Scope::by("date(created_at)", 1..2).is_ok());
        assert!(Scope::by("person.age", 1..2).is_ok());
    }
}
