//! Criteria predicate trees
//!
//! A `Criteria` is either a single column comparison or a group of criteria
//! combined with AND/OR. Trees are plain values: combining two criteria
//! produces a new tree.

use type_mapping::SqlValue;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,        // =
    Ne,        // !=
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    NotLike,   // NOT LIKE
    In,        // IN
    NotIn,     // NOT IN
    IsNull,    // IS NULL
    IsNotNull, // IS NOT NULL
    IsTrue,    // IS TRUE
    IsFalse,   // IS FALSE
}

impl Comparator {
    /// SQL operator for binary comparisons
    pub fn to_sql(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Like => "LIKE",
            Comparator::NotLike => "NOT LIKE",
            Comparator::In => "IN",
            Comparator::NotIn => "NOT IN",
            Comparator::IsNull => "IS NULL",
            Comparator::IsNotNull => "IS NOT NULL",
            Comparator::IsTrue => "IS TRUE",
            Comparator::IsFalse => "IS FALSE",
        }
    }
}

/// Single column comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub comparator: Comparator,
    pub value: Option<SqlValue>, // None for unary comparators
}

/// Logical operators for combining criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// Predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Condition(Condition),
    Group {
        combinator: Combinator,
        parts: Vec<Criteria>,
    },
}

impl Default for Criteria {
    fn default() -> Self {
        Self::empty()
    }
}

impl Criteria {
    /// Criteria without any condition
    pub fn empty() -> Self {
        Self::Group {
            combinator: Combinator::And,
            parts: Vec::new(),
        }
    }

    /// Create a simple condition
    pub fn condition(
        field: impl Into<String>,
        comparator: Comparator,
        value: Option<SqlValue>,
    ) -> Self {
        Self::Condition(Condition {
            field: field.into(),
            comparator,
            value,
        })
    }

    /// Create AND group
    pub fn and(parts: Vec<Criteria>) -> Self {
        Self::Group {
            combinator: Combinator::And,
            parts,
        }
    }

    /// Create OR group
    pub fn or(parts: Vec<Criteria>) -> Self {
        Self::Group {
            combinator: Combinator::Or,
            parts,
        }
    }

    /// Equal condition; a null value renders as `IS NULL`
    pub fn eq(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, Comparator::Eq, Some(value.into()))
    }

    /// Not equal condition; a null value renders as `IS NOT NULL`
    pub fn ne(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, Comparator::Ne, Some(value.into()))
    }

    pub fn gt(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, Comparator::Gt, Some(value.into()))
    }

    pub fn gte(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, Comparator::Gte, Some(value.into()))
    }

    pub fn lt(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, Comparator::Lt, Some(value.into()))
    }

    pub fn lte(field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, Comparator::Lte, Some(value.into()))
    }

    pub fn like(field: impl Into<String>, pattern: &str) -> Self {
        Self::condition(field, Comparator::Like, Some(SqlValue::from(pattern)))
    }

    pub fn not_like(field: impl Into<String>, pattern: &str) -> Self {
        Self::condition(field, Comparator::NotLike, Some(SqlValue::from(pattern)))
    }

    /// IN condition; an empty list never matches
    pub fn in_values<V: Into<SqlValue>>(field: impl Into<String>, values: Vec<V>) -> Self {
        Self::condition(field, Comparator::In, Some(SqlValue::from(values)))
    }

    /// NOT IN condition; an empty list always matches
    pub fn not_in_values<V: Into<SqlValue>>(field: impl Into<String>, values: Vec<V>) -> Self {
        Self::condition(field, Comparator::NotIn, Some(SqlValue::from(values)))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::condition(field, Comparator::IsNull, None)
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::condition(field, Comparator::IsNotNull, None)
    }

    pub fn is_true(field: impl Into<String>) -> Self {
        Self::condition(field, Comparator::IsTrue, None)
    }

    pub fn is_false(field: impl Into<String>) -> Self {
        Self::condition(field, Comparator::IsFalse, None)
    }

    /// Combine with `other` using AND
    pub fn and_with(&self, other: Criteria) -> Criteria {
        self.combine(Combinator::And, other)
    }

    /// Combine with `other` using OR
    pub fn or_with(&self, other: Criteria) -> Criteria {
        self.combine(Combinator::Or, other)
    }

    fn combine(&self, combinator: Combinator, other: Criteria) -> Criteria {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self.clone();
        }
        match self {
            // Extend a group of the same kind instead of nesting it
            Criteria::Group {
                combinator: existing,
                parts,
            } if *existing == combinator => {
                let mut parts = parts.clone();
                parts.push(other);
                Criteria::Group { combinator, parts }
            }
            _ => Criteria::Group {
                combinator,
                parts: vec![self.clone(), other],
            },
        }
    }

    /// True when the tree holds no condition at all
    pub fn is_empty(&self) -> bool {
        match self {
            Criteria::Condition(_) => false,
            Criteria::Group { parts, .. } => parts.iter().all(Criteria::is_empty),
        }
    }

    /// Drop empty groups and unwrap groups holding a single part
    pub fn simplify(&self) -> Option<Criteria> {
        match self {
            Criteria::Condition(_) => Some(self.clone()),
            Criteria::Group { combinator, parts } => {
                let mut parts: Vec<Criteria> = parts.iter().filter_map(Criteria::simplify).collect();
                match parts.len() {
                    0 => None,
                    1 => parts.pop(),
                    _ => Some(Criteria::Group {
                        combinator: *combinator,
                        parts,
                    }),
                }
            }
        }
    }

    /// All conditions in textual order
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut conditions = Vec::new();
        self.collect_conditions(&mut conditions);
        conditions
    }

    fn collect_conditions<'a>(&'a self, into: &mut Vec<&'a Condition>) {
        match self {
            Criteria::Condition(condition) => into.push(condition),
            Criteria::Group { parts, .. } => {
                for part in parts {
                    part.collect_conditions(into);
                }
            }
        }
    }
}
