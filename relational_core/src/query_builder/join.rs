use super::criteria::Criteria;
use crate::errors::QueryError;
use crate::validation::{validate_identifier, validate_safe_expression};

/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN - returns records that have matching values in both tables
    Inner,
    /// LEFT OUTER JOIN - returns all records from the left table and matched records from the right table
    Left,
    /// RIGHT OUTER JOIN - returns all records from the right table and matched records from the left table
    Right,
    /// FULL OUTER JOIN - returns all records when there is a match in either left or right table
    Full,
    /// CROSS JOIN - returns Cartesian product of both tables
    Cross,
}

impl JoinType {
    /// Convert JoinType to SQL string
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT OUTER JOIN",
            JoinType::Right => "RIGHT OUTER JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// Represents a condition for joining tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinCondition {
    /// Join on column equality (e.g., ON orders.user_id = users.id AND ...)
    On(Vec<(String, String)>),
    /// Join using common column names (e.g., USING (id, name))
    Using(Vec<String>),
    /// No condition, only valid for cross joins
    None,
}

/// Represents a complete JOIN clause.
///
/// The optional `criteria` filters joined rows; it is rendered into the
/// statement's WHERE clause, not into the ON condition.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Type of join (INNER, LEFT, etc.)
    pub join_type: JoinType,
    /// Table to join with
    pub table: String,
    /// Optional table alias
    pub alias: Option<String>,
    /// Join condition (ON or USING)
    pub condition: JoinCondition,
    /// Additional filter applied in WHERE
    pub criteria: Option<Criteria>,
}

impl JoinClause {
    /// Create a new JOIN clause with ON condition
    pub fn new_on(
        join_type: JoinType,
        table: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let table = table.into();
        validate_identifier(&table)?;
        let pair = validate_on_pair(left_field.into(), right_field.into())?;

        Ok(Self {
            join_type,
            table,
            alias: None,
            condition: JoinCondition::On(vec![pair]),
            criteria: None,
        })
    }

    /// Create a new JOIN clause with USING condition
    pub fn new_using(
        join_type: JoinType,
        table: impl Into<String>,
        columns: Vec<String>,
    ) -> Result<Self, QueryError> {
        let table = table.into();
        validate_identifier(&table)?;
        if columns.is_empty() {
            return Err(QueryError::invalid_argument(
                "USING join requires at least one column",
            ));
        }
        for column in &columns {
            validate_identifier(column)?;
        }

        Ok(Self {
            join_type,
            table,
            alias: None,
            condition: JoinCondition::Using(columns),
            criteria: None,
        })
    }

    /// Create a CROSS JOIN clause
    pub fn cross(table: impl Into<String>) -> Result<Self, QueryError> {
        let table = table.into();
        validate_identifier(&table)?;

        Ok(Self {
            join_type: JoinType::Cross,
            table,
            alias: None,
            condition: JoinCondition::None,
            criteria: None,
        })
    }

    /// Add another equality to the ON condition
    pub fn and_on(
        mut self,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let pair = validate_on_pair(left_field.into(), right_field.into())?;
        match &mut self.condition {
            JoinCondition::On(pairs) => pairs.push(pair),
            _ => {
                return Err(QueryError::invalid_argument(format!(
                    "Join on '{}' has no ON condition to extend",
                    self.table
                )))
            }
        }
        Ok(self)
    }

    /// Add an alias for the joined table
    pub fn with_alias(mut self, alias: impl Into<String>) -> Result<Self, QueryError> {
        let alias = alias.into();
        validate_identifier(&alias)?;
        self.alias = Some(alias);
        Ok(self)
    }

    /// Attach a filter on the joined rows, ANDed with any existing one
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(match self.criteria.take() {
            Some(existing) => existing.and_with(criteria),
            None => criteria,
        });
        self
    }

    /// Get the table reference (alias if present, otherwise table name)
    pub fn table_ref(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.table)
    }
}

fn validate_on_pair(left: String, right: String) -> Result<(String, String), QueryError> {
    for field in [&left, &right] {
        validate_safe_expression(field, "Join column")
            .map_err(|e| QueryError::invalid_argument(e.to_string()))?;
    }
    Ok((left, right))
}

/// Ordered JOIN clauses of a query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Joins {
    clauses: Vec<JoinClause>,
}

impl Joins {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(clauses: Vec<JoinClause>) -> Self {
        Self { clauses }
    }

    pub fn join(clause: JoinClause) -> Self {
        Self::of(vec![clause])
    }

    /// Returns new joins with `clause` appended
    pub fn and(&self, clause: JoinClause) -> Self {
        let mut clauses = self.clauses.clone();
        clauses.push(clause);
        Self { clauses }
    }

    pub fn clauses(&self) -> &[JoinClause] {
        &self.clauses
    }

    pub fn iter(&self) -> impl Iterator<Item = &JoinClause> {
        self.clauses.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_type_to_sql() {
        assert_eq!(JoinType::Inner.to_sql(), "INNER JOIN");
        assert_eq!(JoinType::Left.to_sql(), "LEFT OUTER JOIN");
        assert_eq!(JoinType::Right.to_sql(), "RIGHT OUTER JOIN");
        assert_eq!(JoinType::Full.to_sql(), "FULL OUTER JOIN");
        assert_eq!(JoinType::Cross.to_sql(), "CROSS JOIN");
    }

    #[test]
    fn test_join_clause_new_on() {
        let join = JoinClause::new_on(JoinType::Inner, "orders", "users.id", "orders.user_id")
            .unwrap();

        assert_eq!(join.join_type, JoinType::Inner);
        assert_eq!(join.table, "orders");
        assert_eq!(join.alias, None);
        assert_eq!(
            join.condition,
            JoinCondition::On(vec![("users.id".to_string(), "orders.user_id".to_string())])
        );
        assert_eq!(join.criteria, None);
    }

    #[test]
    fn test_join_clause_new_using() {
        let join =
            JoinClause::new_using(JoinType::Left, "profiles", vec!["user_id".to_string()]).unwrap();

        assert_eq!(join.join_type, JoinType::Left);
        assert_eq!(join.table, "profiles");
        assert_eq!(
            join.condition,
            JoinCondition::Using(vec!["user_id".to_string()])
        );
        assert!(JoinClause::new_using(JoinType::Left, "profiles", vec![]).is_err());
    }

    #[test]
    fn test_join_clause_with_alias() {
        let join = JoinClause::new_on(JoinType::Left, "orders", "users.id", "o.user_id")
            .unwrap()
            .with_alias("o")
            .unwrap();

        assert_eq!(join.alias, Some("o".to_string()));
        assert_eq!(join.table_ref(), "o");
    }

    #[test]
    fn test_join_clause_table_ref_without_alias() {
        let join = JoinClause::new_on(JoinType::Inner, "orders", "users.id", "orders.user_id")
            .unwrap();

        assert_eq!(join.table_ref(), "orders");
    }

    #[test]
    fn test_and_on_extends_condition() {
        let join = JoinClause::new_on(JoinType::Inner, "orders", "orders.user_id", "users.id")
            .unwrap()
            .and_on("orders.tenant", "users.tenant")
            .unwrap();

        match &join.condition {
            JoinCondition::On(pairs) => assert_eq!(pairs.len(), 2),
            other => panic!("unexpected condition {:?}", other),
        }
        assert!(JoinClause::cross("regions")
            .unwrap()
            .and_on("a", "b")
            .is_err());
    }

    #[test]
    fn test_with_criteria_accumulates() {
        let join = JoinClause::new_on(JoinType::Left, "join_table", "join_table.id", "table.join_id")
            .unwrap()
            .with_criteria(Criteria::eq("join_table.id", 1))
            .with_criteria(Criteria::is_not_null("join_table.name"));

        assert_eq!(join.criteria.unwrap().conditions().len(), 2);
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(JoinClause::new_on(JoinType::Inner, "orders;", "a", "b").is_err());
        assert!(matches!(
            JoinClause::new_on(JoinType::Inner, "orders", "a = 1 OR 1", "b"),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(JoinClause::cross("regions").unwrap().with_alias("r x").is_err());
    }

    #[test]
    fn test_joins_and_is_persistent() {
        let first = JoinClause::cross("a").unwrap();
        let second = JoinClause::cross("b").unwrap();

        let joins = Joins::join(first);
        let extended = joins.and(second);

        assert_eq!(joins.clauses().len(), 1);
        assert_eq!(extended.clauses().len(), 2);
        assert_eq!(extended.iter().map(|j| j.table.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
