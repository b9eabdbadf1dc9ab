use crate::errors::QueryError;
use crate::validation::validate_safe_expression;

/// Ordered GROUP BY columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    columns: Vec<String>,
}

impl Groups {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group by the given columns, in order
    pub fn by<I, S>(columns: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|column| {
                let column = column.into();
                validate_group_column(&column)?;
                Ok(column)
            })
            .collect::<Result<Vec<_>, QueryError>>()?;

        Ok(Self { columns })
    }

    /// Returns new groups with `column` appended
    pub fn and(&self, column: impl Into<String>) -> Result<Self, QueryError> {
        let column = column.into();
        validate_group_column(&column)?;

        let mut columns = self.columns.clone();
        columns.push(column);
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }
}

fn validate_group_column(column: &str) -> Result<(), QueryError> {
    validate_safe_expression(column, "Group column")
        .map_err(|e| QueryError::invalid_argument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_keep_insertion_order() {
        let groups = Groups::by(["name", "date"]).unwrap().and("id").unwrap();

        assert_eq!(groups.columns(), &["name", "date", "id"]);
        assert!(groups.is_not_empty());
    }

    #[test]
    fn test_and_does_not_modify_receiver() {
        let groups = Groups::by(["name"]).unwrap();
        let extended = groups.and("date").unwrap();

        assert_eq!(groups.columns().len(), 1);
        assert_eq!(extended.columns().len(), 2);
    }

    #[test]
    fn test_unsafe_group_rejected() {
        assert!(matches!(
            Groups::by(["name", "date; DROP TABLE person"]),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(Groups::empty().and("a b").is_err());
    }

    #[test]
    fn test_expression_groups_allowed() {
        let groups = Groups::by(["date(created_at)"]).unwrap();
        assert_eq!(groups.iter().collect::<Vec<_>>(), vec!["date(created_at)"]);
    }
}
