//! SQL identifier model
//!
//! Names are kept symbolic until rendering so that quoting and letter casing
//! can follow the target dialect.

use crate::errors::QueryError;
use crate::validation::validate_identifier;
use std::fmt;

/// Letter casing applied to quoted identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterCasing {
    UpperCase,
    LowerCase,
    AsIs,
}

impl LetterCasing {
    pub fn apply(&self, name: &str) -> String {
        match self {
            LetterCasing::UpperCase => name.to_uppercase(),
            LetterCasing::LowerCase => name.to_lowercase(),
            LetterCasing::AsIs => name.to_string(),
        }
    }
}

/// Quote characters surrounding a quoted identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quoting {
    prefix: &'static str,
    suffix: &'static str,
}

impl Quoting {
    pub const ANSI: Quoting = Quoting::new("\"", "\"");
    pub const BACKTICK: Quoting = Quoting::new("`", "`");
    pub const BRACKETS: Quoting = Quoting::new("[", "]");
    pub const NONE: Quoting = Quoting::new("", "");

    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    pub fn apply(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}

/// How a dialect quotes and cases identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierProcessing {
    quoting: Quoting,
    letter_casing: LetterCasing,
}

impl IdentifierProcessing {
    pub const ANSI: IdentifierProcessing =
        IdentifierProcessing::new(Quoting::ANSI, LetterCasing::UpperCase);
    pub const NONE: IdentifierProcessing =
        IdentifierProcessing::new(Quoting::NONE, LetterCasing::AsIs);

    pub const fn new(quoting: Quoting, letter_casing: LetterCasing) -> Self {
        Self {
            quoting,
            letter_casing,
        }
    }

    pub fn quote(&self, name: &str) -> String {
        self.quoting.apply(name)
    }

    pub fn standardize_letter_case(&self, name: &str) -> String {
        self.letter_casing.apply(name)
    }
}

/// A table, column or alias name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlIdentifier {
    /// Rendered as written
    Unquoted(String),
    /// Rendered with dialect quoting and letter casing
    Quoted(String),
    /// A SQL expression such as `COUNT(*)`; never quoted or qualified
    Expression(String),
}

impl SqlIdentifier {
    pub fn unquoted(name: impl Into<String>) -> Self {
        Self::Unquoted(name.into())
    }

    pub fn quoted(name: impl Into<String>) -> Self {
        Self::Quoted(name.into())
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Self::Expression(expression.into())
    }

    /// The raw name, without quoting
    pub fn name(&self) -> &str {
        match self {
            SqlIdentifier::Unquoted(name)
            | SqlIdentifier::Quoted(name)
            | SqlIdentifier::Expression(name) => name,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, SqlIdentifier::Expression(_))
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, SqlIdentifier::Quoted(_))
    }

    /// Apply `f` to the raw name, keeping the identifier kind
    pub fn transform(&self, f: impl FnOnce(&str) -> String) -> SqlIdentifier {
        match self {
            SqlIdentifier::Unquoted(name) => SqlIdentifier::Unquoted(f(name)),
            SqlIdentifier::Quoted(name) => SqlIdentifier::Quoted(f(name)),
            SqlIdentifier::Expression(name) => SqlIdentifier::Expression(f(name)),
        }
    }

    pub fn to_sql(&self, processing: &IdentifierProcessing) -> String {
        match self {
            SqlIdentifier::Quoted(name) => {
                processing.quote(&processing.standardize_letter_case(name))
            }
            SqlIdentifier::Unquoted(name) | SqlIdentifier::Expression(name) => name.clone(),
        }
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for SqlIdentifier {
    fn from(name: &str) -> Self {
        SqlIdentifier::unquoted(name)
    }
}

impl From<String> for SqlIdentifier {
    fn from(name: String) -> Self {
        SqlIdentifier::unquoted(name)
    }
}

/// A table reference with an optional alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: SqlIdentifier,
    alias: Option<SqlIdentifier>,
}

impl Table {
    /// Create a table reference from a validated plain name
    pub fn new(name: &str) -> Result<Self, QueryError> {
        validate_identifier(name)?;
        Ok(Self::from_identifier(SqlIdentifier::unquoted(name)))
    }

    pub fn from_identifier(name: SqlIdentifier) -> Self {
        Self { name, alias: None }
    }

    pub fn with_alias(&self, alias: &str) -> Result<Self, QueryError> {
        validate_identifier(alias)?;
        Ok(Self {
            name: self.name.clone(),
            alias: Some(SqlIdentifier::unquoted(alias)),
        })
    }

    pub fn name(&self) -> &SqlIdentifier {
        &self.name
    }

    pub fn alias(&self) -> Option<&SqlIdentifier> {
        self.alias.as_ref()
    }

    /// The identifier columns are qualified with: the alias if present, otherwise the name
    pub fn reference(&self) -> &SqlIdentifier {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    /// Render for a FROM clause
    pub fn to_sql(&self, processing: &IdentifierProcessing) -> String {
        match &self.alias {
            Some(alias) => format!(
                "{} AS {}",
                self.name.to_sql(processing),
                alias.to_sql(processing)
            ),
            None => self.name.to_sql(processing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_identifier_uses_processing() {
        let id = SqlIdentifier::quoted("TheName");
        assert_eq!(id.to_sql(&IdentifierProcessing::ANSI), "\"THENAME\"");
        assert_eq!(
            id.to_sql(&IdentifierProcessing::new(
                Quoting::BACKTICK,
                LetterCasing::AsIs
            )),
            "`TheName`"
        );
        assert_eq!(id.to_sql(&IdentifierProcessing::NONE), "TheName");
    }

    #[test]
    fn test_unquoted_and_expression_render_verbatim() {
        assert_eq!(
            SqlIdentifier::unquoted("name").to_sql(&IdentifierProcessing::ANSI),
            "name"
        );
        assert_eq!(
            SqlIdentifier::expression("COUNT(*)").to_sql(&IdentifierProcessing::ANSI),
            "COUNT(*)"
        );
    }

    #[test]
    fn test_transform_keeps_kind() {
        let id = SqlIdentifier::quoted("second").transform(|name| format!("{}_key", name));
        assert_eq!(id, SqlIdentifier::quoted("second_key"));
    }

    #[test]
    fn test_table_alias() {
        let table = Table::new("person").unwrap().with_alias("p").unwrap();
        assert_eq!(table.reference().name(), "p");
        assert_eq!(table.to_sql(&IdentifierProcessing::NONE), "person AS p");

        let plain = Table::new("person").unwrap();
        assert_eq!(plain.reference().name(), "person");
        assert_eq!(plain.to_sql(&IdentifierProcessing::NONE), "person");
    }

    #[test]
    fn test_table_rejects_invalid_names() {
        assert!(matches!(
            Table::new("person; DROP"),
            Err(QueryError::Validation(_))
        ));
        assert!(Table::new("person").unwrap().with_alias("").is_err());
    }
}
