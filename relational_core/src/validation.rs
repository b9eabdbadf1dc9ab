//! Validation module
//!
//! Identifier and expression checks applied when names supplied as raw
//! strings enter a query (boundaries, groups, joins, table names).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Property expressions that may be inlined into SQL: letters, digits, `_`, `.` and parentheses.
static SAFE_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-zA-Z_.()]+$").expect("safe expression pattern is valid"));

/// PostgreSQL identifier length limit
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validation errors for identifiers and inlined expressions
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Expression contains characters outside the safe set
    UnsafeExpression { context: &'static str, name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => {
                write!(f, "Name cannot be empty")
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::UnsafeExpression { context, name } => {
                write!(
                    f,
                    "{} '{}' must only contain letters, digits, '_', '.' and parentheses",
                    context, name
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a plain SQL identifier such as a table name or alias
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }

    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    Ok(())
}

/// Check a property expression that will be rendered verbatim.
///
/// `context` names what the expression is used for, e.g. "Boundary property".
pub fn validate_safe_expression(name: &str, context: &'static str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if !SAFE_EXPRESSION.is_match(name) {
        return Err(ValidationError::UnsafeExpression {
            context,
            name: name.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("join_table").is_ok());
        assert!(validate_identifier("Table123").is_ok());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(validate_identifier(""), Err(ValidationError::Empty));
        assert!(matches!(
            validate_identifier("1users"),
            Err(ValidationError::InvalidStartCharacter(_))
        ));
        assert!(matches!(
            validate_identifier("users; DROP TABLE x"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(matches!(
            validate_identifier(&"a".repeat(64)),
            Err(ValidationError::TooLong { length: 64, .. })
        ));
    }

    #[test]
    fn test_safe_expressions() {
        assert!(validate_safe_expression("age", "Boundary property").is_ok());
        assert!(validate_safe_expression("table.name", "Group").is_ok());
        assert!(validate_safe_expression("date(created_at)", "Group").is_ok());
        assert!(validate_safe_expression("COUNT(1)", "Group").is_ok());
    }

    #[test]
    fn test_unsafe_expressions() {
        for name in ["age;", "age 1", "name--", "a'b", "x,y", "a\tb"] {
            assert!(
                matches!(
                    validate_safe_expression(name, "Boundary property"),
                    Err(ValidationError::UnsafeExpression { .. })
                ),
                "{} should be rejected",
                name
            );
        }
        assert_eq!(
            validate_safe_expression("", "Group"),
            Err(ValidationError::Empty)
        );
    }

    #[test]
    fn test_error_messages() {
        let err = validate_safe_expression("a;b", "Boundary property").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Boundary property 'a;b' must only contain letters, digits, '_', '.' and parentheses"
        );
    }
}
