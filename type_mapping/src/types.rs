//! Type mapping definitions
//!
//! This module provides the typed value wrapper used for statement bindings
//! and the conversions from common Rust types into it.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A typed value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    SmallInt(i16),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Date(chrono::NaiveDate),
    Decimal(String), // Store as string to preserve precision
    Json(serde_json::Value),
    Array(Vec<SqlValue>),
    Null,
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Text(_) => "text",
            SqlValue::Integer(_) => "integer",
            SqlValue::BigInt(_) => "bigint",
            SqlValue::SmallInt(_) => "smallint",
            SqlValue::Float(_) => "float",
            SqlValue::Boolean(_) => "boolean",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Date(_) => "date",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Json(_) => "json",
            SqlValue::Array(_) => "array",
            SqlValue::Null => "null",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(s) => write!(f, "'{}'", s),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::BigInt(i) => write!(f, "{}", i),
            SqlValue::SmallInt(i) => write!(f, "{}", i),
            SqlValue::Float(x) => write!(f, "{}", x),
            SqlValue::Boolean(b) => write!(f, "{}", b),
            SqlValue::Uuid(u) => write!(f, "'{}'", u),
            SqlValue::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
            SqlValue::Date(d) => write!(f, "'{}'", d),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::Json(v) => write!(f, "'{}'", v),
            SqlValue::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

/// Convert basic Rust types to SqlValue
impl From<String> for SqlValue {
    fn from(val: String) -> Self {
        SqlValue::Text(val)
    }
}

impl From<&str> for SqlValue {
    fn from(val: &str) -> Self {
        SqlValue::Text(val.to_string())
    }
}

impl From<i32> for SqlValue {
    fn from(val: i32) -> Self {
        SqlValue::Integer(val)
    }
}

impl From<i64> for SqlValue {
    fn from(val: i64) -> Self {
        SqlValue::BigInt(val)
    }
}

impl From<i16> for SqlValue {
    fn from(val: i16) -> Self {
        SqlValue::SmallInt(val)
    }
}

impl From<f64> for SqlValue {
    fn from(val: f64) -> Self {
        SqlValue::Float(val)
    }
}

impl From<bool> for SqlValue {
    fn from(val: bool) -> Self {
        SqlValue::Boolean(val)
    }
}

impl From<Uuid> for SqlValue {
    fn from(val: Uuid) -> Self {
        SqlValue::Uuid(val)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        SqlValue::Timestamp(val)
    }
}

impl From<chrono::NaiveDate> for SqlValue {
    fn from(val: chrono::NaiveDate) -> Self {
        SqlValue::Date(val)
    }
}

/// JSON scalars map onto their typed counterparts; objects and arrays stay JSON
impl From<serde_json::Value> for SqlValue {
    fn from(val: serde_json::Value) -> Self {
        crate::serialize::json_to_sql_value(val)
    }
}

impl<T> From<Vec<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(val: Vec<T>) -> Self {
        SqlValue::Array(val.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(Some(5)), SqlValue::Integer(5));
        assert_eq!(SqlValue::from(None::<i32>), SqlValue::Null);
        assert!(SqlValue::from(None::<String>).is_null());
    }

    #[test]
    fn test_vec_conversion() {
        let value = SqlValue::from(vec!["a", "b"]);
        assert_eq!(
            value,
            SqlValue::Array(vec![SqlValue::Text("a".into()), SqlValue::Text("b".into())])
        );
        assert_eq!(value.type_name(), "array");
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlValue::from("Walter").to_string(), "'Walter'");
        assert_eq!(SqlValue::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(SqlValue::Null.to_string(), "NULL");
    }
}
