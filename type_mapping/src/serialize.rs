//! Serialization utilities
//!
//! This module converts JSON values into `SqlValue`s.

use crate::types::SqlValue;

/// Convert a JSON value into the closest typed bind value
pub fn json_to_sql_value(value: serde_json::Value) -> SqlValue {
    match value {
        serde_json::Value::String(s) => {
            // Try to parse as RFC3339 timestamp first
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                SqlValue::Timestamp(dt.with_timezone(&chrono::Utc))
            } else if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                SqlValue::Uuid(uuid)
            } else {
                SqlValue::Text(s)
            }
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                    SqlValue::Integer(i as i32)
                } else {
                    SqlValue::BigInt(i)
                }
            } else if let Some(f) = n.as_f64() {
                SqlValue::Float(f)
            } else {
                SqlValue::Decimal(n.to_string())
            }
        }
        serde_json::Value::Bool(b) => SqlValue::Boolean(b),
        serde_json::Value::Null => SqlValue::Null,
        other => SqlValue::Json(other),
    }
}
