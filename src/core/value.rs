//! Database value types
//!
//! This module defines the types that can be bound as parameters and read
//! back from result rows, plus the JSON bridging used by the mapping layer.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::{DatabaseError, Result};

/// Database value that can hold different types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Timestamp (Unix timestamp in microseconds)
    Timestamp(i64),
}

impl SqlValue {
    /// Get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(v) => Some(*v),
            SqlValue::Int(v) => Some(*v != 0),
            SqlValue::Long(v) => Some(*v != 0),
            SqlValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get the value as an i32
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Long(v) => i32::try_from(*v).ok(),
            SqlValue::Float(v) => Some(*v as i32),
            SqlValue::Double(v) => Some(*v as i32),
            SqlValue::String(s) => s.parse().ok(),
            SqlValue::Bool(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Get the value as an i64
    pub fn as_long(&self) -> Option<i64> {
        match self {
            SqlValue::Long(v) => Some(*v),
            SqlValue::Int(v) => Some(*v as i64),
            SqlValue::Float(v) => Some(*v as i64),
            SqlValue::Double(v) => Some(*v as i64),
            SqlValue::String(s) => s.parse().ok(),
            SqlValue::Bool(v) => Some(*v as i64),
            SqlValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as an f32
    pub fn as_float(&self) -> Option<f32> {
        match self {
            SqlValue::Float(v) => Some(*v),
            SqlValue::Double(v) => Some(*v as f32),
            SqlValue::Int(v) => Some(*v as f32),
            SqlValue::Long(v) => Some(*v as f32),
            SqlValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the value as an f64
    pub fn as_double(&self) -> Option<f64> {
        match self {
            SqlValue::Double(v) => Some(*v),
            SqlValue::Float(v) => Some(*v as f64),
            SqlValue::Int(v) => Some(*v as f64),
            SqlValue::Long(v) => Some(*v as f64),
            SqlValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the value as a string reference (zero-copy, String values only)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the value as a string (with conversion)
    pub fn as_string(&self) -> String {
        match self {
            SqlValue::Null => "null".to_string(),
            SqlValue::Bool(v) => v.to_string(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Long(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Double(v) => v.to_string(),
            SqlValue::String(s) => s.clone(),
            SqlValue::Bytes(b) => format!("<{} bytes>", b.len()),
            SqlValue::Timestamp(v) => v.to_string(),
        }
    }

    /// Get the value as bytes (zero-copy)
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SqlValue::Bytes(b) => Some(b),
            SqlValue::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Get the value as a UTC datetime (Timestamp values only)
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            SqlValue::Timestamp(v) => Utc.timestamp_micros(*v).single(),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Long(_) => "long",
            SqlValue::Float(_) => "float",
            SqlValue::Double(_) => "double",
            SqlValue::String(_) => "string",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Convert this value into a JSON value for the dynamic mapping layer
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Bool(v) => serde_json::Value::Bool(*v),
            SqlValue::Int(v) => serde_json::Value::from(*v),
            SqlValue::Long(v) => serde_json::Value::from(*v),
            SqlValue::Float(v) => serde_json::Number::from_f64(*v as f64)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Double(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::String(s) => serde_json::Value::String(s.clone()),
            SqlValue::Bytes(b) => serde_json::to_value(b).unwrap_or(serde_json::Value::Null),
            SqlValue::Timestamp(v) => serde_json::Value::from(*v),
        }
    }

    /// Build a value from a JSON scalar
    ///
    /// Nested arrays and objects cannot be bound as a single SQL parameter
    /// and are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<SqlValue> {
        match value {
            serde_json::Value::Null => Ok(SqlValue::Null),
            serde_json::Value::Bool(v) => Ok(SqlValue::Bool(*v)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Long(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(SqlValue::Double(f))
                } else {
                    Err(DatabaseError::mapping(format!(
                        "numeric value {} does not fit a 64-bit column",
                        n
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(SqlValue::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(
                DatabaseError::mapping("nested arrays and objects cannot be bound as parameters"),
            ),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Long(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Double(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v.timestamp_micros())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v.and_utc().timestamp_micros())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => SqlValue::Null,
        }
    }
}

/// Conversion from a result cell to a concrete Rust type
///
/// Used by `execute_scalar` to extract the first cell of a result set.
/// Returns `None` when the stored value has no sensible conversion.
pub trait FromValue: Sized {
    fn from_value(value: &SqlValue) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &SqlValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i32 {
    fn from_value(value: &SqlValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for i64 {
    fn from_value(value: &SqlValue) -> Option<Self> {
        value.as_long()
    }
}

impl FromValue for f32 {
    fn from_value(value: &SqlValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for f64 {
    fn from_value(value: &SqlValue) -> Option<Self> {
        value.as_double()
    }
}

impl FromValue for String {
    fn from_value(value: &SqlValue) -> Option<Self> {
        Some(value.as_string())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &SqlValue) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

impl FromValue for SqlValue {
    fn from_value(value: &SqlValue) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        let val = SqlValue::Int(42);
        assert_eq!(val.as_int(), Some(42));
        assert_eq!(val.as_long(), Some(42));
        assert_eq!(val.as_string(), "42");

        let val = SqlValue::String("123".to_string());
        assert_eq!(val.as_int(), Some(123));
        assert_eq!(val.as_long(), Some(123));

        let val = SqlValue::Bool(true);
        assert_eq!(val.as_bool(), Some(true));
        assert_eq!(val.as_int(), Some(1));
    }

    #[test]
    fn test_value_from_types() {
        let val: SqlValue = 42.into();
        assert_eq!(val, SqlValue::Int(42));

        let val: SqlValue = "hello".into();
        assert_eq!(val, SqlValue::String("hello".to_string()));

        let val: SqlValue = Some(42).into();
        assert_eq!(val, SqlValue::Int(42));

        let val: SqlValue = Option::<i32>::None.into();
        assert_eq!(val, SqlValue::Null);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(1938, 6, 18, 0, 0, 0).unwrap();
        let val: SqlValue = dt.into();
        assert_eq!(val.type_name(), "timestamp");
        assert_eq!(val.as_datetime(), Some(dt));
    }

    #[test]
    fn test_json_bridge() {
        assert_eq!(
            SqlValue::from_json(&serde_json::json!(7)).unwrap(),
            SqlValue::Long(7)
        );
        assert_eq!(
            SqlValue::from_json(&serde_json::json!("x")).unwrap(),
            SqlValue::String("x".to_string())
        );
        assert_eq!(
            SqlValue::from_json(&serde_json::Value::Null).unwrap(),
            SqlValue::Null
        );
        assert!(SqlValue::from_json(&serde_json::json!([1, 2])).is_err());

        assert_eq!(SqlValue::Long(7).to_json(), serde_json::json!(7));
        assert_eq!(
            SqlValue::String("x".to_string()).to_json(),
            serde_json::json!("x")
        );
    }

    #[test]
    fn test_from_value_trait() {
        assert_eq!(i64::from_value(&SqlValue::Long(5)), Some(5));
        assert_eq!(String::from_value(&SqlValue::Int(5)), Some("5".to_string()));
        assert_eq!(i32::from_value(&SqlValue::Bytes(vec![1])), None);
    }
}
