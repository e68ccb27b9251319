//! Decoded result rows.
//!
//! A [`Record`] maps column names to [`Value`]s. There is no fixed schema: the column
//! names come either from the query's `Columns` header or from the header row the
//! server sends when no columns were requested.
//!
//! Livestatus has no native boolean or time type on the wire. Booleans arrive as the
//! numbers `0`/`1` and timestamps as Unix epoch seconds, so the typed getters interpret
//! numbers accordingly.
//!
//! # Example
//! ```rust
//! use livestatus::{Record, Value};
//!
//! let record: Record = [
//!     ("name".to_string(), Value::String("localhost".into())),
//!     ("state".to_string(), Value::Number(1.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(record.get_string("name").unwrap(), "localhost");
//! assert!(record.get_bool("state").unwrap());
//! ```
use std::{
    collections::BTreeMap,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use thiserror::Error;

/// Errors raised by typed record access. They never affect other columns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("invalid value for column '{column}', expected {expected}")]
    InvalidValue {
        column: String,
        expected: &'static str,
    },
}

/// A single decoded JSON cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // Every JSON number fits an f64 closely enough for Livestatus columns.
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => {
                Value::Object(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(a) => serde_json::Value::Array(a.iter().map(Into::into).collect()),
            Value::Object(o) => serde_json::Value::Object(
                o.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// One result row, addressable by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `column`, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    /// Number of columns present in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names, sorted.
    pub fn columns(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Raw value stored for `column`.
    pub fn get(&self, column: &str) -> Result<&Value, RecordError> {
        self.0
            .get(column)
            .ok_or_else(|| RecordError::UnknownColumn(column.to_string()))
    }

    /// Livestatus booleans are the numbers `0` and `1`; only `1` is true.
    pub fn get_bool(&self, column: &str) -> Result<bool, RecordError> {
        match self.get(column)? {
            Value::Number(n) => Ok(*n == 1.0),
            _ => Err(invalid(column, "number")),
        }
    }

    pub fn get_float(&self, column: &str) -> Result<f64, RecordError> {
        self.number(column)
    }

    /// Truncates the stored number towards zero.
    pub fn get_int(&self, column: &str) -> Result<i64, RecordError> {
        Ok(self.number(column)? as i64)
    }

    pub fn get_string(&self, column: &str) -> Result<&str, RecordError> {
        match self.get(column)? {
            Value::String(s) => Ok(s),
            _ => Err(invalid(column, "string")),
        }
    }

    pub fn get_slice(&self, column: &str) -> Result<&[Value], RecordError> {
        match self.get(column)? {
            Value::Array(a) => Ok(a),
            _ => Err(invalid(column, "array")),
        }
    }

    /// Interprets the stored number as Unix epoch seconds.
    pub fn get_time(&self, column: &str) -> Result<SystemTime, RecordError> {
        let secs = self.get_int(column)?;
        let offset = Duration::from_secs(secs.unsigned_abs());
        let time = if secs >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        time.ok_or_else(|| invalid(column, "representable timestamp"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn number(&self, column: &str) -> Result<f64, RecordError> {
        match self.get(column)? {
            Value::Number(n) => Ok(*n),
            _ => Err(invalid(column, "number")),
        }
    }
}

fn invalid(column: &str, expected: &'static str) -> RecordError {
    RecordError::InvalidValue {
        column: column.to_string(),
        expected,
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&Record> for serde_json::Value {
    fn from(value: &Record) -> Self {
        serde_json::Value::Object(
            value
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                .collect(),
        )
    }
}
