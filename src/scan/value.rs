//! Row values and their coercions
//!
//! A row position holds whatever the hit carried, resolved to a concrete
//! type only when the caller reads it. Coercions are total over
//! [`FieldValue`]: every variant either converts or yields a
//! [`CoercionError`].
//!
//! Field projection wraps even single values in a list, so a one-element
//! list holding a scalar reads as that scalar. Any other list renders as
//! a JSON array.
//!
//! Numbers keep the representation the store sent: `3.0` reads as text
//! `"3.0"`, and a u64 above `i64::MAX` keeps every digit.

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Result type for coercions
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Why a stored value could not be read as the requested type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Nothing was stored at this position
    #[error("value is null")]
    Absent,

    /// The value's text form does not parse as the target type
    #[error("cannot parse {text:?} as {target}")]
    Unparseable { text: String, target: &'static str },
}

/// Texts that read as boolean `false` (compared lowercase)
const FALSE_TEXTS: [&str; 5] = ["", "false", "off", "no", "0"];

/// A value stored at one row position
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No key matched this column, or the document held `null`
    #[default]
    Absent,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Multi-valued field or projected value list
    List(Vec<Value>),
    /// Object sub-tree
    Document(Map<String, Value>),
}

impl FieldValue {
    /// Wrap a JSON value without interpreting it further
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(items),
            Value::Object(map) => FieldValue::Document(map),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Variant name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
            FieldValue::Document(_) => "document",
        }
    }

    /// Unwrap a one-element list holding a scalar
    fn flattened(&self) -> Cow<'_, FieldValue> {
        match self {
            FieldValue::List(items) if items.len() == 1 && is_scalar(&items[0]) => {
                Cow::Owned(FieldValue::from_json(items[0].clone()))
            }
            other => Cow::Borrowed(other),
        }
    }

    /// Text form of the value.
    ///
    /// Lists render as a JSON array, objects as a JSON object.
    pub fn to_text(&self) -> CoercionResult<String> {
        match self.flattened().as_ref() {
            FieldValue::Absent => Err(CoercionError::Absent),
            FieldValue::Bool(b) => Ok(b.to_string()),
            FieldValue::Number(n) => Ok(n.to_string()),
            FieldValue::Text(s) => Ok(s.clone()),
            FieldValue::List(items) => Ok(Value::Array(items.clone()).to_string()),
            FieldValue::Document(map) => Ok(Value::Object(map.clone()).to_string()),
        }
    }

    /// Permissive boolean: `false` only for the texts in [`FALSE_TEXTS`]
    /// (case-insensitive), `true` for anything else.
    pub fn to_boolean(&self) -> CoercionResult<bool> {
        let text = self.to_text()?.to_lowercase();
        Ok(!FALSE_TEXTS.contains(&text.as_str()))
    }

    pub fn to_integer(&self) -> CoercionResult<i64> {
        match self.flattened().as_ref() {
            FieldValue::Number(n) => n.as_i64().ok_or_else(|| CoercionError::Unparseable {
                text: n.to_string(),
                target: "bigint",
            }),
            other => {
                let text = other.to_text()?;
                text.parse::<i64>()
                    .map_err(|_| CoercionError::Unparseable { text, target: "bigint" })
            }
        }
    }

    pub fn to_float(&self) -> CoercionResult<f64> {
        match self.flattened().as_ref() {
            FieldValue::Number(n) => n.as_f64().ok_or_else(|| CoercionError::Unparseable {
                text: n.to_string(),
                target: "double",
            }),
            other => {
                let text = other.to_text()?;
                text.parse::<f64>()
                    .map_err(|_| CoercionError::Unparseable { text, target: "double" })
            }
        }
    }

    /// JSON rendering of the stored value, `null` when absent
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Absent => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(items.clone()),
            FieldValue::Document(map) => Value::Object(map.clone()),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => write!(f, "{}", text),
            Err(_) => write!(f, "null"),
        }
    }
}
