//! Content carried by a log message.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Content of a log message.
///
/// Either an error-like value (only its message is kept) or any JSON value.
/// Strings, numbers and booleans are primitive; objects and arrays are
/// structured.
#[derive(Debug, Clone, PartialEq)]
pub enum LogContent {
    /// An error, reduced to its message.
    Error { message: String },
    /// Any JSON value.
    Value(Value),
}

impl LogContent {
    /// Capture an error by its display message.
    pub fn from_error(error: &(dyn std::error::Error + '_)) -> Self {
        LogContent::Error {
            message: error.to_string(),
        }
    }

    /// Capture any serializable value as structured content.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(LogContent::Value)
    }

    /// Whether this content is an object or an array.
    pub fn is_structured(&self) -> bool {
        matches!(self, LogContent::Value(Value::Object(_) | Value::Array(_)))
    }

    /// The content as it is handed to the store, before formatting.
    pub fn to_value(&self) -> Value {
        match self {
            LogContent::Error { message } => Value::String(message.clone()),
            LogContent::Value(value) => value.clone(),
        }
    }
}

/// Reduce content to the value that is packed into a record.
///
/// - errors become their message
/// - objects and arrays become their JSON text
/// - primitives are returned unchanged
pub fn format_content(content: &LogContent) -> Value {
    match content {
        LogContent::Error { message } => Value::String(message.clone()),
        LogContent::Value(value @ (Value::Object(_) | Value::Array(_))) => {
            Value::String(value.to_string())
        }
        LogContent::Value(value) => value.clone(),
    }
}

impl fmt::Display for LogContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogContent::Error { message } => f.write_str(message),
            LogContent::Value(Value::String(text)) => f.write_str(text),
            LogContent::Value(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for LogContent {
    fn from(value: &str) -> Self {
        LogContent::Value(Value::String(value.to_string()))
    }
}

impl From<String> for LogContent {
    fn from(value: String) -> Self {
        LogContent::Value(Value::String(value))
    }
}

impl From<Value> for LogContent {
    fn from(value: Value) -> Self {
        LogContent::Value(value)
    }
}

impl From<bool> for LogContent {
    fn from(value: bool) -> Self {
        LogContent::Value(Value::Bool(value))
    }
}

impl From<i64> for LogContent {
    fn from(value: i64) -> Self {
        LogContent::Value(Value::from(value))
    }
}

impl From<u64> for LogContent {
    fn from(value: u64) -> Self {
        LogContent::Value(Value::from(value))
    }
}

impl From<f64> for LogContent {
    fn from(value: f64) -> Self {
        LogContent::Value(Value::from(value))
    }
}
