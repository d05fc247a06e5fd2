//! Packed log records and their read-side reconstruction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as persisted in a list: `{"content": ..., "timestamp": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub content: Value,
    /// Unix time in seconds.
    pub timestamp: i64,
}

impl LogRecord {
    pub fn new(content: Value, captured_at: DateTime<Utc>) -> Self {
        Self {
            content,
            timestamp: unix_seconds(captured_at),
        }
    }

    /// Capture time reconstructed from `timestamp * 1000` milliseconds.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp.checked_mul(1000)?)
    }
}

/// Unix seconds, rounded to the nearest second.
fn unix_seconds(at: DateTime<Utc>) -> i64 {
    (at.timestamp_millis() + 500).div_euclid(1000)
}

/// Pack content into record JSON stamped with the current time.
pub fn pack_content(content: &Value) -> String {
    pack_content_at(content, Utc::now())
}

/// Pack content into record JSON stamped with `captured_at`.
pub fn pack_content_at(content: &Value, captured_at: DateTime<Utc>) -> String {
    // Value -> String serialization cannot fail: keys are always strings.
    serde_json::to_string(&LogRecord::new(content.clone(), captured_at)).unwrap_or_default()
}

/// A stored JSON object augmented with its reconstructed capture time.
///
/// Every field of the stored object is kept. `time` is derived from a
/// numeric `timestamp` (seconds) and replaces any stored `time` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl StoredRecord {
    pub fn content(&self) -> Option<&Value> {
        self.fields.get("content")
    }

    /// Whole-second `timestamp`, if the stored one is an integer.
    pub fn timestamp(&self) -> Option<i64> {
        self.fields.get("timestamp").and_then(Value::as_i64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// One element of a range read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Record(StoredRecord),
    /// Stored text that is not a JSON object, returned as-is.
    Raw(String),
}

impl StoredEntry {
    pub fn as_record(&self) -> Option<&StoredRecord> {
        match self {
            StoredEntry::Record(record) => Some(record),
            StoredEntry::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, StoredEntry::Raw(_))
    }
}

/// Parse one stored element.
///
/// Only text that is not a JSON object comes back as [`StoredEntry::Raw`].
pub fn parse_entry(raw: &str) -> StoredEntry {
    let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(raw) else {
        return StoredEntry::Raw(raw.to_string());
    };
    let time = fields.get("timestamp").and_then(time_from_seconds);
    if time.is_some() {
        fields.remove("time");
    }
    StoredEntry::Record(StoredRecord { fields, time })
}

/// Date for `seconds * 1000` milliseconds, truncated to whole milliseconds.
fn time_from_seconds(seconds: &Value) -> Option<DateTime<Utc>> {
    let millis = match seconds.as_i64() {
        Some(seconds) => seconds.checked_mul(1000)?,
        None => {
            let millis = (seconds.as_f64()? * 1000.0).trunc();
            if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
                return None;
            }
            millis as i64
        }
    };
    DateTime::from_timestamp_millis(millis)
}
