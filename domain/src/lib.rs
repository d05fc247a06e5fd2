//! Domain layer for kvlog
//!
//! Value objects and pure functions for persisting log messages into
//! per-service, per-severity lists. No I/O happens here.
//!
//! # Core Concepts
//!
//! - **Severity**: fatal, error, warn, info, debug, trace
//! - **StorageKey**: `"{service}:{severity}"`, one list per pair
//! - **LogRecord**: `{content, timestamp}` stored as JSON text; any stored
//!   JSON object is read back whole, with a `time` derived from `timestamp`

pub mod entry;
pub mod severity;

// Re-export commonly used types
pub use entry::{
    content::{LogContent, format_content},
    key::StorageKey,
    record::{LogRecord, StoredEntry, StoredRecord, pack_content, pack_content_at, parse_entry},
};
pub use severity::Severity;
