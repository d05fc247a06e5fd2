//! Log entries: what is written to a list and what comes back out.
//!
//! - [`content::LogContent`]: the value a caller logs
//! - [`record::LogRecord`]: the packed `{content, timestamp}` JSON record
//! - [`record::StoredEntry`]: a parsed record or the raw stored text
//! - [`key::StorageKey`]: the `"{service}:{severity}"` list key

pub mod content;
pub mod key;
pub mod record;
