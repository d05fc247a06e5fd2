//! List store port
//!
//! Defines the list-oriented key-value store the log store persists into.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`ListStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Connection closed")]
    Closed,

    #[error("Command failed: {0}")]
    Command(String),
}

impl StoreError {
    /// Whether the connection itself is unusable.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_) | StoreError::Closed)
    }
}

/// List-oriented key-value store.
///
/// Indices follow store-native range semantics: both ends are inclusive and
/// negative indices count from the tail (`-1` is the last element).
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Insert `value` at the head of the list, returning the new length.
    async fn push_head(&self, key: &str, value: &str) -> Result<usize, StoreError>;

    /// Keep only the elements in `[start, stop]`.
    async fn trim(&self, key: &str, start: isize, stop: isize) -> Result<(), StoreError>;

    /// Elements in `[start, stop]`, head first.
    async fn range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StoreError>;

    /// Delete every key in the current database.
    async fn flush_all(&self) -> Result<bool, StoreError>;

    /// Gracefully close the connection. Later calls fail with a connection error.
    async fn close(&self) -> Result<bool, StoreError>;
}
