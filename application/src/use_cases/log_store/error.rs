//! Error types for the log store

use crate::config::ConfigValidationError;
use crate::ports::list_store::StoreError;
use thiserror::Error;

/// Errors raised by [`LogStore`](super::LogStore) operations.
///
/// Also the item type of the error channel returned by
/// [`LogStore::subscribe_errors`](super::LogStore::subscribe_errors).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogStoreError {
    #[error("Write to {key} failed: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Trim of {key} failed: {source}")]
    Trim {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Read of {key} failed: {source}")]
    Read {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Flush failed: {0}")]
    Flush(#[source] StoreError),

    #[error("Close failed: {0}")]
    Close(#[source] StoreError),

    #[error("No tokio runtime available to run the store worker")]
    NoRuntime,

    #[error("Store worker stopped")]
    WorkerStopped,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),
}

impl LogStoreError {
    /// The underlying store failure, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            LogStoreError::Write { source, .. }
            | LogStoreError::Trim { source, .. }
            | LogStoreError::Read { source, .. }
            | LogStoreError::Flush(source)
            | LogStoreError::Close(source) => Some(source),
            _ => None,
        }
    }

    /// Whether the failure came from an unusable connection.
    pub fn is_connection(&self) -> bool {
        self.store_error().is_some_and(StoreError::is_connection)
    }
}
