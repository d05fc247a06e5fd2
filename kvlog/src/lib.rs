//! kvlog: persist structured log messages into capped per-severity lists
//!
//! This crate wires the layers together: a [`LogStore`] over a list store
//! connection, with console output going through `tracing`.
//!
//! ```ignore
//! use kvlog::{LogStoreConfig, Severity};
//!
//! let log = kvlog::connect(LogStoreConfig::new("billing").with_limit_amount(1000)).await?;
//! log.error("card declined");
//! let recent = log.all(Severity::Error, 0, 9).await?;
//! ```

use std::sync::Arc;
use thiserror::Error;

pub use kvlog_application::{
    ConfigValidationError, ConnectOptions, ConsoleLogger, ListStore, LogMessage, LogStore,
    LogStoreConfig, LogStoreError, NoConsole, PendingWrite, StoreError,
};
pub use kvlog_domain::{
    LogContent, LogRecord, Severity, StorageKey, StoredEntry, StoredRecord, format_content,
    pack_content, parse_entry,
};
pub use kvlog_infrastructure::{
    ConfigLoadError, ConfigLoader, InMemoryListStore, TracingConsole, logging,
};
#[cfg(feature = "redis")]
pub use kvlog_infrastructure::RedisListStore;

/// Errors that can occur while opening a log store
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("Failed to connect: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    LogStore(#[from] LogStoreError),
}

/// Open a new connection from `config.connect_options` and build a log store on it.
#[cfg(feature = "redis")]
pub async fn connect(config: LogStoreConfig) -> Result<LogStore, ConnectError> {
    config.validate()?;
    config.connect_options.validate()?;
    let console: Arc<dyn ConsoleLogger> = Arc::new(TracingConsole);
    let store = RedisListStore::connect(
        &config.connect_options,
        config.service_name.clone(),
        Arc::clone(&console),
    )
    .await?;
    Ok(LogStore::new(Arc::new(store), console, config)?)
}

/// Build a log store on an existing connection; `connect_options` is ignored.
pub fn with_store(
    store: Arc<dyn ListStore>,
    config: LogStoreConfig,
) -> Result<LogStore, LogStoreError> {
    LogStore::new(store, Arc::new(TracingConsole), config)
}

/// Build a log store over a fresh [`InMemoryListStore`].
pub fn in_memory(config: LogStoreConfig) -> Result<LogStore, LogStoreError> {
    with_store(Arc::new(InMemoryListStore::new()), config)
}
