//! Application layer for kvlog
//!
//! This crate contains the log store use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConfigValidationError, ConnectOptions, LogStoreConfig};
pub use ports::{
    console::{ConsoleLogger, NoConsole},
    list_store::{ListStore, StoreError},
};
pub use use_cases::log_store::{LogMessage, LogStore, LogStoreError, PendingWrite};
