//! Application-level configuration.
//!
//! - [`LogStoreConfig`]: service name, list cap and error policy
//! - [`ConnectOptions`]: how a new store connection is opened

pub mod log_store_config;

pub use log_store_config::{
    ConfigValidationError, ConnectOptions, DEFAULT_SERVICE_NAME, LogStoreConfig,
};
