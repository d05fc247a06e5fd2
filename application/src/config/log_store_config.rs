//! Log store configuration.
//!
//! [`LogStoreConfig`] is fixed once a [`LogStore`](crate::LogStore) is built.
//! [`ConnectOptions`] describes the connection opened when no existing store
//! connection is supplied.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Service name used when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "default";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("service_name cannot be empty")]
    EmptyServiceName,

    #[error("limit_amount must be at least 1")]
    ZeroLimit,

    #[error("connect_options.port cannot be 0")]
    InvalidPort,
}

/// Settings for a [`LogStore`](crate::LogStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStoreConfig {
    /// Service the messages belong to; first half of every storage key.
    pub service_name: String,
    /// Maximum entries kept per list. Unlimited when `None`.
    pub limit_amount: Option<usize>,
    /// Return write failures to the caller instead of broadcasting them.
    pub throw_errors: bool,
    /// Connection used when no existing store is supplied.
    pub connect_options: ConnectOptions,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            limit_amount: None,
            throw_errors: false,
            connect_options: ConnectOptions::default(),
        }
    }
}

impl LogStoreConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_limit_amount(mut self, limit: usize) -> Self {
        self.limit_amount = Some(limit);
        self
    }

    pub fn with_throw_errors(mut self, throw_errors: bool) -> Self {
        self.throw_errors = throw_errors;
        self
    }

    pub fn with_connect_options(mut self, options: ConnectOptions) -> Self {
        self.connect_options = options;
        self
    }

    /// Check the configuration before a store is built from it.
    ///
    /// `connect_options` is checked separately, only when a new connection
    /// is opened from it.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyServiceName);
        }
        if self.limit_amount == Some(0) {
            return Err(ConfigValidationError::ZeroLimit);
        }
        Ok(())
    }
}

/// Where and how to open a new store connection.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// TLS server name. TLS is used whenever this is set.
    pub servername: Option<String>,
    /// Logical database index.
    pub db: i64,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            servername: None,
            db: 0,
        }
    }
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_servername(mut self, servername: impl Into<String>) -> Self {
        self.servername = Some(servername.into());
        self
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    pub fn uses_tls(&self) -> bool {
        self.servername.is_some()
    }

    /// Check the options before a connection is opened with them.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("servername", &self.servername)
            .field("db", &self.db)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogStoreConfig::default();
        assert_eq!(config.service_name, "default");
        assert_eq!(config.limit_amount, None);
        assert!(!config.throw_errors);
        assert_eq!(config.connect_options.host, "127.0.0.1");
        assert_eq!(config.connect_options.port, 6379);
        assert!(!config.connect_options.uses_tls());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = LogStoreConfig::new("billing")
            .with_limit_amount(100)
            .with_throw_errors(true)
            .with_connect_options(
                ConnectOptions::new("cache.internal", 6380).with_servername("cache.internal"),
            );
        assert_eq!(config.service_name, "billing");
        assert_eq!(config.limit_amount, Some(100));
        assert!(config.throw_errors);
        assert!(config.connect_options.uses_tls());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            LogStoreConfig::new("  ").validate(),
            Err(ConfigValidationError::EmptyServiceName)
        );
        assert_eq!(
            LogStoreConfig::new("svc").with_limit_amount(0).validate(),
            Err(ConfigValidationError::ZeroLimit)
        );
        assert_eq!(
            ConnectOptions::new("localhost", 0).validate(),
            Err(ConfigValidationError::InvalidPort)
        );
    }

    #[test]
    fn test_colon_and_unused_port_are_accepted() {
        assert!(LogStoreConfig::new("app:prod").validate().is_ok());
        let config = LogStoreConfig::new("svc")
            .with_connect_options(ConnectOptions::new("localhost", 0));
        assert!(config.validate().is_ok());
        assert!(ConnectOptions::default().validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let options = ConnectOptions::default().with_password("hunter2");
        let rendered = format!("{:?}", options);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LogStoreConfig =
            serde_json::from_str(r#"{"service_name":"api","limit_amount":5}"#).unwrap();
        assert_eq!(config.service_name, "api");
        assert_eq!(config.limit_amount, Some(5));
        assert_eq!(config.connect_options, ConnectOptions::default());
    }
}
