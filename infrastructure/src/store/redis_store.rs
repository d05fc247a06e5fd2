//! Redis-backed list store.
//!
//! Wraps one multiplexed connection. Connection lifecycle events are
//! forwarded to the console logger under the configured logger name.

use async_trait::async_trait;
use kvlog_application::{ConnectOptions, ConsoleLogger, ListStore, StoreError};
use kvlog_domain::{LogContent, Severity};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ConnectionInfo, IntoConnectionInfo, RedisError};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// [`ListStore`] over a Redis connection.
pub struct RedisListStore {
    connection: Mutex<Option<MultiplexedConnection>>,
    logger: String,
    console: Arc<dyn ConsoleLogger>,
}

impl RedisListStore {
    /// Open a new connection described by `options`.
    ///
    /// Reports `logger connected` or the connection error on the console.
    pub async fn connect(
        options: &ConnectOptions,
        logger: impl Into<String>,
        console: Arc<dyn ConsoleLogger>,
    ) -> Result<Self, StoreError> {
        let logger = logger.into();
        let info = connection_info(options)?;
        debug!(host = %options.host, port = options.port, tls = options.uses_tls(), "connecting");

        let connection = match redis::Client::open(info) {
            Ok(client) => client.get_multiplexed_async_connection().await,
            Err(e) => Err(e),
        };

        match connection {
            Ok(connection) => {
                console.write(&logger, Severity::Info, &"logger connected".into());
                Ok(Self::from_connection(connection, logger, console))
            }
            Err(e) => {
                report_connection_error(console.as_ref(), &logger, &e);
                Err(StoreError::Connection(e.to_string()))
            }
        }
    }

    /// Reuse an already established connection.
    pub fn from_connection(
        connection: MultiplexedConnection,
        logger: impl Into<String>,
        console: Arc<dyn ConsoleLogger>,
    ) -> Self {
        Self {
            connection: Mutex::new(Some(connection)),
            logger: logger.into(),
            console,
        }
    }

    fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Connection("connection lock poisoned".to_string()))?
            .clone()
            .ok_or(StoreError::Closed)
    }

    fn take_connection(&self) -> Result<MultiplexedConnection, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Connection("connection lock poisoned".to_string()))?
            .take()
            .ok_or(StoreError::Closed)
    }

    /// Classify a command failure, reporting connection-level ones.
    fn map_error(&self, error: RedisError) -> StoreError {
        if is_connection_error(&error) {
            report_connection_error(self.console.as_ref(), &self.logger, &error);
            return StoreError::Connection(error.to_string());
        }
        StoreError::Command(error.to_string())
    }
}

fn is_connection_error(error: &RedisError) -> bool {
    error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal()
}

fn report_connection_error(console: &dyn ConsoleLogger, logger: &str, error: &RedisError) {
    console.write(
        logger,
        Severity::Error,
        &LogContent::Error {
            message: format!("Database Error: {}", error),
        },
    );
}

/// Build connection parameters; TLS is enabled when a server name is set.
pub fn connection_info(options: &ConnectOptions) -> Result<ConnectionInfo, StoreError> {
    if let Some(servername) = &options.servername
        && servername != &options.host
    {
        // The TLS server name is always the connection host.
        warn!(
            %servername,
            host = %options.host,
            "servername differs from host; verifying against host"
        );
    }

    let scheme = if options.uses_tls() { "rediss" } else { "redis" };
    let url = format!("{}://{}:{}/{}", scheme, options.host, options.port, options.db);
    let mut info = url
        .as_str()
        .into_connection_info()
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    info.redis.password = options.password.clone();
    Ok(info)
}

#[async_trait]
impl ListStore for RedisListStore {
    async fn push_head(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        let mut connection = self.connection()?;
        connection
            .lpush::<_, _, usize>(key, value)
            .await
            .map_err(|e| self.map_error(e))
    }

    async fn trim(&self, key: &str, start: isize, stop: isize) -> Result<(), StoreError> {
        let mut connection = self.connection()?;
        connection
            .ltrim::<_, ()>(key, start, stop)
            .await
            .map_err(|e| self.map_error(e))
    }

    async fn range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StoreError> {
        let mut connection = self.connection()?;
        connection
            .lrange::<_, Vec<String>>(key, start, stop)
            .await
            .map_err(|e| self.map_error(e))
    }

    async fn flush_all(&self) -> Result<bool, StoreError> {
        let mut connection = self.connection()?;
        let reply: String = redis::cmd("FLUSHDB")
            .query_async::<_, String>(&mut connection)
            .await
            .map_err(|e| self.map_error(e))?;
        Ok(reply == "OK")
    }

    async fn close(&self) -> Result<bool, StoreError> {
        let mut connection = self.take_connection()?;
        let reply = redis::cmd("QUIT")
            .query_async::<_, String>(&mut connection)
            .await;
        match reply {
            Ok(reply) => Ok(reply == "OK"),
            // The server may drop the socket before the reply is read.
            Err(e) if is_connection_error(&e) => Ok(true),
            Err(e) => Err(StoreError::Command(e.to_string())),
        }
    }
}
