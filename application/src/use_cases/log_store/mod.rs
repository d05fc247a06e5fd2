//! Log store use case.
//!
//! [`LogStore`] writes each message to the console logger and persists it as
//! a packed JSON record at the head of the `"{service}:{severity}"` list,
//! trimming the list to `limit_amount` entries when configured.
//!
//! Writes are fire-and-forget: the severity methods queue the write and
//! return at once. Every store command runs on one background worker in the
//! order it was issued. Write failures either come back through the write's
//! [`PendingWrite`] (`throw_errors`) or are broadcast on the channel from
//! [`LogStore::subscribe_errors`]. A thrown failure whose handle was dropped
//! is broadcast as well.

mod error;
mod message;
mod worker;

#[cfg(test)]
mod tests;

pub use error::LogStoreError;
pub use message::{LogMessage, PendingWrite};

use crate::config::LogStoreConfig;
use crate::ports::console::ConsoleLogger;
use crate::ports::list_store::ListStore;
use kvlog_domain::{
    LogContent, Severity, StorageKey, StoredEntry, format_content, pack_content, parse_entry,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;
use worker::{Command, Worker};

/// Capacity of the error channel; slow subscribers lose the oldest errors.
const ERROR_CHANNEL_CAPACITY: usize = 256;

/// Persists log messages into capped per-severity lists.
#[derive(Clone)]
pub struct LogStore {
    config: Arc<LogStoreConfig>,
    console: Arc<dyn ConsoleLogger>,
    commands: mpsc::UnboundedSender<Command>,
    errors: broadcast::Sender<LogStoreError>,
}

impl LogStore {
    /// Build a log store over an existing store connection.
    ///
    /// Must be called from within a tokio runtime; the command worker is
    /// spawned onto it.
    pub fn new(
        store: Arc<dyn ListStore>,
        console: Arc<dyn ConsoleLogger>,
        config: LogStoreConfig,
    ) -> Result<Self, LogStoreError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| LogStoreError::NoRuntime)?;

        let config = Arc::new(config);
        let (commands, queue) = mpsc::unbounded_channel();
        let (errors, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);

        let worker = Worker {
            store,
            console: Arc::clone(&console),
            config: Arc::clone(&config),
            errors: errors.clone(),
        };
        runtime.spawn(worker.run(queue));
        debug!(service = %config.service_name, "log store started");

        Ok(Self {
            config,
            console,
            commands,
            errors,
        })
    }

    pub fn config(&self) -> &LogStoreConfig {
        &self.config
    }

    pub fn service_name(&self) -> &str {
        &self.config.service_name
    }

    /// Subscribe to write and trim failures broadcast when `throw_errors` is off.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<LogStoreError> {
        self.errors.subscribe()
    }

    /// Write `content` to the console and queue it for the severity's list.
    pub fn log(&self, severity: Severity, content: &LogContent) -> PendingWrite {
        self.console.write(&self.config.service_name, severity, content);
        self.enqueue_write(
            StorageKey::for_severity(&self.config.service_name, severity),
            content,
        )
    }

    /// Like [`log`](Self::log) for an arbitrary tag.
    ///
    /// The list key uses the tag verbatim; unrecognised tags are written to
    /// the console at info level.
    pub fn log_tag(&self, tag: &str, content: &LogContent) -> PendingWrite {
        self.console.write(
            &self.config.service_name,
            Severity::from_tag_or_info(tag),
            content,
        );
        self.enqueue_write(StorageKey::new(&self.config.service_name, tag), content)
    }

    fn enqueue_write(&self, key: StorageKey, content: &LogContent) -> PendingWrite {
        let packed = pack_content(&format_content(content));
        let (reply, pending) = oneshot::channel();
        if self
            .commands
            .send(Command::Write { key, packed, reply })
            .is_err()
        {
            debug!(service = %self.config.service_name, "write dropped: worker stopped");
        }
        PendingWrite::new(pending)
    }

    fn emit(&self, severity: Severity, content: impl Into<LogContent>) -> LogMessage {
        let content = content.into();
        let write = self.log(severity, &content);
        LogMessage::new(severity, content, write)
    }

    // ==================== Severity Methods ====================

    pub fn fatal(&self, content: impl Into<LogContent>) -> LogMessage {
        self.emit(Severity::Fatal, content)
    }

    pub fn error(&self, content: impl Into<LogContent>) -> LogMessage {
        self.emit(Severity::Error, content)
    }

    pub fn warn(&self, content: impl Into<LogContent>) -> LogMessage {
        self.emit(Severity::Warn, content)
    }

    pub fn info(&self, content: impl Into<LogContent>) -> LogMessage {
        self.emit(Severity::Info, content)
    }

    pub fn debug(&self, content: impl Into<LogContent>) -> LogMessage {
        self.emit(Severity::Debug, content)
    }

    pub fn trace(&self, content: impl Into<LogContent>) -> LogMessage {
        self.emit(Severity::Trace, content)
    }

    // ==================== Reads and Maintenance ====================

    /// Every entry of a severity's list, head (newest) first.
    pub async fn all_default(
        &self,
        severity: Severity,
    ) -> Result<Vec<StoredEntry>, LogStoreError> {
        self.all(severity, 0, -1).await
    }

    /// Entries `[from, end]` of a severity's list, head (newest) first.
    ///
    /// Negative indices count from the tail. Entries that are not JSON
    /// objects are returned as [`StoredEntry::Raw`].
    pub async fn all(
        &self,
        severity: Severity,
        from: isize,
        end: isize,
    ) -> Result<Vec<StoredEntry>, LogStoreError> {
        self.all_tag(severity.as_str(), from, end).await
    }

    /// Like [`all`](Self::all) for an arbitrary tag.
    pub async fn all_tag(
        &self,
        tag: &str,
        from: isize,
        end: isize,
    ) -> Result<Vec<StoredEntry>, LogStoreError> {
        let key = StorageKey::new(&self.config.service_name, tag);
        let (reply, response) = oneshot::channel();
        self.send(Command::Range {
            key: key.clone(),
            from,
            end,
            reply,
        })?;

        match response.await.map_err(|_| LogStoreError::WorkerStopped)? {
            Ok(items) => Ok(items.iter().map(String::as_str).map(parse_entry).collect()),
            Err(source) => {
                let error = LogStoreError::Read {
                    key: key.to_string(),
                    source,
                };
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Delete every key in the current database, not only this service's.
    pub async fn flush(&self) -> Result<bool, LogStoreError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Flush { reply })?;
        response
            .await
            .map_err(|_| LogStoreError::WorkerStopped)?
            .map_err(LogStoreError::Flush)
    }

    /// Gracefully close the store connection.
    pub async fn close(&self) -> Result<bool, LogStoreError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Close { reply })?;
        response
            .await
            .map_err(|_| LogStoreError::WorkerStopped)?
            .map_err(LogStoreError::Close)
    }

    fn send(&self, command: Command) -> Result<(), LogStoreError> {
        self.commands
            .send(command)
            .map_err(|_| LogStoreError::WorkerStopped)
    }

    fn report(&self, error: &LogStoreError) {
        self.console.write(
            &self.config.service_name,
            Severity::Error,
            &LogContent::Error {
                message: error.to_string(),
            },
        );
    }
}
