//! Background command worker.
//!
//! Owns the store handle and executes commands strictly in the order they
//! were queued, so a read observes every write issued before it.

use super::error::LogStoreError;
use crate::config::LogStoreConfig;
use crate::ports::console::ConsoleLogger;
use crate::ports::list_store::{ListStore, StoreError};
use kvlog_domain::{LogContent, Severity, StorageKey};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, trace};

pub(crate) enum Command {
    Write {
        key: StorageKey,
        packed: String,
        reply: oneshot::Sender<Result<(), LogStoreError>>,
    },
    Range {
        key: StorageKey,
        from: isize,
        end: isize,
        reply: oneshot::Sender<Result<Vec<String>, StoreError>>,
    },
    Flush {
        reply: oneshot::Sender<Result<bool, StoreError>>,
    },
    Close {
        reply: oneshot::Sender<Result<bool, StoreError>>,
    },
}

pub(crate) struct Worker {
    pub(crate) store: Arc<dyn ListStore>,
    pub(crate) console: Arc<dyn ConsoleLogger>,
    pub(crate) config: Arc<LogStoreConfig>,
    pub(crate) errors: broadcast::Sender<LogStoreError>,
}

impl Worker {
    /// Run until every sender is dropped and the queue is drained.
    pub(crate) async fn run(self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        debug!(service = %self.config.service_name, "log store worker stopped");
    }

    async fn handle(&self, command: Command) {
        // Send failures only mean the caller stopped waiting.
        match command {
            Command::Write { key, packed, reply } => {
                // A thrown error whose caller dropped the write still gets broadcast.
                if let Err(Err(error)) = reply.send(self.write(&key, &packed).await) {
                    self.broadcast(error);
                }
            }
            Command::Range {
                key,
                from,
                end,
                reply,
            } => {
                trace!(%key, from, end, "range");
                let _ = reply.send(self.store.range(key.as_str(), from, end).await);
            }
            Command::Flush { reply } => {
                let _ = reply.send(self.store.flush_all().await);
            }
            Command::Close { reply } => {
                let _ = reply.send(self.store.close().await);
            }
        }
    }

    async fn write(&self, key: &StorageKey, packed: &str) -> Result<(), LogStoreError> {
        let length = match self.store.push_head(key.as_str(), packed).await {
            Ok(length) => length,
            Err(source) => {
                return self.fail(LogStoreError::Write {
                    key: key.to_string(),
                    source,
                });
            }
        };
        trace!(%key, length, "pushed");

        if let Some(limit) = self.config.limit_amount
            && length > limit
        {
            let stop = isize::try_from(limit).unwrap_or(isize::MAX) - 1;
            if let Err(source) = self.store.trim(key.as_str(), 0, stop).await {
                return self.fail(LogStoreError::Trim {
                    key: key.to_string(),
                    source,
                });
            }
            trace!(%key, limit, "trimmed");
        }

        Ok(())
    }

    /// Apply the throw-or-broadcast policy to a failed write or trim.
    fn fail(&self, error: LogStoreError) -> Result<(), LogStoreError> {
        self.console.write(
            &self.config.service_name,
            Severity::Error,
            &LogContent::Error {
                message: error.to_string(),
            },
        );

        if self.config.throw_errors {
            return Err(error);
        }

        self.broadcast(error);
        Ok(())
    }

    fn broadcast(&self, error: LogStoreError) {
        if self.errors.send(error).is_err() {
            debug!(service = %self.config.service_name, "no error subscribers");
        }
    }
}
