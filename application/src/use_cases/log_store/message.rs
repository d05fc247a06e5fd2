//! Values returned to callers of the severity methods.

use super::error::LogStoreError;
use kvlog_domain::{LogContent, Severity};
use tokio::sync::oneshot;

/// Handle to a queued write.
///
/// Dropping it leaves the write running. Awaiting [`wait`](Self::wait)
/// resolves once the push (and trim, if any) has finished: `Err` only when
/// `throw_errors` is set; otherwise failures go to the error channel and this
/// resolves `Ok`. A thrown failure nobody is waiting for is broadcast too.
#[must_use = "a dropped handle turns a thrown write error into a broadcast"]
#[derive(Debug)]
pub struct PendingWrite {
    reply: oneshot::Receiver<Result<(), LogStoreError>>,
}

impl PendingWrite {
    pub(crate) fn new(reply: oneshot::Receiver<Result<(), LogStoreError>>) -> Self {
        Self { reply }
    }

    pub async fn wait(self) -> Result<(), LogStoreError> {
        self.reply
            .await
            .map_err(|_| LogStoreError::WorkerStopped)?
    }
}

/// Result of a severity method: the severity invoked and the content logged.
#[derive(Debug)]
pub struct LogMessage {
    pub kind: Severity,
    pub message: LogContent,
    write: PendingWrite,
}

impl LogMessage {
    pub(crate) fn new(kind: Severity, message: LogContent, write: PendingWrite) -> Self {
        Self {
            kind,
            message,
            write,
        }
    }

    /// Wait for the message's write to finish.
    pub async fn written(self) -> Result<(), LogStoreError> {
        self.write.wait().await
    }

    pub fn into_write(self) -> PendingWrite {
        self.write
    }
}
