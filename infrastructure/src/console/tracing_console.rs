//! Console logger backed by `tracing`.

use kvlog_application::ConsoleLogger;
use kvlog_domain::{LogContent, Severity};
use tracing::{debug, error, info, trace, warn};

/// Writes each message as a `tracing` event carrying a `logger` field.
///
/// `tracing` has no fatal level: fatal messages are error events flagged
/// with `fatal = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleLogger for TracingConsole {
    fn write(&self, logger: &str, severity: Severity, content: &LogContent) {
        match severity {
            Severity::Fatal => error!(logger = %logger, fatal = true, "{}", content),
            Severity::Error => error!(logger = %logger, "{}", content),
            Severity::Warn => warn!(logger = %logger, "{}", content),
            Severity::Info => info!(logger = %logger, "{}", content),
            Severity::Debug => debug!(logger = %logger, "{}", content),
            Severity::Trace => trace!(logger = %logger, "{}", content),
        }
    }
}
