//! Console logging port.
//!
//! Every message handed to the log store is also written to a console
//! logger, addressed by the service name.

use kvlog_domain::{LogContent, Severity};

/// Leveled console output addressable by logger name.
pub trait ConsoleLogger: Send + Sync {
    fn write(&self, logger: &str, severity: Severity, content: &LogContent);
}

/// No-op implementation for tests and when console output is disabled.
pub struct NoConsole;

impl ConsoleLogger for NoConsole {
    fn write(&self, _logger: &str, _severity: Severity, _content: &LogContent) {}
}
