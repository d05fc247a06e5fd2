//! Console logger adapters.

mod tracing_console;

pub use tracing_console::TracingConsole;
