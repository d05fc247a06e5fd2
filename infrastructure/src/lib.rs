//! Infrastructure layer for kvlog
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration loading and logging setup.

pub mod config;
pub mod console;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoadError, ConfigLoader};
pub use console::TracingConsole;
pub use store::InMemoryListStore;
#[cfg(feature = "redis")]
pub use store::RedisListStore;
