//! Configuration loading for kvlog
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `KVLOG_*` environment variables
//! 2. `ConfigLoader::load(Some(path))` explicit file
//! 3. Project root: `./kvlog.toml` or `./.kvlog.toml`
//! 4. Default values

mod loader;

pub use loader::{ConfigLoadError, ConfigLoader, ENV_PREFIX};
