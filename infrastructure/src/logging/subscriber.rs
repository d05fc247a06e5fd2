//! Global `tracing` subscriber setup.
//!
//! Both initialisers respect `RUST_LOG` when set and fall back to the given
//! default filter. They return `false` if a global subscriber already exists.

use std::io;
use tracing_subscriber::{EnvFilter, fmt};

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Human-readable compact output on stdout.
pub fn init(default_filter: &str) -> bool {
    fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init()
        .is_ok()
}

/// One JSON object per event on stdout.
pub fn init_json(default_filter: &str) -> bool {
    fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        init("info");
        assert!(!init_json("debug"));
    }
}
