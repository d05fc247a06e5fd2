//! Logging infrastructure: `tracing` subscriber initialisation.

mod subscriber;

pub use subscriber::{init, init_json};
