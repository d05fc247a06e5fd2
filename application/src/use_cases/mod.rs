//! Use cases (application services)

pub mod log_store;
