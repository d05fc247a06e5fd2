//! List store adapters.
//!
//! - [`InMemoryListStore`]: process-local lists with store-native semantics
//! - [`RedisListStore`]: a Redis connection (feature `redis`)

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

pub use memory::InMemoryListStore;
#[cfg(feature = "redis")]
pub use redis_store::{RedisListStore, connection_info};
