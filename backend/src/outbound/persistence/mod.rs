//! Store adapters for the entity repositories.
//!
//! Two families implement the same ports: Redis-backed document stores for
//! deployments and in-memory stores for tests and standalone runs. Both
//! persist whole documents per entity, so a write replaces the previous
//! version without any concurrency check.

pub mod memory;
pub mod redis;

pub use memory::{InMemoryGroupStore, InMemoryRestaurantStore, InMemoryUserStore};
pub use redis::{RedisGroupStore, RedisPool, RedisRestaurantStore, RedisUserStore, connect_pool};
