//! Persisted data models
//!
//! Each model owns one JSON document under the data root. Mutations go
//! through a per-document async mutex so concurrent requests cannot
//! drop each other's writes.

pub mod idea;
pub mod message;
pub mod store;
pub mod tags;
