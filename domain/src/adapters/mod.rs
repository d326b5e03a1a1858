//! Adapters that live inside the domain crate for convenience.
//!
//! The in-memory repository backs unit tests and the `memory` storage
//! provider. Adapters that need IO (SQLite) live in separate crates.

pub mod memory_repo;
