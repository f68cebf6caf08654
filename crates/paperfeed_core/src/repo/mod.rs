//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value persistence contract used by every store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Values are opaque UTF-8 text; services own their JSON encoding.
//! - A `set` replaces the whole value for a key in one write.

pub mod kv_repo;
