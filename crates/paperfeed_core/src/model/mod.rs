//! Domain model for the paper feed.
//!
//! # Responsibility
//! - Define the catalog record (`Paper`) shared by feed, detail and bookmarks.
//! - Define the fixed interest vocabulary and the visible topic tabs.
//!
//! # Invariants
//! - Every paper is identified by a stable, non-empty `PaperId`.
//! - Interest tags and topics are closed enums; string forms are stable
//!   because they are persisted.

pub mod interest;
pub mod paper;
pub mod topic;
