//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads/writes into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Read paths used for personalization fail soft.
//! - Bookmark writes fail loud.

pub mod bookmark_service;
pub mod feed_service;
pub mod interest_service;
pub mod launch_service;
pub mod onboarding_service;
