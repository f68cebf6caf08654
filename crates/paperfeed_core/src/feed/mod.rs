//! Feed selection and feed view state.
//!
//! # Responsibility
//! - Map (catalog, interests, topic, cursor) to pages of papers.
//! - Hold the serializable feed view state and its intent reducer.
//!
//! # Invariants
//! - Selection is pure apart from the injected random source.
//! - No page ever contains the same paper id twice.

pub mod selector;
pub mod state;
