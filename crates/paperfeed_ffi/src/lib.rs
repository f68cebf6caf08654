//! Flutter-facing bridge over `paperfeed_core`.

pub mod api;
