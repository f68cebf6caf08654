//! Core domain logic for PaperFeed.
//! This crate is the single source of truth for feed and bookmark invariants.

pub mod catalog;
pub mod config;
pub mod db;
pub mod feed;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::{CatalogError, PaperCatalog};
pub use config::{FeedConfig, FeedConfigError, PaginationMode, DEFAULT_PAGE_SIZE};
pub use feed::selector::{
    entropy_rng, filter_papers, seeded_rng, select_all_topics, select_cursor_page,
    select_shuffled_page, FeedRng,
};
pub use feed::state::{FeedIntent, FeedState, TopicFeed};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::interest::InterestTag;
pub use model::paper::{Paper, PaperId, PaperValidationError};
pub use model::topic::{CategoryFilter, Topic};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use service::bookmark_service::{saved_papers_label, BookmarkService};
pub use service::feed_service::FeedService;
pub use service::interest_service::InterestService;
pub use service::launch_service::LaunchService;
pub use service::onboarding_service::{OnboardingError, OnboardingSelection, OnboardingService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
