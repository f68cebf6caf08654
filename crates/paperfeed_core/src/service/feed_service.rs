//! Feed use-case service.
//!
//! # Responsibility
//! - Wire catalog, persisted interests, bookmarks and the random source into
//!   the feed state reducer.
//! - Serve single pages for callers that do not keep a `FeedState`.
//!
//! # Invariants
//! - Interest reads fail soft: the feed falls back to the unfiltered catalog.
//! - Bookmark state in `FeedState` only changes after a successful write.

use crate::catalog::PaperCatalog;
use crate::config::{FeedConfig, FeedConfigError, PaginationMode};
use crate::feed::selector::{entropy_rng, select_cursor_page, select_shuffled_page, FeedRng};
use crate::feed::state::{FeedIntent, FeedState};
use crate::model::paper::Paper;
use crate::model::topic::Topic;
use crate::repo::kv_repo::{KeyValueStore, StorageResult};
use crate::service::bookmark_service::BookmarkService;
use crate::service::interest_service::InterestService;
use log::{info, warn};
use rand::Rng;

/// Feed facade over one catalog and one key-value store.
pub struct FeedService<'c, S: KeyValueStore, R: Rng = FeedRng> {
    catalog: &'c PaperCatalog,
    store: S,
    config: FeedConfig,
    rng: R,
}

impl<'c, S: KeyValueStore> FeedService<'c, S> {
    /// Creates a service with an entropy-seeded random source.
    pub fn new(
        catalog: &'c PaperCatalog,
        store: S,
        config: FeedConfig,
    ) -> Result<Self, FeedConfigError> {
        Self::with_rng(catalog, store, config, entropy_rng())
    }
}

impl<'c, S: KeyValueStore, R: Rng> FeedService<'c, S, R> {
    /// Creates a service with a caller-provided random source.
    pub fn with_rng(
        catalog: &'c PaperCatalog,
        store: S,
        config: FeedConfig,
        rng: R,
    ) -> Result<Self, FeedConfigError> {
        Ok(Self {
            catalog,
            store,
            config: config.validate()?,
            rng,
        })
    }

    pub fn config(&self) -> FeedConfig {
        self.config
    }

    /// Fresh state for this service's configuration.
    pub fn new_state(&self) -> FeedState {
        FeedState::new(self.config)
    }

    /// Applies one intent to `state`.
    pub fn dispatch(&mut self, state: &mut FeedState, intent: FeedIntent) {
        state.apply(intent, self.catalog, &mut self.rng);
    }

    /// Full load: reads interests and bookmarks, then rebuilds every tab.
    pub fn load(&mut self, state: &mut FeedState) {
        self.dispatch(state, FeedIntent::LoadStarted);
        let interests = InterestService::new(&self.store).load();
        self.dispatch(state, FeedIntent::Load { interests });
        self.sync_bookmarks(state);
        info!(
            "event=feed_load module=feed status=ok interests={} topic={} papers={}",
            state.interests.len(),
            state.current_topic,
            state.current_papers().len()
        );
    }

    /// Re-reads confirmed bookmark ids; a failed read leaves them unchanged.
    pub fn sync_bookmarks(&mut self, state: &mut FeedState) {
        match BookmarkService::new(&self.store).list() {
            Ok(papers) => {
                let ids = papers.into_iter().map(|paper| paper.id).collect();
                self.dispatch(state, FeedIntent::BookmarksSynced(ids));
            }
            Err(err) => warn!(
                "event=feed_bookmark_sync module=feed status=fallback error={}",
                err
            ),
        }
    }

    /// Persists a bookmark toggle for `paper`, then records it in `state`.
    ///
    /// # Errors
    /// Storage failures propagate and `state` is left untouched.
    pub fn toggle_bookmark(&mut self, state: &mut FeedState, paper: &Paper) -> StorageResult<bool> {
        let bookmarked = BookmarkService::new(&self.store).toggle(paper)?;
        self.dispatch(
            state,
            FeedIntent::BookmarkToggled {
                paper_id: paper.id.clone(),
                bookmarked,
            },
        );
        Ok(bookmarked)
    }

    /// One stateless page for `topic` using the configured pagination mode.
    ///
    /// Shuffled mode reshuffles on every call.
    pub fn page(&mut self, topic: Topic, page: usize) -> Vec<Paper> {
        let interests = InterestService::new(&self.store).load();
        match self.config.pagination {
            PaginationMode::ShuffledFirstPage => select_shuffled_page(
                self.catalog.papers(),
                topic,
                &interests,
                page,
                self.config.page_size,
                &mut self.rng,
            ),
            PaginationMode::Cursor => select_cursor_page(
                self.catalog.papers(),
                topic,
                &interests,
                page,
                self.config.page_size,
            ),
        }
    }
}
