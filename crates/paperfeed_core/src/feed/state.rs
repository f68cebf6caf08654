//! Serializable feed view state and its intent reducer.
//!
//! # Responsibility
//! - Own every piece of feed-screen state (current tab, loaded pages,
//!   loading flag, confirmed bookmark ids).
//! - Apply mutations only through named `FeedIntent`s.
//!
//! # Invariants
//! - `topics` holds an entry for every tab after the first `Load`.
//! - `bookmarked` only changes through confirmed bookmark intents; the
//!   view must dispatch `BookmarkToggled` after persistence succeeded.
//! - In shuffled mode every topic feed is `exhausted` right after loading.

use crate::catalog::PaperCatalog;
use crate::config::{FeedConfig, PaginationMode};
use crate::feed::selector::{select_all_topics, select_cursor_page};
use crate::model::interest::InterestTag;
use crate::model::paper::{Paper, PaperId};
use crate::model::topic::Topic;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Loaded papers for one tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicFeed {
    pub papers: Vec<Paper>,
    /// Cursor for the next `LoadMore`.
    pub next_page: usize,
    /// No further pages will be appended.
    pub exhausted: bool,
}

/// Named view-state mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedIntent {
    /// A load is in flight (interests are being read).
    LoadStarted,
    /// Recompute every tab from the given interests.
    Load { interests: Vec<InterestTag> },
    /// Recompute every tab from the interests of the last load.
    Refresh,
    /// Append the next page of the current tab (cursor mode only).
    LoadMore,
    TopicChanged(Topic),
    /// A bookmark write for `paper_id` completed with the given state.
    BookmarkToggled { paper_id: PaperId, bookmarked: bool },
    /// Replace confirmed bookmark ids with a fresh store read.
    BookmarksSynced(Vec<PaperId>),
}

/// Complete feed-screen state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedState {
    pub config: FeedConfig,
    pub current_topic: Topic,
    pub topics: BTreeMap<Topic, TopicFeed>,
    pub loading: bool,
    pub interests: Vec<InterestTag>,
    pub bookmarked: BTreeSet<PaperId>,
}

impl FeedState {
    /// Creates an empty, loading state for `config`.
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            current_topic: config.initial_topic,
            topics: BTreeMap::new(),
            loading: true,
            interests: Vec::new(),
            bookmarked: BTreeSet::new(),
        }
    }

    /// Applies one intent.
    ///
    /// `rng` is only consumed by loads in shuffled mode.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        intent: FeedIntent,
        catalog: &PaperCatalog,
        rng: &mut R,
    ) {
        match intent {
            FeedIntent::LoadStarted => self.loading = true,
            FeedIntent::Load { interests } => {
                self.interests = interests;
                self.reload(catalog, rng);
            }
            FeedIntent::Refresh => self.reload(catalog, rng),
            FeedIntent::LoadMore => self.load_more(catalog),
            FeedIntent::TopicChanged(topic) => self.current_topic = topic,
            FeedIntent::BookmarkToggled {
                paper_id,
                bookmarked,
            } => {
                if bookmarked {
                    self.bookmarked.insert(paper_id);
                } else {
                    self.bookmarked.remove(&paper_id);
                }
            }
            FeedIntent::BookmarksSynced(ids) => {
                self.bookmarked = ids.into_iter().collect();
            }
        }
    }

    /// Papers of the visible tab.
    pub fn current_papers(&self) -> &[Paper] {
        self.papers_for(self.current_topic)
    }

    pub fn papers_for(&self, topic: Topic) -> &[Paper] {
        self.topics
            .get(&topic)
            .map_or(&[][..], |feed| feed.papers.as_slice())
    }

    pub fn is_bookmarked(&self, paper_id: &str) -> bool {
        self.bookmarked.contains(paper_id)
    }

    /// Whether the visible tab can still grow.
    pub fn can_load_more(&self) -> bool {
        self.config.pagination == PaginationMode::Cursor
            && self
                .topics
                .get(&self.current_topic)
                .is_some_and(|feed| !feed.exhausted)
    }

    fn reload<R: Rng + ?Sized>(&mut self, catalog: &PaperCatalog, rng: &mut R) {
        let page_size = self.config.page_size;
        self.topics = match self.config.pagination {
            PaginationMode::ShuffledFirstPage => {
                select_all_topics(catalog.papers(), &self.interests, page_size, &mut *rng)
                    .into_iter()
                    .map(|(topic, papers)| {
                        let feed = TopicFeed {
                            papers,
                            next_page: 1,
                            exhausted: true,
                        };
                        (topic, feed)
                    })
                    .collect()
            }
            PaginationMode::Cursor => Topic::TABS
                .into_iter()
                .map(|topic| {
                    let papers =
                        select_cursor_page(catalog.papers(), topic, &self.interests, 0, page_size);
                    let exhausted = papers.len() < page_size;
                    let feed = TopicFeed {
                        papers,
                        next_page: 1,
                        exhausted,
                    };
                    (topic, feed)
                })
                .collect(),
        };
        self.loading = false;
        debug!(
            "event=feed_reload module=feed status=ok interests={} ml={} robotics={} for_you={}",
            self.interests.len(),
            self.papers_for(Topic::Ml).len(),
            self.papers_for(Topic::Robotics).len(),
            self.papers_for(Topic::ForYou).len()
        );
    }

    fn load_more(&mut self, catalog: &PaperCatalog) {
        if self.config.pagination != PaginationMode::Cursor {
            return;
        }
        let page_size = self.config.page_size;
        let topic = self.current_topic;
        let Some(feed) = self.topics.get_mut(&topic) else {
            return;
        };
        if feed.exhausted {
            return;
        }
        let page = select_cursor_page(
            catalog.papers(),
            topic,
            &self.interests,
            feed.next_page,
            page_size,
        );
        feed.exhausted = page.len() < page_size;
        feed.next_page += 1;
        feed.papers.extend(page);
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedIntent, FeedState};
    use crate::catalog::PaperCatalog;
    use crate::config::FeedConfig;
    use crate::feed::selector::seeded_rng;
    use crate::model::paper::Paper;
    use crate::model::topic::Topic;

    fn catalog() -> PaperCatalog {
        PaperCatalog::from_papers(vec![
            Paper::new("a", "A", "Robotics"),
            Paper::new("b", "B", "Machine Learning"),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn new_state_starts_loading_on_initial_topic() {
        let state = FeedState::default();
        assert!(state.loading);
        assert_eq!(state.current_topic, Topic::ForYou);
        assert!(state.current_papers().is_empty());
    }

    #[test]
    fn topic_change_switches_visible_papers() {
        let catalog = catalog();
        let mut rng = seeded_rng(1);
        let mut state = FeedState::default();
        state.apply(FeedIntent::Load { interests: vec![] }, &catalog, &mut rng);
        assert_eq!(state.current_papers().len(), 2);

        state.apply(FeedIntent::TopicChanged(Topic::Robotics), &catalog, &mut rng);
        let ids: Vec<&str> = state.current_papers().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn state_survives_json_roundtrip() {
        let catalog = catalog();
        let mut state = FeedState::new(FeedConfig::cursor(1).expect("valid config"));
        state.apply(FeedIntent::Load { interests: vec![] }, &catalog, &mut seeded_rng(3));
        let json = serde_json::to_string(&state).expect("state serializes");
        let restored: FeedState = serde_json::from_str(&json).expect("state deserializes");
        assert_eq!(restored, state);
    }
}
