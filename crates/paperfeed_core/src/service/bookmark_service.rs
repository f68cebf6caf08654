//! Bookmark store.
//!
//! # Responsibility
//! - Keep the user's saved papers as one ordered JSON array.
//! - Provide idempotent add, remove, toggle and clear.
//!
//! # Invariants
//! - No two stored entries share a paper id.
//! - Entries stay in insertion order; removals keep relative order.
//! - Every mutation writes the whole array in one `set` call, so a failed
//!   write leaves the previous array intact.
//! - Mutations and `list` propagate storage errors; `is_bookmarked` fails
//!   soft and reports `false`.

use crate::model::paper::Paper;
use crate::repo::kv_repo::{
    read_json, write_json, KeyValueStore, StorageResult, BOOKMARKED_PAPERS_KEY,
};
use log::{info, warn};

/// Persisted bookmark list.
pub struct BookmarkService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> BookmarkService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns bookmarked papers, oldest first.
    pub fn list(&self) -> StorageResult<Vec<Paper>> {
        Ok(read_json(&self.store, BOOKMARKED_PAPERS_KEY)?.unwrap_or_default())
    }

    pub fn count(&self) -> StorageResult<usize> {
        self.list().map(|papers| papers.len())
    }

    /// Returns whether `paper_id` is saved.
    ///
    /// Storage failures are logged and reported as `false`.
    pub fn is_bookmarked(&self, paper_id: &str) -> bool {
        match self.list() {
            Ok(papers) => papers.iter().any(|paper| paper.id == paper_id),
            Err(err) => {
                warn!(
                    "event=bookmark_check module=bookmark status=fallback paper_id={} error={}",
                    paper_id, err
                );
                false
            }
        }
    }

    /// Saves a copy of `paper`.
    ///
    /// Returns `false` without writing when the id is already saved; the
    /// existing entry keeps its position.
    pub fn add(&self, paper: &Paper) -> StorageResult<bool> {
        let mut papers = self.list()?;
        if papers.iter().any(|saved| saved.id == paper.id) {
            return Ok(false);
        }
        papers.push(paper.clone());
        self.persist("bookmark_add", &papers, &paper.id)?;
        Ok(true)
    }

    /// Deletes the entry for `paper_id`.
    ///
    /// Returns `false` without writing when nothing was saved under the id.
    pub fn remove(&self, paper_id: &str) -> StorageResult<bool> {
        let mut papers = self.list()?;
        let before = papers.len();
        papers.retain(|saved| saved.id != paper_id);
        if papers.len() == before {
            return Ok(false);
        }
        self.persist("bookmark_remove", &papers, paper_id)?;
        Ok(true)
    }

    /// Adds `paper` when absent, removes it when present.
    ///
    /// Returns the bookmark state after the write succeeded.
    pub fn toggle(&self, paper: &Paper) -> StorageResult<bool> {
        if self.list()?.iter().any(|saved| saved.id == paper.id) {
            self.remove(&paper.id)?;
            Ok(false)
        } else {
            self.add(paper)?;
            Ok(true)
        }
    }

    /// Removes every bookmark with a single write.
    pub fn clear(&self) -> StorageResult<()> {
        self.persist("bookmark_clear", &[], "all")
    }

    fn persist(&self, event: &str, papers: &[Paper], paper_id: &str) -> StorageResult<()> {
        match write_json(&self.store, BOOKMARKED_PAPERS_KEY, papers) {
            Ok(()) => {
                info!(
                    "event={} module=bookmark status=ok paper_id={} count={}",
                    event,
                    paper_id,
                    papers.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event={} module=bookmark status=error paper_id={} timeout={} error={}",
                    event,
                    paper_id,
                    err.is_timeout(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Header text for the bookmark list, e.g. `1 saved paper`, `3 saved papers`.
pub fn saved_papers_label(count: usize) -> String {
    if count == 1 {
        "1 saved paper".to_string()
    } else {
        format!("{count} saved papers")
    }
}
