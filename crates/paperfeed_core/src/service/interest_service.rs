//! Interest store.
//!
//! # Responsibility
//! - Persist the onboarding interest selection.
//! - Serve it to feed loads.
//!
//! # Invariants
//! - Saved tags are unique, first occurrence order kept.
//! - `load` never fails: missing, unreadable or corrupt data reads as empty.

use crate::model::interest::{dedup_tags, InterestTag};
use crate::repo::kv_repo::{
    read_json, write_json, KeyValueStore, StorageResult, USER_INTERESTS_KEY,
};
use log::{info, warn};

/// Persisted interest-tag set.
pub struct InterestService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> InterestService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replaces the stored interests with `tags`, deduplicated.
    pub fn save(&self, tags: &[InterestTag]) -> StorageResult<Vec<InterestTag>> {
        let unique = dedup_tags(tags);
        let encoded: Vec<&str> = unique.iter().map(|tag| tag.as_str()).collect();
        match write_json(&self.store, USER_INTERESTS_KEY, &encoded) {
            Ok(()) => {
                info!(
                    "event=interests_save module=interests status=ok count={}",
                    unique.len()
                );
                Ok(unique)
            }
            Err(err) => {
                warn!(
                    "event=interests_save module=interests status=error error={}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns stored interests; unknown tag strings are skipped.
    pub fn load(&self) -> Vec<InterestTag> {
        let raw = match read_json::<Vec<String>, _>(&self.store, USER_INTERESTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=interests_load module=interests status=fallback error={}",
                    err
                );
                return Vec::new();
            }
        };

        let mut tags = Vec::with_capacity(raw.len());
        for value in &raw {
            match InterestTag::parse(value) {
                Some(tag) => tags.push(tag),
                None => warn!(
                    "event=interests_load module=interests status=skip reason=unknown_tag"
                ),
            }
        }
        dedup_tags(&tags)
    }
}
