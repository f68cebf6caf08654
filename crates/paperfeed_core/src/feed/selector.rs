//! Interest-filtered, paginated paper selection.
//!
//! # Responsibility
//! - Resolve a topic into a category filter and apply it to the catalog.
//! - Produce shuffled first pages and cursor pages.
//!
//! # Invariants
//! - Empty catalog or zero matches yields an empty page, never an error.
//! - Cursor pages are disjoint consecutive slices of the filtered list.
//! - Shuffled pages are recomputed on every call; nothing is memoized.

use crate::model::interest::InterestTag;
use crate::model::paper::Paper;
use crate::model::topic::Topic;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random source used by the shuffled feed.
pub type FeedRng = StdRng;

/// Deterministic random source for reproducible feeds.
pub fn seeded_rng(seed: u64) -> FeedRng {
    StdRng::seed_from_u64(seed)
}

/// Entropy-seeded random source for production feeds.
pub fn entropy_rng() -> FeedRng {
    StdRng::from_os_rng()
}

/// Returns catalog papers admitted by `topic`, in catalog order.
pub fn filter_papers<'c>(
    papers: &'c [Paper],
    topic: Topic,
    interests: &[InterestTag],
) -> Vec<&'c Paper> {
    let filter = topic.category_filter(interests);
    papers
        .iter()
        .filter(|paper| filter.admits(paper.category.as_str()))
        .collect()
}

/// Returns page `page` of the filtered list without reshuffling.
///
/// Pages past the end are empty; there is no wraparound.
pub fn select_cursor_page(
    papers: &[Paper],
    topic: Topic,
    interests: &[InterestTag],
    page: usize,
    page_size: usize,
) -> Vec<Paper> {
    let filtered = filter_papers(papers, topic, interests);
    slice_page(&filtered, page, page_size)
}

/// Reshuffles the filtered list with `rng` and returns page `page`.
pub fn select_shuffled_page<R: Rng + ?Sized>(
    papers: &[Paper],
    topic: Topic,
    interests: &[InterestTag],
    page: usize,
    page_size: usize,
    rng: &mut R,
) -> Vec<Paper> {
    let mut filtered = filter_papers(papers, topic, interests);
    filtered.shuffle(rng);
    slice_page(&filtered, page, page_size)
}

/// Builds one shuffled first page per tab, in tab order.
pub fn select_all_topics<R: Rng + ?Sized>(
    papers: &[Paper],
    interests: &[InterestTag],
    page_size: usize,
    rng: &mut R,
) -> Vec<(Topic, Vec<Paper>)> {
    Topic::TABS
        .into_iter()
        .map(|topic| {
            (
                topic,
                select_shuffled_page(papers, topic, interests, 0, page_size, &mut *rng),
            )
        })
        .collect()
}

fn slice_page(filtered: &[&Paper], page: usize, page_size: usize) -> Vec<Paper> {
    if page_size == 0 {
        return Vec::new();
    }
    let Some(start) = page.checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= filtered.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(filtered.len());
    filtered[start..end]
        .iter()
        .map(|paper| (*paper).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{seeded_rng, select_cursor_page, select_shuffled_page, slice_page};
    use crate::model::paper::Paper;
    use crate::model::topic::Topic;

    fn papers(count: usize) -> Vec<Paper> {
        (0..count)
            .map(|i| Paper::new(format!("p{i}"), format!("Paper {i}"), "Robotics"))
            .collect()
    }

    #[test]
    fn zero_page_size_yields_empty_page() {
        let all = papers(3);
        let refs: Vec<&Paper> = all.iter().collect();
        assert!(slice_page(&refs, 0, 0).is_empty());
    }

    #[test]
    fn huge_cursor_does_not_overflow() {
        let all = papers(3);
        assert!(select_cursor_page(&all, Topic::Robotics, &[], usize::MAX, 2).is_empty());
    }

    #[test]
    fn same_seed_gives_same_shuffle() {
        let all = papers(20);
        let first =
            select_shuffled_page(&all, Topic::Robotics, &[], 0, 10, &mut seeded_rng(7));
        let second =
            select_shuffled_page(&all, Topic::Robotics, &[], 0, 10, &mut seeded_rng(7));
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }
}
