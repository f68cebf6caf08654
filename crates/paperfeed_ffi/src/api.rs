//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose feed, bookmark, interest and onboarding use-cases to Dart via FRB.
//! - Translate core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Storage-backed functions are not `sync`: FRB runs them off the UI
//!   thread and the Dart side awaits the result.
//! - A bookmark envelope reports `ok=true` only after the write succeeded.

use log::warn;
use paperfeed_core::db::open_db;
use paperfeed_core::model::paper::{
    CARD_ABSTRACT_PREVIEW_CHARS, FULL_SCREEN_ABSTRACT_PREVIEW_CHARS,
};
use paperfeed_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    saved_papers_label, BookmarkService, FeedConfig, FeedService, InterestService, InterestTag,
    OnboardingSelection, OnboardingService, Paper, PaperCatalog, PaperId, SqliteKeyValueStore,
    Topic, DEFAULT_PAGE_SIZE,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "paperfeed.sqlite3";
const DB_PATH_ENV: &str = "PAPERFEED_DB_PATH";
const CATALOG_PATH_ENV: &str = "PAPERFEED_CATALOG_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CATALOG: OnceLock<PaperCatalog> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Paper projection handed to Dart widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperItem {
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub authors: Vec<String>,
    /// Author line with "et al." collapsing.
    pub authors_summary: String,
    /// Every author, for the detail view.
    pub authors_full: String,
    /// Abstract cut for list cards.
    pub abstract_preview: String,
    /// Abstract cut for full-screen feed cards.
    pub full_abstract_preview: String,
    /// Whether the card offers "Read more".
    pub has_long_abstract: bool,
    pub category: String,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub link: Option<String>,
    /// Text for the platform share sheet.
    pub share_message: String,
    /// Confirmed bookmark state when the item was built.
    pub bookmarked: bool,
}

/// One tab worth of papers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPage {
    /// Topic id (`ml|robotics|for-you`).
    pub topic: String,
    pub title: String,
    pub papers: Vec<PaperItem>,
}

/// Feed load envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub ok: bool,
    pub pages: Vec<TopicPage>,
    pub message: String,
}

impl FeedResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            pages: Vec::new(),
            message,
        }
    }
}

/// Bookmark mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkResponse {
    pub ok: bool,
    /// Confirmed bookmark state after the call.
    pub bookmarked: bool,
    pub message: String,
}

/// Bookmark list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkListResponse {
    pub ok: bool,
    pub items: Vec<PaperItem>,
    /// Header text, e.g. `2 saved papers`.
    pub header: String,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Onboarding grid entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestOption {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

/// Loads the bundled catalog from JSON text.
///
/// The catalog is immutable once loaded; later calls report the loaded size.
pub fn catalog_load_json(json: String) -> ActionResponse {
    if let Some(existing) = CATALOG.get() {
        return ActionResponse::success(format!("Catalog ready ({} papers).", existing.len()));
    }
    match PaperCatalog::from_json_str(&json) {
        Ok(catalog) => {
            let loaded = CATALOG.get_or_init(|| catalog);
            ActionResponse::success(format!("Catalog ready ({} papers).", loaded.len()))
        }
        Err(err) => ActionResponse::failure(format!("catalog_load_json failed: {err}")),
    }
}

/// Loads the bundled catalog from a JSON file path.
pub fn catalog_load_file(path: String) -> ActionResponse {
    match std::fs::read_to_string(path.trim()) {
        Ok(json) => catalog_load_json(json),
        Err(err) => ActionResponse::failure(format!("catalog_load_file failed: {err}")),
    }
}

/// Returns the onboarding interest grid in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_interest_options() -> Vec<InterestOption> {
    InterestTag::ALL
        .into_iter()
        .map(|tag| InterestOption {
            id: tag.as_str().to_string(),
            name: tag.display_name().to_string(),
            emoji: tag.emoji().to_string(),
        })
        .collect()
}

/// Startup routing check: `true` means show onboarding.
///
/// Read-only; the flag is written by `onboarding_complete`. Storage failures
/// route to the main tabs.
pub fn launch_check_first() -> bool {
    match with_store(|store| {
        OnboardingService::new(store)
            .needs_onboarding()
            .map_err(|err| err.to_string())
    }) {
        Ok(first) => first,
        Err(err) => {
            warn!("event=launch_check module=ffi status=fallback error={err}");
            false
        }
    }
}

/// Saves the onboarding selection and marks onboarding complete.
///
/// Unknown tag ids are rejected before anything is written.
pub fn onboarding_complete(tags: Vec<String>) -> ActionResponse {
    let parsed = match parse_tags(&tags) {
        Ok(parsed) => parsed,
        Err(message) => return ActionResponse::failure(message),
    };
    let mut selection = OnboardingSelection::new();
    for tag in parsed {
        if !selection.is_selected(tag) {
            selection.toggle(tag);
        }
    }
    match with_store(|store| {
        OnboardingService::new(store)
            .complete(&selection)
            .map_err(|err| err.to_string())
    }) {
        Ok(saved) => ActionResponse::success(format!("Saved {} interest(s).", saved.len())),
        Err(err) => ActionResponse::failure(format!("onboarding_complete failed: {err}")),
    }
}

/// Replaces the saved interests.
pub fn interests_save(tags: Vec<String>) -> ActionResponse {
    let parsed = match parse_tags(&tags) {
        Ok(parsed) => parsed,
        Err(message) => return ActionResponse::failure(message),
    };
    match with_store(|store| {
        InterestService::new(store)
            .save(&parsed)
            .map_err(|err| err.to_string())
    }) {
        Ok(saved) => ActionResponse::success(format!("Saved {} interest(s).", saved.len())),
        Err(err) => ActionResponse::failure(format!("interests_save failed: {err}")),
    }
}

/// Returns saved interest ids; empty when unset or unreadable.
pub fn interests_load() -> Vec<String> {
    with_store(|store| Ok(InterestService::new(store).load()))
        .unwrap_or_default()
        .into_iter()
        .map(|tag| tag.as_str().to_string())
        .collect()
}

/// Loads one reshuffled first page per tab using saved interests.
pub fn feed_load() -> FeedResponse {
    let result = with_feed_service(FeedConfig::default(), |service| {
        let mut state = service.new_state();
        service.load(&mut state);
        state
    });
    let state = match result {
        Ok(state) => state,
        Err(err) => return FeedResponse::failure(format!("feed_load failed: {err}")),
    };
    let pages = Topic::TABS
        .into_iter()
        .map(|topic| to_topic_page(topic, state.papers_for(topic), &state.bookmarked))
        .collect::<Vec<_>>();
    let message = if pages.iter().all(|page| page.papers.is_empty()) {
        "No papers.".to_string()
    } else {
        "Feed ready.".to_string()
    };
    FeedResponse {
        ok: true,
        pages,
        message,
    }
}

/// Returns cursor page `page` of `topic` in catalog order.
///
/// Pages past the end are empty.
pub fn feed_load_more(topic: String, page: u32, page_size: Option<u32>) -> FeedResponse {
    let Some(parsed_topic) = Topic::parse(&topic) else {
        return FeedResponse::failure(format!("feed_load_more failed: unknown topic `{topic}`"));
    };
    let config = match FeedConfig::cursor(normalize_page_size(page_size)) {
        Ok(config) => config,
        Err(err) => return FeedResponse::failure(format!("feed_load_more failed: {err}")),
    };
    let result = with_feed_service(config, |service| {
        let papers = service.page(parsed_topic, page as usize);
        let mut state = service.new_state();
        service.sync_bookmarks(&mut state);
        (papers, state.bookmarked)
    });
    let (papers, bookmarked) = match result {
        Ok(loaded) => loaded,
        Err(err) => return FeedResponse::failure(format!("feed_load_more failed: {err}")),
    };
    let message = if papers.is_empty() {
        "No more papers.".to_string()
    } else {
        format!("Loaded {} paper(s).", papers.len())
    };
    FeedResponse {
        ok: true,
        pages: vec![to_topic_page(parsed_topic, &papers, &bookmarked)],
        message,
    }
}

/// Returns whether `paper_id` is bookmarked; `false` when storage fails.
pub fn bookmark_is_bookmarked(paper_id: String) -> bool {
    with_store(|store| Ok(BookmarkService::new(store).is_bookmarked(paper_id.trim())))
        .unwrap_or(false)
}

/// Toggles the bookmark for `paper_id`.
///
/// The paper copy is taken from the catalog, or from the bookmark list for
/// papers that are no longer in the catalog.
pub fn bookmark_toggle(paper_id: String) -> BookmarkResponse {
    let paper_id = paper_id.trim().to_string();
    let result = with_store(|store| {
        let service = BookmarkService::new(store);
        let paper = match find_paper(&paper_id) {
            Some(paper) => paper,
            None => service
                .list()
                .map_err(|err| err.to_string())?
                .into_iter()
                .find(|paper| paper.id == paper_id)
                .ok_or_else(|| format!("paper not found: {paper_id}"))?,
        };
        service.toggle(&paper).map_err(|err| err.to_string())
    });
    match result {
        Ok(bookmarked) => BookmarkResponse {
            ok: true,
            bookmarked,
            message: if bookmarked {
                "Bookmarked.".to_string()
            } else {
                "Bookmark removed.".to_string()
            },
        },
        Err(err) => BookmarkResponse {
            ok: false,
            bookmarked: bookmark_is_bookmarked(paper_id),
            message: format!("Failed to update bookmark: {err}"),
        },
    }
}

/// Lists bookmarks, oldest first.
pub fn bookmark_list() -> BookmarkListResponse {
    match with_store(|store| BookmarkService::new(store).list().map_err(|err| err.to_string())) {
        Ok(papers) => BookmarkListResponse {
            ok: true,
            header: saved_papers_label(papers.len()),
            items: papers.iter().map(|paper| to_paper_item(paper, true)).collect(),
            message: String::new(),
        },
        Err(err) => BookmarkListResponse {
            ok: false,
            items: Vec::new(),
            header: String::new(),
            message: format!("Failed to load saved papers: {err}"),
        },
    }
}

/// Removes every bookmark.
pub fn bookmark_clear() -> ActionResponse {
    match with_store(|store| BookmarkService::new(store).clear().map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Bookmarks cleared."),
        Err(err) => ActionResponse::failure(format!("Failed to clear bookmarks: {err}")),
    }
}

fn parse_tags(tags: &[String]) -> Result<Vec<InterestTag>, String> {
    tags.iter()
        .map(|value| {
            InterestTag::parse(value).ok_or_else(|| format!("unknown interest `{}`", value.trim()))
        })
        .collect()
}

fn normalize_page_size(page_size: Option<u32>) -> usize {
    match page_size {
        Some(0) | None => DEFAULT_PAGE_SIZE,
        Some(value) => value as usize,
    }
}

fn find_paper(paper_id: &str) -> Option<Paper> {
    resolve_catalog().and_then(|catalog| catalog.get(paper_id).cloned())
}

fn resolve_catalog() -> Option<&'static PaperCatalog> {
    if let Some(catalog) = CATALOG.get() {
        return Some(catalog);
    }
    let path = std::env::var(CATALOG_PATH_ENV).ok()?;
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }
    match PaperCatalog::from_path(trimmed) {
        Ok(catalog) => Some(CATALOG.get_or_init(|| catalog)),
        Err(err) => {
            warn!("event=catalog_load module=ffi status=error error={err}");
            None
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&SqliteKeyValueStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    let store =
        SqliteKeyValueStore::try_new(&conn).map_err(|err| format!("store init failed: {err}"))?;
    f(&store)
}

fn with_feed_service<T>(
    config: FeedConfig,
    f: impl FnOnce(&mut FeedService<'_, &SqliteKeyValueStore<'_>>) -> T,
) -> Result<T, String> {
    let catalog = resolve_catalog().ok_or_else(|| "catalog not loaded".to_string())?;
    with_store(|store| {
        let mut service =
            FeedService::new(catalog, store, config).map_err(|err| err.to_string())?;
        Ok(f(&mut service))
    })
}

fn to_topic_page(topic: Topic, papers: &[Paper], bookmarked: &BTreeSet<PaperId>) -> TopicPage {
    TopicPage {
        topic: topic.as_str().to_string(),
        title: topic.display_name().to_string(),
        papers: papers
            .iter()
            .map(|paper| to_paper_item(paper, bookmarked.contains(&paper.id)))
            .collect(),
    }
}

fn to_paper_item(paper: &Paper, bookmarked: bool) -> PaperItem {
    PaperItem {
        id: paper.id.clone(),
        title: paper.title.clone(),
        abstract_text: paper.abstract_text.clone(),
        authors: paper.authors.clone(),
        authors_summary: paper.authors_summary(),
        authors_full: paper.authors_full(),
        abstract_preview: paper.abstract_preview(CARD_ABSTRACT_PREVIEW_CHARS),
        full_abstract_preview: paper.abstract_preview(FULL_SCREEN_ABSTRACT_PREVIEW_CHARS),
        has_long_abstract: paper.has_long_abstract(),
        category: paper.category.clone(),
        venue: paper.venue.clone(),
        year: paper.year,
        link: paper.link.clone(),
        share_message: paper.share_message(),
        bookmarked,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        bookmark_is_bookmarked, bookmark_list, bookmark_toggle, catalog_load_json, core_version,
        feed_load, feed_load_more, init_logging, onboarding_complete, onboarding_interest_options,
        ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    const TEST_CATALOG: &str = r#"[
        {"id":"ffi-r1","title":"Robot one","abstract":"","authors":["A","B","C","D"],"category":"Robotics"},
        {"id":"ffi-r2","title":"Robot two","abstract":"","authors":[],"category":"Robotics"},
        {"id":"ffi-m1","title":"Model one","abstract":"word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word word","authors":["Ada","Grace"],"category":"Machine Learning","year":"2021","link":"https://example.org/m1"}
    ]"#;

    fn ensure_catalog() {
        let response = catalog_load_json(TEST_CATALOG.to_string());
        assert!(response.ok, "{}", response.message);
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn interest_options_cover_vocabulary() {
        let options = onboarding_interest_options();
        assert_eq!(options.len(), 12);
        assert_eq!(options[0].id, "ml");
        assert_eq!(options[11].name, "Systems");
    }

    #[test]
    fn onboarding_rejects_unknown_and_empty_selections() {
        let unknown = onboarding_complete(vec!["quantum".to_string()]);
        assert!(!unknown.ok);
        assert!(unknown.message.contains("quantum"));

        let empty = onboarding_complete(Vec::new());
        assert!(!empty.ok);
    }

    #[test]
    fn feed_load_returns_every_tab() {
        ensure_catalog();
        let response = feed_load();
        assert!(response.ok, "{}", response.message);
        let topics: Vec<&str> = response.pages.iter().map(|page| page.topic.as_str()).collect();
        assert_eq!(topics, vec!["ml", "robotics", "for-you"]);
        assert!(response.pages[1]
            .papers
            .iter()
            .all(|paper| paper.category == "Robotics"));
    }

    #[test]
    fn feed_load_more_walks_cursor_pages() {
        ensure_catalog();
        let first = feed_load_more("robotics".to_string(), 0, Some(1));
        assert_eq!(first.pages[0].papers[0].id, "ffi-r1");
        assert_eq!(first.pages[0].papers[0].authors_summary, "A, B, C et al.");
        let second = feed_load_more("robotics".to_string(), 1, Some(1));
        assert_eq!(second.pages[0].papers[0].id, "ffi-r2");
        let past_end = feed_load_more("robotics".to_string(), 2, Some(1));
        assert!(past_end.ok);
        assert!(past_end.pages[0].papers.is_empty());

        let bad_topic = feed_load_more("physics".to_string(), 0, None);
        assert!(!bad_topic.ok);
    }

    #[test]
    fn bookmark_toggle_roundtrips_through_storage() {
        ensure_catalog();
        if bookmark_is_bookmarked("ffi-m1".to_string()) {
            assert!(bookmark_toggle("ffi-m1".to_string()).ok);
        }

        let added = bookmark_toggle("ffi-m1".to_string());
        assert!(added.ok, "{}", added.message);
        assert!(added.bookmarked);
        let listed = bookmark_list();
        assert!(listed.ok, "{}", listed.message);
        let saved = listed
            .items
            .iter()
            .find(|item| item.id == "ffi-m1")
            .expect("bookmarked paper should be listed");
        assert!(saved.share_message.ends_with("https://example.org/m1"));

        let removed = bookmark_toggle("ffi-m1".to_string());
        assert!(removed.ok, "{}", removed.message);
        assert!(!removed.bookmarked);
        assert!(!bookmark_is_bookmarked("ffi-m1".to_string()));
    }

    #[test]
    fn paper_items_carry_card_text() {
        ensure_catalog();
        let response = feed_load_more("ml".to_string(), 0, None);
        assert!(response.ok, "{}", response.message);
        let item = &response.pages[0].papers[0];
        assert_eq!(item.id, "ffi-m1");
        assert_eq!(item.year, Some(2021));
        assert_eq!(item.authors_full, "Ada, Grace");
        assert!(item.has_long_abstract);
        assert!(item.abstract_preview.ends_with("..."));
        assert!(item.abstract_preview.chars().count() <= 153);
        assert_eq!(item.full_abstract_preview, item.abstract_text);
    }

    #[test]
    fn feed_items_report_confirmed_bookmarks() {
        ensure_catalog();
        if !bookmark_is_bookmarked("ffi-r2".to_string()) {
            assert!(bookmark_toggle("ffi-r2".to_string()).bookmarked);
        }

        let response = feed_load_more("robotics".to_string(), 0, Some(10));
        let saved = response.pages[0]
            .papers
            .iter()
            .find(|item| item.id == "ffi-r2")
            .expect("robotics page should contain ffi-r2");
        assert!(saved.bookmarked);

        let removed = bookmark_toggle("ffi-r2".to_string());
        assert!(removed.ok, "{}", removed.message);
        assert!(!removed.bookmarked);
    }

    #[test]
    fn bookmark_toggle_rejects_unknown_paper() {
        ensure_catalog();
        let token = unique_token("missing-paper");
        let response = bookmark_toggle(token);
        assert!(!response.ok);
        assert!(!response.bookmarked);
        assert!(response.message.contains("paper not found"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
