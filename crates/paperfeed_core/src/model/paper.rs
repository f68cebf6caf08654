//! Paper domain model.
//!
//! # Responsibility
//! - Define the canonical record loaded from the bundled catalog.
//! - Derive display-ready text (author line, abstract preview, share text).
//!
//! # Invariants
//! - `id` is non-empty and stable across runs.
//! - `title` carries no content rule; a blank title is still a valid record.
//! - Optional fields (`venue`, `year`, `link`) may be absent; absence is not
//!   an error.
//! - `year` is read from a JSON number or a numeric string (`"2023"`).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a catalog paper.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PaperId = String;

/// Author count shown before collapsing into "et al.".
pub const AUTHORS_SUMMARY_MAX: usize = 3;
/// Abstract preview length used by list cards.
pub const CARD_ABSTRACT_PREVIEW_CHARS: usize = 150;
/// Abstract preview length used by full-screen feed cards.
pub const FULL_SCREEN_ABSTRACT_PREVIEW_CHARS: usize = 500;

/// Validation errors for paper records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperValidationError {
    EmptyId,
}

impl Display for PaperValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "paper id must not be empty"),
        }
    }
}

impl Error for PaperValidationError {}

/// Research paper record as bundled in the catalog.
///
/// Bookmarks store a full copy of this record, so the serialized shape is
/// also the persisted bookmark shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Paper {
    /// Creates a paper with required fields and no optional metadata.
    pub fn new(
        id: impl Into<PaperId>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: String::new(),
            authors: Vec::new(),
            category: category.into(),
            venue: None,
            year: None,
            link: None,
        }
    }

    /// Validates record-level invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    pub fn validate(&self) -> Result<(), PaperValidationError> {
        if self.id.trim().is_empty() {
            return Err(PaperValidationError::EmptyId);
        }
        Ok(())
    }

    /// Returns the compact author line used by cards.
    ///
    /// Up to three authors are joined by `, `; longer lists keep the first
    /// three and append ` et al.`.
    pub fn authors_summary(&self) -> String {
        if self.authors.len() <= AUTHORS_SUMMARY_MAX {
            return self.authors.join(", ");
        }
        format!(
            "{} et al.",
            self.authors[..AUTHORS_SUMMARY_MAX].join(", ")
        )
    }

    /// Returns every author joined by `, ` (detail view).
    pub fn authors_full(&self) -> String {
        self.authors.join(", ")
    }

    /// Returns the abstract cut to `max_chars` characters.
    ///
    /// Counting is per `char`, so multi-byte text is never split inside a
    /// code point.
    pub fn abstract_preview(&self, max_chars: usize) -> String {
        if self.abstract_text.chars().count() <= max_chars {
            return self.abstract_text.clone();
        }
        let head: String = self.abstract_text.chars().take(max_chars).collect();
        format!("{}...", head.trim_end())
    }

    /// Returns whether the abstract is long enough to offer "Read more".
    pub fn has_long_abstract(&self) -> bool {
        self.abstract_text.chars().count() > CARD_ABSTRACT_PREVIEW_CHARS
    }

    /// Returns the text handed to the platform share sheet.
    pub fn share_message(&self) -> String {
        match self.link.as_deref() {
            Some(link) if !link.trim().is_empty() => format!(
                "Check out this research paper: {}\n\n{}",
                self.title, link
            ),
            _ => format!("Check out this research paper: {}", self.title),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYear {
    Number(i32),
    Text(String),
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawYear>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawYear::Number(year)) => Ok(Some(year)),
        Some(RawYear::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i32>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid year `{trimmed}`")))
        }
    }
}
