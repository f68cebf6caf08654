//! Feed configuration.
//!
//! # Invariants
//! - `page_size` is always greater than zero after `validate()`.

use crate::model::topic::Topic;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Papers per feed page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How a topic feed fills and grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Every full load reshuffles the filtered list and shows one page;
    /// "load more" is not offered.
    #[default]
    ShuffledFirstPage,
    /// Pages are consecutive slices of the filtered list in catalog order;
    /// "load more" appends the next slice until the list runs out.
    Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedConfigError {
    ZeroPageSize,
}

impl Display for FeedConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page_size must be greater than zero"),
        }
    }
}

impl Error for FeedConfigError {}

/// Feed presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub page_size: usize,
    pub pagination: PaginationMode,
    /// Tab shown when the feed first opens.
    pub initial_topic: Topic,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pagination: PaginationMode::default(),
            initial_topic: Topic::ForYou,
        }
    }
}

impl FeedConfig {
    /// Cursor-paginated config with the given page size.
    pub fn cursor(page_size: usize) -> Result<Self, FeedConfigError> {
        Self {
            page_size,
            pagination: PaginationMode::Cursor,
            ..Self::default()
        }
        .validate()
    }

    /// Returns `self` when every field is in range.
    pub fn validate(self) -> Result<Self, FeedConfigError> {
        if self.page_size == 0 {
            return Err(FeedConfigError::ZeroPageSize);
        }
        Ok(self)
    }
}
