//! Visible feed tabs.

use crate::model::interest::InterestTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// User-facing feed tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Ml,
    Robotics,
    ForYou,
}

/// Categories a topic admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filtering; every catalog paper is eligible.
    All,
    /// Only papers whose category is in the set are eligible.
    Only(BTreeSet<String>),
}

impl CategoryFilter {
    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(categories) => categories.contains(category),
        }
    }
}

impl Topic {
    /// Tabs in display order.
    pub const TABS: [Topic; 3] = [Topic::Ml, Topic::Robotics, Topic::ForYou];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ml => "ml",
            Self::Robotics => "robotics",
            Self::ForYou => "for-you",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::TABS
            .into_iter()
            .find(|topic| topic.as_str() == value.trim())
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ml => "Machine Learning",
            Self::Robotics => "Robotics",
            Self::ForYou => "For You",
        }
    }

    /// Position of this topic in the tab bar.
    pub fn tab_index(self) -> usize {
        match self {
            Self::Ml => 0,
            Self::Robotics => 1,
            Self::ForYou => 2,
        }
    }

    /// Resolves the candidate category set for this topic.
    ///
    /// `ForYou` takes the union of the interests' categories, or `All` when
    /// no interest is selected. Other topics ignore `interests`.
    pub fn category_filter(self, interests: &[InterestTag]) -> CategoryFilter {
        match self {
            Self::Ml => only(&["Machine Learning"]),
            Self::Robotics => only(&["Robotics"]),
            Self::ForYou => {
                let categories: BTreeSet<String> = interests
                    .iter()
                    .flat_map(|tag| tag.categories().iter())
                    .map(|category| (*category).to_string())
                    .collect();
                if categories.is_empty() {
                    CategoryFilter::All
                } else {
                    CategoryFilter::Only(categories)
                }
            }
        }
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn only(categories: &[&str]) -> CategoryFilter {
    CategoryFilter::Only(categories.iter().map(|c| (*c).to_string()).collect())
}
