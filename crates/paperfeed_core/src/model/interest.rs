//! Interest vocabulary chosen during onboarding.
//!
//! # Responsibility
//! - Define the fixed set of interest tags and their persisted string form.
//! - Map each tag to the paper categories it selects in the "For You" feed.
//!
//! # Invariants
//! - `as_str()` and `parse()` are exact inverses for every variant.
//! - `ALL` lists tags in onboarding display order.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// User preference signal from the fixed onboarding vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterestTag {
    Ml,
    Nlp,
    Cv,
    Robotics,
    Ai,
    DeepLearning,
    Reinforcement,
    Neuroscience,
    Statistics,
    Optimization,
    Graphics,
    Systems,
}

impl InterestTag {
    /// Every tag in onboarding display order.
    pub const ALL: [InterestTag; 12] = [
        InterestTag::Ml,
        InterestTag::Nlp,
        InterestTag::Cv,
        InterestTag::Robotics,
        InterestTag::Ai,
        InterestTag::DeepLearning,
        InterestTag::Reinforcement,
        InterestTag::Neuroscience,
        InterestTag::Statistics,
        InterestTag::Optimization,
        InterestTag::Graphics,
        InterestTag::Systems,
    ];

    /// Stable persisted identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ml => "ml",
            Self::Nlp => "nlp",
            Self::Cv => "cv",
            Self::Robotics => "robotics",
            Self::Ai => "ai",
            Self::DeepLearning => "deep-learning",
            Self::Reinforcement => "reinforcement",
            Self::Neuroscience => "neuroscience",
            Self::Statistics => "statistics",
            Self::Optimization => "optimization",
            Self::Graphics => "graphics",
            Self::Systems => "systems",
        }
    }

    /// Parses a persisted identifier; unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == value.trim())
    }

    /// Human-readable label for the onboarding grid.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ml => "Machine Learning",
            Self::Nlp => "Natural Language Processing",
            Self::Cv => "Computer Vision",
            Self::Robotics => "Robotics",
            Self::Ai => "Artificial Intelligence",
            Self::DeepLearning => "Deep Learning",
            Self::Reinforcement => "Reinforcement Learning",
            Self::Neuroscience => "Neuroscience",
            Self::Statistics => "Statistics",
            Self::Optimization => "Optimization",
            Self::Graphics => "Computer Graphics",
            Self::Systems => "Systems",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Ml | Self::Robotics => "🤖",
            Self::Nlp => "💬",
            Self::Cv => "👁️",
            Self::Ai | Self::Neuroscience => "🧠",
            Self::DeepLearning => "🧬",
            Self::Reinforcement => "🎮",
            Self::Statistics => "📊",
            Self::Optimization => "⚡",
            Self::Graphics => "🎨",
            Self::Systems => "⚙️",
        }
    }

    /// Paper categories selected by this tag.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Self::Ml | Self::DeepLearning | Self::Reinforcement => &["Machine Learning"],
            Self::Nlp => &["Machine Learning", "Natural Language Processing"],
            Self::Cv => &["Machine Learning", "Computer Vision"],
            Self::Robotics => &["Robotics"],
            Self::Ai => &["Machine Learning", "Artificial Intelligence"],
            Self::Neuroscience => &["Neuroscience"],
            Self::Statistics => &["Statistics"],
            Self::Optimization => &["Optimization"],
            Self::Graphics => &["Computer Graphics"],
            Self::Systems => &["Systems"],
        }
    }
}

impl Display for InterestTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Removes repeated tags, keeping the first occurrence and original order.
pub fn dedup_tags(tags: &[InterestTag]) -> Vec<InterestTag> {
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(tag) {
            unique.push(*tag);
        }
    }
    unique
}
