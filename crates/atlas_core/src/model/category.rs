//! Goal category enumeration and static display metadata.
//!
//! # Responsibility
//! - Define the closed set of goal categories.
//! - Provide label/icon lookup shared by every presentation surface.
//!
//! # Invariants
//! - Wire form is the lowercase category name.
//! - Metadata is static; it is never stored per goal.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Closed category set for bucket-list goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Travel,
    Adventure,
    Culture,
    Food,
    Nature,
    #[default]
    Personal,
    Creative,
    Career,
    Wellness,
    Social,
    Learning,
    Other,
}

/// Display metadata for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    /// Human-readable label.
    pub label: &'static str,
    /// Icon glyph name used when a goal has no cover image.
    pub icon: &'static str,
}

impl Category {
    /// All categories in picker order.
    pub const ALL: [Category; 12] = [
        Category::Travel,
        Category::Adventure,
        Category::Culture,
        Category::Food,
        Category::Nature,
        Category::Personal,
        Category::Creative,
        Category::Career,
        Category::Wellness,
        Category::Social,
        Category::Learning,
        Category::Other,
    ];

    /// Returns static label/icon metadata.
    pub fn meta(self) -> CategoryMeta {
        let (label, icon) = match self {
            Self::Travel => ("Travel", "airplane"),
            Self::Adventure => ("Adventure", "compass"),
            Self::Culture => ("Culture", "color-palette"),
            Self::Food => ("Food & Drink", "restaurant"),
            Self::Nature => ("Nature", "leaf"),
            Self::Personal => ("Personal", "sparkles"),
            Self::Creative => ("Creative", "brush"),
            Self::Career => ("Career", "briefcase"),
            Self::Wellness => ("Wellness", "fitness"),
            Self::Social => ("Social", "people"),
            Self::Learning => ("Learning", "book"),
            Self::Other => ("Other", "star"),
        };
        CategoryMeta { label, icon }
    }

    pub fn label(self) -> &'static str {
        self.meta().label
    }

    pub fn icon(self) -> &'static str {
        self.meta().icon
    }

    /// Stable wire name (`travel`, `food`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Adventure => "adventure",
            Self::Culture => "culture",
            Self::Food => "food",
            Self::Nature => "nature",
            Self::Personal => "personal",
            Self::Creative => "creative",
            Self::Career => "career",
            Self::Wellness => "wellness",
            Self::Social => "social",
            Self::Learning => "learning",
            Self::Other => "other",
        }
    }

    /// Parses a category name leniently.
    ///
    /// Matching is case-insensitive and whitespace-trimmed. `adventures`
    /// is accepted as an alias and unknown names resolve to `Other`, so
    /// legacy records always load.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "travel" => Self::Travel,
            "adventure" | "adventures" => Self::Adventure,
            "culture" => Self::Culture,
            "food" => Self::Food,
            "nature" => Self::Nature,
            "personal" => Self::Personal,
            "creative" => Self::Creative,
            "career" => Self::Career,
            "wellness" => Self::Wellness,
            "social" => Self::Social,
            "learning" => Self::Learning,
            _ => Self::Other,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn wire_names_round_trip_through_lenient_parse() {
        for category in Category::ALL {
            assert_eq!(Category::parse_lenient(category.as_str()), category);
        }
    }

    #[test]
    fn lenient_parse_handles_legacy_labels() {
        assert_eq!(Category::parse_lenient("Travel"), Category::Travel);
        assert_eq!(Category::parse_lenient(" Adventures "), Category::Adventure);
        assert_eq!(Category::parse_lenient("skydiving"), Category::Other);
    }

    #[test]
    fn food_has_display_label() {
        assert_eq!(Category::Food.label(), "Food & Drink");
        assert_eq!(Category::Food.icon(), "restaurant");
    }
}
