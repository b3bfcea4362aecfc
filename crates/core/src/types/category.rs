//! Subject categories

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of subject areas a book can be filed under.
///
/// The ordinal values are what the record files store, so their order must
/// never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mathematics,
    ComputerScience,
    Physics,
    Literature,
    Others,
}

impl Category {
    /// All categories in ordinal order
    pub const ALL: [Category; 5] = [
        Category::Mathematics,
        Category::ComputerScience,
        Category::Physics,
        Category::Literature,
        Category::Others,
    ];

    /// Returns the ordinal stored in the record files
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Mathematics => 0,
            Self::ComputerScience => 1,
            Self::Physics => 2,
            Self::Literature => 3,
            Self::Others => 4,
        }
    }

    /// Maps an ordinal back to its category
    ///
    /// Anything outside `0..=4` is rejected instead of being stored as an
    /// unnamed category.
    pub fn from_ordinal(ordinal: i64) -> Result<Self, CatalogError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| CatalogError::InvalidArgument {
                argument: "category".to_string(),
                reason: format!("{} is not between 0 and {}", ordinal, Self::ALL.len() - 1),
            })
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Mathematics => "Mathematics",
            Self::ComputerScience => "Computer Science",
            Self::Physics => "Physics",
            Self::Literature => "Literature",
            Self::Others => "Others",
        }
    }

    /// Menu prompt listing every ordinal with its name
    pub fn prompt_listing() -> String {
        Self::ALL
            .iter()
            .map(|c| format!("{}-{}", c.ordinal(), c.display_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    /// Accepts an ordinal (`"1"`) or a name in any case, with spaces,
    /// dashes or underscores between words (`"computer science"`,
    /// `"Computer-Science"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<i64>() {
            return Self::from_ordinal(ordinal);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "mathematics" | "math" => Ok(Self::Mathematics),
            "computerscience" | "cs" => Ok(Self::ComputerScience),
            "physics" => Ok(Self::Physics),
            "literature" => Ok(Self::Literature),
            "others" | "other" => Ok(Self::Others),
            _ => Err(CatalogError::InvalidArgument {
                argument: "category".to_string(),
                reason: format!("unknown category '{}'", trimmed),
            }),
        }
    }
}
