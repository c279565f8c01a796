//! Card value types shared by every engine component.

use serde::{Deserialize, Serialize};

/// Category a card belongs to. Gold and blue cards share the drop rarity
/// budget; unique cards sit behind the progression gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    GoldShared,
    BlueShared,
    Unique,
}

/// Stable ordering used for snapshot maps and candidate scans.
pub const CATEGORY_ORDER: [CardCategory; 3] = [
    CardCategory::GoldShared,
    CardCategory::BlueShared,
    CardCategory::Unique,
];

impl CardCategory {
    /// Whether this category participates in the shared rarity pool.
    #[must_use]
    pub const fn is_shared(self) -> bool {
        matches!(self, Self::GoldShared | Self::BlueShared)
    }

    /// Snake-case key used in snapshots and reports.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::GoldShared => "gold_shared",
            Self::BlueShared => "blue_shared",
            Self::Unique => "unique",
        }
    }
}

impl std::fmt::Display for CardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single collectible card owned by the running simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub category: CardCategory,
    /// Current level, starts at 1 and never exceeds the category cap.
    pub level: u32,
    /// Duplicate copies banked toward the next upgrade.
    pub duplicates: u32,
}

impl Card {
    /// Create a fresh level-1 card with no duplicates.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: CardCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            level: 1,
            duplicates: 0,
        }
    }

    /// Whether the card sits at the supplied category cap.
    #[must_use]
    pub const fn is_maxed(&self, max_level: u32) -> bool {
        self.level >= max_level
    }
}
