use crate::CelebrationTier;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    N,
    R,
    SR,
    SSR,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::N, Rarity::R, Rarity::SR, Rarity::SSR];

    pub fn code(self) -> &'static str {
        match self {
            Rarity::N => "N",
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
        }
    }

    /// Spreadsheet level (1-4) to tier; anything unknown is `N`.
    pub fn from_level(level: i64) -> Self {
        match level {
            2 => Rarity::R,
            3 => Rarity::SR,
            4 => Rarity::SSR,
            _ => Rarity::N,
        }
    }

    pub fn celebration_tier(self) -> Option<CelebrationTier> {
        match self {
            Rarity::SSR => Some(CelebrationTier::Top),
            Rarity::SR => Some(CelebrationTier::Second),
            Rarity::N | Rarity::R => None,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedName {
    #[serde(default)]
    pub ja: String,
    #[serde(default)]
    pub en: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contribution {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScholarRecord {
    pub id: String,
    pub name: LocalizedName,
    #[serde(default)]
    pub affiliation: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub contribution: Contribution,
    #[serde(default)]
    pub trivia: String,
    #[serde(default, rename = "triviaSource")]
    pub trivia_source: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ScholarRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|item| item == tag)
    }

    /// Japanese name, then English, then the id.
    pub fn display_name(&self) -> &str {
        if !self.name.ja.trim().is_empty() {
            &self.name.ja
        } else if !self.name.en.trim().is_empty() {
            &self.name.en
        } else {
            &self.id
        }
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}
