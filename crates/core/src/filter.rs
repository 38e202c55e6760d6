use crate::ScholarRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const ALL_FILTER: &str = "all";

/// Category restriction applied to every draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActiveFilter {
    #[default]
    All,
    Tag(String),
}

impl ActiveFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_FILTER) {
            Self::All
        } else {
            Self::Tag(value.to_string())
        }
    }

    pub fn matches(&self, record: &ScholarRecord) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => record.has_tag(tag),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_FILTER,
            Self::Tag(tag) => tag,
        }
    }

    /// Next filter in `All, tags[0], tags[1], ...`, wrapping back to `All`.
    pub fn cycle(&self, tags: &[String], forward: bool) -> Self {
        let mut options = Vec::with_capacity(tags.len() + 1);
        options.push(Self::All);
        options.extend(tags.iter().cloned().map(Self::Tag));
        let current = options.iter().position(|item| item == self).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        options.swap_remove(next)
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ActiveFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ActiveFilter> for String {
    fn from(value: ActiveFilter) -> Self {
        value.label().to_string()
    }
}

/// Sorted, de-duplicated tags present in the dataset.
pub fn collect_tags(dataset: &[ScholarRecord]) -> Vec<String> {
    dataset
        .iter()
        .flat_map(|record| record.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
