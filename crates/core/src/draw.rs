use crate::{ActiveFilter, DrawHistory, IndexSource, ScholarRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("no scholar matches category {0}")]
    NoMatchingCategory(String),
}

#[derive(Debug, Clone, Copy)]
pub struct DrawOutcome<'a> {
    pub record: &'a ScholarRecord,
    /// Every eligible record had been drawn, so the history was cleared first.
    pub history_reset: bool,
}

/// Draws one record matching `filter` that is not yet in `history`.
///
/// The empty-dataset and empty-category checks run before any history
/// handling, so the single reset-and-retry below always finds a candidate.
pub fn draw<'a, R>(
    dataset: &'a [ScholarRecord],
    filter: &ActiveFilter,
    history: &mut DrawHistory,
    rng: &mut R,
) -> Result<DrawOutcome<'a>, DrawError>
where
    R: IndexSource + ?Sized,
{
    if dataset.is_empty() {
        return Err(DrawError::EmptyDataset);
    }
    let eligible: Vec<&ScholarRecord> = dataset
        .iter()
        .filter(|record| filter.matches(record))
        .collect();
    if eligible.is_empty() {
        return Err(DrawError::NoMatchingCategory(filter.label().to_string()));
    }

    let mut history_reset = false;
    let mut remaining = undrawn(&eligible, history);
    if remaining.is_empty() {
        tracing::debug!(filter = %filter, drawn = history.len(), "all eligible drawn, resetting history");
        history.clear();
        history_reset = true;
        remaining = undrawn(&eligible, history);
    }

    let idx = rng.index(remaining.len()).min(remaining.len() - 1);
    let record = remaining[idx];
    history.insert(&record.id);
    tracing::debug!(id = %record.id, rarity = %record.rarity, remaining = remaining.len() - 1, "drew scholar");
    Ok(DrawOutcome {
        record,
        history_reset,
    })
}

fn undrawn<'a>(eligible: &[&'a ScholarRecord], history: &DrawHistory) -> Vec<&'a ScholarRecord> {
    eligible
        .iter()
        .copied()
        .filter(|record| !history.contains(&record.id))
        .collect()
}
