use crate::{
    collect_tags, draw, render_card, ActiveFilter, CardView, Celebration, CelebrationPlan,
    CelebrationTier, DrawError, DrawHistory, Event, EventBus, GachaConfig, IndexSource, RngState,
    ScholarRecord, Surface, Viewport,
};

/// Result of one draw-and-render cycle.
#[derive(Debug, Clone)]
pub struct Pull {
    pub record: ScholarRecord,
    pub card: CardView,
    pub celebration: Option<CelebrationTier>,
    pub history_reset: bool,
}

/// Owns the dataset and the per-session draw state.
///
/// Every mutation goes through `&mut self`, so a draw's read of the filter
/// and history and its write back to the history happen as one step.
#[derive(Debug)]
pub struct GachaSession<R = RngState> {
    config: GachaConfig,
    dataset: Vec<ScholarRecord>,
    tags: Vec<String>,
    history: DrawHistory,
    filter: ActiveFilter,
    rng: R,
}

impl<R: IndexSource> GachaSession<R> {
    pub fn new(dataset: Vec<ScholarRecord>, config: GachaConfig, rng: R) -> Self {
        let tags = collect_tags(&dataset);
        Self {
            config,
            dataset,
            tags,
            history: DrawHistory::new(),
            filter: ActiveFilter::All,
            rng,
        }
    }

    pub fn config(&self) -> &GachaConfig {
        &self.config
    }

    pub fn dataset(&self) -> &[ScholarRecord] {
        &self.dataset
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn history(&self) -> &DrawHistory {
        &self.history
    }

    pub fn filter(&self) -> &ActiveFilter {
        &self.filter
    }

    pub fn find(&self, id: &str) -> Option<&ScholarRecord> {
        self.dataset.iter().find(|record| record.id == id)
    }

    /// Swaps in a new dataset. The history is cleared since its ids may be gone.
    pub fn replace_dataset(&mut self, dataset: Vec<ScholarRecord>, events: &mut EventBus) {
        self.tags = collect_tags(&dataset);
        self.dataset = dataset;
        self.history.clear();
        events.push(Event::DatasetLoaded {
            count: self.dataset.len(),
        });
    }

    pub fn eligible_count(&self) -> usize {
        self.dataset
            .iter()
            .filter(|record| self.filter.matches(record))
            .count()
    }

    pub fn set_filter(&mut self, filter: ActiveFilter, events: &mut EventBus) {
        if self.filter == filter {
            return;
        }
        tracing::debug!(from = %self.filter, to = %filter, "filter changed");
        self.filter = filter.clone();
        events.push(Event::FilterChanged { filter });
    }

    pub fn cycle_filter(&mut self, forward: bool, events: &mut EventBus) {
        let next = self.filter.cycle(&self.tags, forward);
        self.set_filter(next, events);
    }

    pub fn reset_history(&mut self, events: &mut EventBus) {
        self.history.clear();
        events.push(Event::HistoryReset {
            filter: self.filter.clone(),
        });
    }

    pub fn pull(&mut self, events: &mut EventBus) -> Result<Pull, DrawError> {
        let outcome = match draw(&self.dataset, &self.filter, &mut self.history, &mut self.rng) {
            Ok(outcome) => outcome,
            Err(DrawError::NoMatchingCategory(tag)) => {
                tracing::info!(filter = %tag, "no scholar in category");
                events.push(Event::NoMatchingCategory {
                    filter: self.filter.clone(),
                });
                return Err(DrawError::NoMatchingCategory(tag));
            }
            Err(err) => {
                tracing::debug!(%err, "draw skipped");
                return Err(err);
            }
        };
        if outcome.history_reset {
            events.push(Event::HistoryReset {
                filter: self.filter.clone(),
            });
        }
        let record = outcome.record.clone();
        events.push(Event::Drawn {
            id: record.id.clone(),
            rarity: record.rarity,
            drawn: self.history.len(),
            eligible: self
                .dataset
                .iter()
                .filter(|item| self.filter.matches(item))
                .count(),
        });
        let card = render_card(&record, &self.config.card);
        Ok(Pull {
            celebration: record.rarity.celebration_tier(),
            history_reset: outcome.history_reset,
            card,
            record,
        })
    }

    pub fn plan_celebration(&mut self, tier: CelebrationTier, viewport: Viewport) -> CelebrationPlan {
        CelebrationPlan::new(tier, &self.config.celebration, viewport, &mut self.rng)
    }

    /// Starts the celebration for `pull`, if its rarity earns one.
    pub fn celebrate(
        &mut self,
        pull: &Pull,
        viewport: Viewport,
        surface: &mut dyn Surface,
        events: &mut EventBus,
    ) -> Option<Celebration> {
        let tier = pull.celebration?;
        let plan = self.plan_celebration(tier, viewport);
        events.push(Event::CelebrationStarted { tier });
        Some(Celebration::start(plan, surface))
    }
}
