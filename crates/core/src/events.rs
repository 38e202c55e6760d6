use crate::{ActiveFilter, CelebrationTier, Rarity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    DatasetLoaded { count: usize },
    FilterChanged { filter: ActiveFilter },
    HistoryReset { filter: ActiveFilter },
    Drawn {
        id: String,
        rarity: Rarity,
        drawn: usize,
        eligible: usize,
    },
    NoMatchingCategory { filter: ActiveFilter },
    CelebrationStarted { tier: CelebrationTier },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
