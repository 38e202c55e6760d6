use crate::CelebrationTier;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

/// Transient visual element owned by a celebration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Element {
    Overlay {
        tier: CelebrationTier,
        accent: (u8, u8, u8),
    },
    Banner {
        tier: CelebrationTier,
        text: String,
        accent: (u8, u8, u8),
    },
    ParticleLayer {
        tier: CelebrationTier,
    },
}

/// Where celebration elements are attached. Frontends render from it.
pub trait Surface {
    fn attach(&mut self, element: Element) -> ElementId;
    fn detach(&mut self, id: ElementId);
}

/// In-memory surface holding attached elements in attach order.
#[derive(Debug, Default)]
pub struct LayerStack {
    next_id: u64,
    layers: Vec<(ElementId, Element)>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ElementId, Element)> {
        self.layers.iter()
    }
}

impl Surface for LayerStack {
    fn attach(&mut self, element: Element) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.layers.push((id, element));
        id
    }

    fn detach(&mut self, id: ElementId) {
        self.layers.retain(|(item, _)| *item != id);
    }
}
