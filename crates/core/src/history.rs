use std::collections::HashSet;

/// Identifiers drawn in the current session, in draw order.
#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DrawHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.seen.insert(id.to_string()) {
            return false;
        }
        self.order.push(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn last(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }
}
