use ahash::AHashMap;

/// Which flows are currently drawn on the canvas, keyed by flow id.
///
/// Flows missing from the map are hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleFlows {
    flows: AHashMap<String, bool>,
}

impl VisibleFlows {
    /// All listed flows start visible.
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            flows: ids.into_iter().map(|id| (id.to_string(), true)).collect(),
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.flows.get(id).copied().unwrap_or(false)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        self.flows.insert(id.to_string(), visible);
    }

    /// Flips the visibility of `id` and returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let visible = !self.is_visible(id);
        self.set_visible(id, visible);
        visible
    }

    pub fn show_all(&mut self) {
        self.flows.values_mut().for_each(|v| *v = true);
    }

    pub fn hide_all(&mut self) {
        self.flows.values_mut().for_each(|v| *v = false);
    }

    pub fn all_hidden(&self) -> bool {
        self.flows.values().all(|visible| !visible)
    }

    /// Keeps the map aligned with the current flows: new ids become visible,
    /// ids that no longer exist are dropped, known ids keep their state.
    pub fn sync<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let mut synced = AHashMap::new();
        for id in ids {
            let visible = self.flows.get(id).copied().unwrap_or(true);
            synced.insert(id.to_string(), visible);
        }
        self.flows = synced;
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}
