//! Activity Tracker.
//!
//! Last-interaction timestamp per tab, fed by activation and load events.

use std::collections::HashMap;

use crate::types::tab::TabId;

/// Trait defining the activity tracking interface.
pub trait ActivityTrackerTrait {
    fn record_activity(&mut self, tab_id: TabId, now: i64);
    fn get_last_active(&self, tab_id: TabId, host_fallback: Option<i64>) -> Option<i64>;
    fn forget(&mut self, tab_id: TabId);
    fn tracked_count(&self) -> usize;
}

/// In-memory activity tracker.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    last_active: HashMap<TabId, i64>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityTrackerTrait for ActivityTracker {
    /// Marks the tab as used at `now`. Repeating the call with the same `now` is a no-op.
    fn record_activity(&mut self, tab_id: TabId, now: i64) {
        self.last_active.insert(tab_id, now);
    }

    /// Tracked timestamp, else the host's last-accessed metadata for tabs this
    /// tracker never observed (e.g. after a restart mid-session).
    fn get_last_active(&self, tab_id: TabId, host_fallback: Option<i64>) -> Option<i64> {
        self.last_active.get(&tab_id).copied().or(host_fallback)
    }

    fn forget(&mut self, tab_id: TabId) {
        self.last_active.remove(&tab_id);
    }

    fn tracked_count(&self) -> usize {
        self.last_active.len()
    }
}
