//! Tab State Registry.
//!
//! Authoritative tab id → [`TabRecord`] map. Every mutation is synchronous; callers hold
//! the registry lock only between awaits, never across one.

use std::collections::BTreeMap;

use crate::services::placeholder::PlaceholderCodec;
use crate::types::placeholder::UrlKind;
use crate::types::tab::{TabId, TabRecord, TabSnapshot};

/// What a completed navigation did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Internal page, nothing recorded.
    Ignored,
    /// A normal page was recorded as the tab's identity.
    Tracked,
    /// A suspended tab showed up on a normal page: the user navigated away from the
    /// placeholder, which counts as the restore.
    ImplicitlyRestored,
    /// The placeholder finished loading. `own_suspend` is true for the load caused by
    /// our own suspend call.
    PlaceholderLoaded { own_suspend: bool },
}

/// Trait defining the tab registry interface.
pub trait TabRegistryTrait {
    fn upsert_on_navigation(&mut self, tab_id: TabId, url: &str, title: &str, now: i64)
        -> NavigationOutcome;
    fn seed(&mut self, tab: &TabSnapshot, now: i64) -> bool;
    fn adopt_placeholder(&mut self, tab_id: TabId, url: &str, now: i64) -> bool;
    fn mark_suspended(
        &mut self,
        tab_id: TabId,
        original_url: &str,
        original_title: &str,
        placeholder_url: &str,
        now: i64,
    );
    fn mark_restored(&mut self, tab_id: TabId, now: i64) -> bool;
    fn remove(&mut self, tab_id: TabId) -> Option<TabRecord>;
    fn get(&self, tab_id: TabId) -> Option<&TabRecord>;
    fn get_all(&self) -> Vec<&TabRecord>;
    fn is_suspended(&self, tab_id: TabId) -> bool;
    fn suspended_ids(&self) -> Vec<TabId>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory registry keyed by tab id.
#[derive(Debug, Default)]
pub struct TabRegistry {
    records: BTreeMap<TabId, TabRecord>,
    codec: PlaceholderCodec,
}

impl TabRegistry {
    pub fn new(codec: PlaceholderCodec) -> Self {
        Self {
            records: BTreeMap::new(),
            codec,
        }
    }
}

impl TabRegistryTrait for TabRegistry {
    fn upsert_on_navigation(
        &mut self,
        tab_id: TabId,
        url: &str,
        title: &str,
        now: i64,
    ) -> NavigationOutcome {
        match self.codec.classify(url) {
            UrlKind::Internal => NavigationOutcome::Ignored,
            UrlKind::Placeholder => match self.records.get_mut(&tab_id) {
                Some(record) => {
                    record.current_url = url.to_string();
                    let own_suspend = record.awaiting_placeholder_load;
                    record.awaiting_placeholder_load = false;
                    NavigationOutcome::PlaceholderLoaded { own_suspend }
                }
                None => {
                    // First sight of a tab already showing the placeholder.
                    self.adopt_placeholder(tab_id, url, now);
                    NavigationOutcome::PlaceholderLoaded { own_suspend: false }
                }
            },
            UrlKind::Normal => {
                let was_suspended = self.is_suspended(tab_id);
                self.records
                    .insert(tab_id, TabRecord::tracking(tab_id, url, title, now));
                if was_suspended {
                    NavigationOutcome::ImplicitlyRestored
                } else {
                    NavigationOutcome::Tracked
                }
            }
        }
    }

    /// Creates a record for a tab seen during enumeration. Existing records are left
    /// untouched. Returns whether a record was created.
    fn seed(&mut self, tab: &TabSnapshot, now: i64) -> bool {
        if self.records.contains_key(&tab.id) {
            return false;
        }
        match self.codec.classify(&tab.url) {
            UrlKind::Internal => false,
            UrlKind::Placeholder => self.adopt_placeholder(tab.id, &tab.url, now),
            UrlKind::Normal => {
                let last_active = tab.last_accessed.unwrap_or(now);
                self.records.insert(
                    tab.id,
                    TabRecord::tracking(tab.id, &tab.url, &tab.title, last_active),
                );
                true
            }
        }
    }

    /// Rebuilds a suspended record from a placeholder address the host is already
    /// showing. A record that is already suspended keeps its original identity.
    fn adopt_placeholder(&mut self, tab_id: TabId, url: &str, now: i64) -> bool {
        if self.is_suspended(tab_id) {
            return false;
        }
        let Some(reference) = self.codec.decode(url) else {
            return false;
        };
        self.records.insert(
            tab_id,
            TabRecord {
                tab_id,
                original_url: reference.original_url,
                original_title: reference.original_title,
                current_url: url.to_string(),
                is_suspended: true,
                last_active: now,
                awaiting_placeholder_load: false,
            },
        );
        true
    }

    fn mark_suspended(
        &mut self,
        tab_id: TabId,
        original_url: &str,
        original_title: &str,
        placeholder_url: &str,
        now: i64,
    ) {
        self.records.insert(
            tab_id,
            TabRecord {
                tab_id,
                original_url: original_url.to_string(),
                original_title: original_title.to_string(),
                current_url: placeholder_url.to_string(),
                is_suspended: true,
                last_active: now,
                awaiting_placeholder_load: true,
            },
        );
    }

    fn mark_restored(&mut self, tab_id: TabId, now: i64) -> bool {
        match self.records.get_mut(&tab_id) {
            Some(record) if record.is_suspended => {
                record.is_suspended = false;
                record.current_url = record.original_url.clone();
                record.last_active = now;
                record.awaiting_placeholder_load = false;
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, tab_id: TabId) -> Option<TabRecord> {
        self.records.remove(&tab_id)
    }

    fn get(&self, tab_id: TabId) -> Option<&TabRecord> {
        self.records.get(&tab_id)
    }

    fn get_all(&self) -> Vec<&TabRecord> {
        self.records.values().collect()
    }

    fn is_suspended(&self, tab_id: TabId) -> bool {
        self.records
            .get(&tab_id)
            .map(|r| r.is_suspended)
            .unwrap_or(false)
    }

    fn suspended_ids(&self) -> Vec<TabId> {
        self.records
            .values()
            .filter(|r| r.is_suspended)
            .map(|r| r.tab_id)
            .collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
