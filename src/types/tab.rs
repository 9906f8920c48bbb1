use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier. Unique among live tabs, recycled after removal.
pub type TabId = i64;

/// Stand-in id for "no tab", as used by context-menu clicks outside any tab.
pub const TAB_ID_NONE: TabId = -1;

/// Host-assigned window identifier.
pub type WindowId = i64;

/// A tab as currently reported by the host environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: TabId,
    #[serde(default)]
    pub window_id: WindowId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    /// Foreground tab of its own window.
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub audible: bool,
    /// Last-accessed metadata in epoch milliseconds, when the host exposes it.
    #[serde(default)]
    pub last_accessed: Option<i64>,
}

/// Suspension state the registry keeps for one tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub tab_id: TabId,
    pub original_url: String,
    pub original_title: String,
    pub current_url: String,
    pub is_suspended: bool,
    pub last_active: i64,
    /// Set while the placeholder load triggered by our own suspend has not completed yet.
    #[serde(skip)]
    pub awaiting_placeholder_load: bool,
}

impl TabRecord {
    /// A fresh, non-suspended record for a tab showing `url`.
    pub fn tracking(tab_id: TabId, url: &str, title: &str, now: i64) -> Self {
        Self {
            tab_id,
            original_url: url.to_string(),
            original_title: title.to_string(),
            current_url: url.to_string(),
            is_suspended: false,
            last_active: now,
            awaiting_placeholder_load: false,
        }
    }
}
