use serde::{Deserialize, Serialize};

use super::tab::{TabId, TabSnapshot, WindowId};

/// Lifecycle notifications delivered by the tab-hosting environment.
///
/// Events are processed one at a time, in delivery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    /// Full list of open tabs, sent once on connect and whenever the host resyncs.
    Synced { tabs: Vec<TabSnapshot> },
    Created { tab: TabSnapshot },
    Activated {
        tab_id: TabId,
        #[serde(default)]
        window_id: WindowId,
    },
    /// Metadata change that is not a completed load (pinned, audible, title...).
    Updated { tab: TabSnapshot },
    /// A load finished; `tab.url` is the address now displayed.
    NavigationCompleted { tab: TabSnapshot },
    Removed { tab_id: TabId },
    /// Power/network status pushed by the host, for probes that mirror it.
    StatusChanged {
        #[serde(default)]
        online: Option<bool>,
        #[serde(default)]
        power_connected: Option<bool>,
    },
}
