use serde::Serialize;

use super::errors::SuspendError;
use super::tab::TabId;

/// Result of the policy evaluator for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Suspend,
    Keep(KeepReason),
}

impl Verdict {
    pub fn is_suspend(self) -> bool {
        matches!(self, Verdict::Suspend)
    }
}

/// First exclusion rule that matched, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    InternalUrl,
    Placeholder,
    Pinned,
    ActiveInWindow,
    Audible,
    Offline,
    PowerConnected,
    ExcludedUrl,
    RecentlyActive,
}

/// Power/network status sampled once per sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentStatus {
    pub offline: bool,
    pub power_connected: bool,
}

/// Successful suspend outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendOutcome {
    /// The tab was navigated to the placeholder.
    Suspended,
    /// The tab was already showing the placeholder; nothing was changed on the host.
    AlreadySuspended,
}

/// Options for a restore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Bring the tab to the foreground while restoring.
    pub make_active: bool,
}

/// Per-item results of a bulk operation.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub succeeded: Vec<TabId>,
    pub failed: Vec<(TabId, SuspendError)>,
}

impl BulkReport {
    pub fn record<T>(&mut self, tab_id: TabId, result: Result<T, SuspendError>) {
        match result {
            Ok(_) => self.succeeded.push(tab_id),
            Err(e) => self.failed.push((tab_id, e)),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Counters for one completed sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub evaluated: usize,
    pub suspended: Vec<TabId>,
    pub failed: Vec<TabId>,
}

/// What a scheduler tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// A previous sweep was still in flight.
    Skipped,
    /// Auto-suspension is switched off in the settings.
    Disabled,
    /// The host could not enumerate tabs.
    HostUnavailable(String),
    Completed(SweepReport),
}
