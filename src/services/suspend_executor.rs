//! Suspend/Restore Executor.
//!
//! Performs the state transitions: navigates a tab to or from its placeholder and then
//! commits the matching registry update. The registry is only written after the host
//! call resolves successfully, so a failed navigation leaves the pre-call state intact.
//! A per-tab in-flight map keeps two transitions of the same tab from overlapping and
//! remembers when the host removed a tab mid-transition, so the commit is dropped.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::managers::activity_tracker::{ActivityTracker, ActivityTrackerTrait};
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::platform::clock::Clock;
use crate::platform::host::TabHost;
use crate::services::placeholder::PlaceholderCodec;
use crate::types::errors::{HostError, InvalidTargetReason, SuspendError};
use crate::types::placeholder::UrlKind;
use crate::types::suspension::{BulkReport, RestoreOptions, SuspendOutcome};
use crate::types::tab::{TabId, TabSnapshot};

pub(crate) fn relock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Tabs with a transition in flight, mapped to whether the tab was removed meanwhile.
type InFlight = Mutex<HashMap<TabId, bool>>;

/// Removes the tab from the in-flight map when the transition settles.
struct TransitionGuard<'a> {
    in_flight: &'a InFlight,
    tab_id: TabId,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        relock(self.in_flight).remove(&self.tab_id);
    }
}

pub struct SuspendExecutor<H: TabHost> {
    host: Arc<H>,
    registry: Arc<Mutex<TabRegistry>>,
    activity: Arc<Mutex<ActivityTracker>>,
    codec: PlaceholderCodec,
    clock: Arc<dyn Clock>,
    in_flight: InFlight,
}

impl<H: TabHost> SuspendExecutor<H> {
    pub fn new(
        host: Arc<H>,
        registry: Arc<Mutex<TabRegistry>>,
        activity: Arc<Mutex<ActivityTracker>>,
        codec: PlaceholderCodec,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            host,
            registry,
            activity,
            codec,
            clock,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn registry(&self) -> &Arc<Mutex<TabRegistry>> {
        &self.registry
    }

    pub fn activity(&self) -> &Arc<Mutex<ActivityTracker>> {
        &self.activity
    }

    pub fn codec(&self) -> &PlaceholderCodec {
        &self.codec
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn begin(&self, tab_id: TabId) -> Option<TransitionGuard<'_>> {
        match relock(&self.in_flight).entry(tab_id) {
            Entry::Occupied(_) => return None,
            Entry::Vacant(slot) => {
                slot.insert(false);
            }
        }
        Some(TransitionGuard {
            in_flight: &self.in_flight,
            tab_id,
        })
    }

    /// Drops all state for a tab the host closed. A transition still in flight for it
    /// will not commit.
    pub fn forget(&self, tab_id: TabId) {
        let mut registry = relock(&self.registry);
        registry.remove(tab_id);
        relock(&self.activity).forget(tab_id);
        if let Some(removed) = relock(&self.in_flight).get_mut(&tab_id) {
            *removed = true;
        }
    }

    /// Applies the registry side of a transition, unless the tab was removed while the
    /// host call was pending.
    fn commit(
        &self,
        tab_id: TabId,
        update: impl FnOnce(&mut TabRegistry, &mut ActivityTracker),
    ) -> Result<(), SuspendError> {
        let mut registry = relock(&self.registry);
        let removed = relock(&self.in_flight).get(&tab_id).copied().unwrap_or(false);
        if removed {
            return Err(Self::invalid(tab_id, InvalidTargetReason::TabGone));
        }
        let mut activity = relock(&self.activity);
        update(&mut *registry, &mut *activity);
        Ok(())
    }

    fn invalid(tab_id: TabId, reason: InvalidTargetReason) -> SuspendError {
        debug!(tab_id, %reason, "suspend refused");
        SuspendError::InvalidTarget { tab_id, reason }
    }

    fn host_failed(tab_id: TabId, e: HostError) -> SuspendError {
        warn!(tab_id, error = %e, "host call failed");
        SuspendError::HostCallFailed {
            tab_id,
            message: e.to_string(),
        }
    }

    /// Replaces the tab's content with the placeholder.
    ///
    /// A tab already on the placeholder is reported as `AlreadySuspended` without
    /// navigating; its original identity is kept, or rebuilt from the address when the
    /// registry has no suspended record for it.
    pub async fn suspend(&self, tab_id: TabId) -> Result<SuspendOutcome, SuspendError> {
        let _guard = self
            .begin(tab_id)
            .ok_or_else(|| Self::invalid(tab_id, InvalidTargetReason::TransitionInFlight))?;

        let tab = match self.host.get_tab(tab_id).await {
            Ok(Some(tab)) => tab,
            Ok(None) | Err(HostError::TabNotFound(_)) => {
                return Err(Self::invalid(tab_id, InvalidTargetReason::TabGone))
            }
            Err(e) => return Err(Self::host_failed(tab_id, e)),
        };

        match self.codec.classify(&tab.url) {
            UrlKind::Placeholder => {
                let now = self.now_ms();
                self.commit(tab_id, |registry, _| {
                    registry.adopt_placeholder(tab_id, &tab.url, now);
                })?;
                debug!(tab_id, "tab already shows the placeholder");
                return Ok(SuspendOutcome::AlreadySuspended);
            }
            UrlKind::Internal => {
                return Err(Self::invalid(tab_id, InvalidTargetReason::InternalUrl))
            }
            UrlKind::Normal => {}
        }
        if tab.pinned {
            return Err(Self::invalid(tab_id, InvalidTargetReason::Pinned));
        }

        // Identity is taken from the live tab so a late redirect or title change counts.
        let placeholder_url = self.codec.encode(&tab.url, &tab.title);
        self.host
            .navigate(tab_id, &placeholder_url, false)
            .await
            .map_err(|e| Self::host_failed(tab_id, e))?;

        let now = self.now_ms();
        self.commit(tab_id, |registry, activity| {
            registry.mark_suspended(tab_id, &tab.url, &tab.title, &placeholder_url, now);
            activity.record_activity(tab_id, now);
        })?;
        info!(tab_id, url = %tab.url, "tab suspended");
        Ok(SuspendOutcome::Suspended)
    }

    /// Navigates a suspended tab back to its original address.
    pub async fn restore(&self, tab_id: TabId, options: RestoreOptions) -> Result<(), SuspendError> {
        let _guard = self
            .begin(tab_id)
            .ok_or_else(|| Self::invalid(tab_id, InvalidTargetReason::TransitionInFlight))?;

        let original_url = relock(&self.registry)
            .get(tab_id)
            .filter(|r| r.is_suspended && !r.original_url.is_empty())
            .map(|r| r.original_url.clone())
            .ok_or(SuspendError::NotSuspended(tab_id))?;

        self.host
            .navigate(tab_id, &original_url, options.make_active)
            .await
            .map_err(|e| Self::host_failed(tab_id, e))?;

        let now = self.now_ms();
        self.commit(tab_id, |registry, activity| {
            registry.mark_restored(tab_id, now);
            activity.record_activity(tab_id, now);
        })?;
        info!(tab_id, url = %original_url, make_active = options.make_active, "tab restored");
        Ok(())
    }

    pub async fn suspend_many(&self, tab_ids: &[TabId]) -> BulkReport {
        let mut report = BulkReport::default();
        for &tab_id in tab_ids {
            report.record(tab_id, self.suspend(tab_id).await);
        }
        report
    }

    pub async fn restore_many(&self, tab_ids: &[TabId], options: RestoreOptions) -> BulkReport {
        let mut report = BulkReport::default();
        for &tab_id in tab_ids {
            report.record(tab_id, self.restore(tab_id, options).await);
        }
        report
    }

    /// Suspends every unpinned normal tab, optionally sparing one.
    pub async fn suspend_all(&self, except: Option<TabId>) -> Result<BulkReport, HostError> {
        let tabs = self.host.query_tabs().await?;
        let targets: Vec<TabId> = tabs
            .iter()
            .filter(|t| Some(t.id) != except && self.is_bulk_target(t))
            .map(|t| t.id)
            .collect();
        let report = self.suspend_many(&targets).await;
        info!(
            suspended = report.succeeded.len(),
            failed = report.failed.len(),
            "bulk suspend finished"
        );
        Ok(report)
    }

    /// Restores every live tab the registry holds as suspended.
    pub async fn restore_all(&self) -> Result<BulkReport, HostError> {
        let live: HashSet<TabId> = self
            .host
            .query_tabs()
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let targets: Vec<TabId> = relock(&self.registry)
            .suspended_ids()
            .into_iter()
            .filter(|id| live.contains(id))
            .collect();
        let report = self.restore_many(&targets, RestoreOptions::default()).await;
        info!(
            restored = report.succeeded.len(),
            failed = report.failed.len(),
            "bulk restore finished"
        );
        Ok(report)
    }

    fn is_bulk_target(&self, tab: &TabSnapshot) -> bool {
        !tab.pinned && self.codec.classify(&tab.url) == UrlKind::Normal
    }
}
