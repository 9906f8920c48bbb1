//! Suspension Scheduler.
//!
//! Two states, Idle and Sweeping. Each tick starts a sweep unless one is already in
//! flight, in which case the tick is skipped. A sweep reads the latest settings
//! snapshot, samples only the probes those settings need, evaluates every live tab
//! and suspends the candidates one after another. A failed suspend is logged and the
//! sweep carries on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::managers::activity_tracker::ActivityTrackerTrait;
use crate::managers::tab_registry::TabRegistryTrait;
use crate::platform::host::{StatusProbe, TabHost};
use crate::services::policy_evaluator;
use crate::services::settings_engine::SettingsSnapshot;
use crate::services::suspend_executor::{relock, SuspendExecutor};
use crate::types::settings::SuspenderSettings;
use crate::types::suspension::{EnvironmentStatus, SweepOutcome, SweepReport};
use crate::types::tab::TabId;

/// Fixed sweep period.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sweeping,
}

/// Holds the Sweeping state; dropping it returns the scheduler to Idle, also when the
/// sweep future is cancelled.
struct SweepGuard<'a>(&'a AtomicBool);

impl<'a> SweepGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SuspensionScheduler<H: TabHost> {
    executor: Arc<SuspendExecutor<H>>,
    settings: watch::Receiver<SettingsSnapshot>,
    probe: Arc<dyn StatusProbe>,
    sweeping: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<H: TabHost + 'static> SuspensionScheduler<H> {
    pub fn new(
        executor: Arc<SuspendExecutor<H>>,
        settings: watch::Receiver<SettingsSnapshot>,
        probe: Arc<dyn StatusProbe>,
    ) -> Self {
        Self {
            executor,
            settings,
            probe,
            sweeping: AtomicBool::new(false),
            timer: Mutex::new(None),
        }
    }

    pub fn executor(&self) -> &Arc<SuspendExecutor<H>> {
        &self.executor
    }

    pub fn state(&self) -> SchedulerState {
        if self.sweeping.load(Ordering::Acquire) {
            SchedulerState::Sweeping
        } else {
            SchedulerState::Idle
        }
    }

    /// Starts ticking every `period`. An already armed timer is disarmed first, so
    /// there is never more than one tick loop.
    ///
    /// A zero period is refused and leaves the current timer as it is.
    pub fn arm(self: &Arc<Self>, period: Duration) {
        if period.is_zero() {
            warn!("refusing to arm the scheduler with a zero period");
            return;
        }
        let mut timer = relock(&self.timer);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        let scheduler = Arc::clone(self);
        *timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of an interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let scheduler = Arc::clone(&scheduler);
                tokio::spawn(async move {
                    scheduler.tick().await;
                });
            }
        }));
        debug!(period_ms = period.as_millis() as u64, "scheduler armed");
    }

    pub fn disarm(&self) {
        if let Some(handle) = relock(&self.timer).take() {
            handle.abort();
            debug!("scheduler disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        relock(&self.timer)
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// One timer tick: a sweep, with its outcome logged.
    pub async fn tick(&self) -> SweepOutcome {
        let outcome = self.sweep().await;
        match &outcome {
            SweepOutcome::Skipped => debug!("previous sweep still in flight, tick skipped"),
            SweepOutcome::Disabled => debug!("auto-suspension disabled"),
            SweepOutcome::HostUnavailable(e) => warn!(error = %e, "sweep could not list tabs"),
            SweepOutcome::Completed(report) if !report.suspended.is_empty() => info!(
                evaluated = report.evaluated,
                suspended = report.suspended.len(),
                failed = report.failed.len(),
                "sweep finished"
            ),
            SweepOutcome::Completed(_) => {}
        }
        outcome
    }

    /// Runs one sweep unless another one is in flight.
    pub async fn sweep(&self) -> SweepOutcome {
        let Some(_sweeping) = SweepGuard::enter(&self.sweeping) else {
            return SweepOutcome::Skipped;
        };

        let settings: SettingsSnapshot = self.settings.borrow().clone();
        if !settings.auto_suspend_enabled {
            return SweepOutcome::Disabled;
        }

        let span = info_span!("sweep", sweep_id = %Uuid::new_v4());
        self.run_sweep(settings).instrument(span).await
    }

    async fn run_sweep(&self, settings: SettingsSnapshot) -> SweepOutcome {
        let env = self.sample_environment(&settings).await;

        let tabs = match self.executor.host().query_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => return SweepOutcome::HostUnavailable(e.to_string()),
        };

        let now = self.executor.now_ms();
        let mut report = SweepReport::default();
        let mut candidates: Vec<TabId> = Vec::new();
        {
            let mut registry = relock(self.executor.registry());
            let mut activity = relock(self.executor.activity());
            for tab in &tabs {
                report.evaluated += 1;
                registry.seed(tab, now);
                if registry.is_suspended(tab.id) {
                    continue;
                }
                let Some(last_active) = activity.get_last_active(tab.id, tab.last_accessed) else {
                    // Nothing to go on: count the tab as just activated.
                    activity.record_activity(tab.id, now);
                    continue;
                };
                if policy_evaluator::should_suspend(
                    tab,
                    last_active,
                    &settings,
                    &env,
                    self.executor.codec(),
                    now,
                ) {
                    candidates.push(tab.id);
                }
            }
        }

        for tab_id in candidates {
            // Earlier suspends awaited the host; the tab may have been viewed since.
            if !self.still_candidate(tab_id, &env).await {
                debug!(tab_id, "tab no longer idle, skipped");
                continue;
            }
            match self.executor.suspend(tab_id).await {
                Ok(_) => report.suspended.push(tab_id),
                Err(e) => {
                    warn!(tab_id, error = %e, "auto-suspend failed");
                    report.failed.push(tab_id);
                }
            }
        }
        SweepOutcome::Completed(report)
    }

    /// Re-evaluates one candidate against the live tab, its latest activity and the
    /// latest settings.
    async fn still_candidate(&self, tab_id: TabId, env: &EnvironmentStatus) -> bool {
        let tab = match self.executor.host().get_tab(tab_id).await {
            Ok(Some(tab)) => tab,
            Ok(None) => return false,
            Err(e) => {
                debug!(tab_id, error = %e, "candidate lookup failed");
                return false;
            }
        };
        let settings: SettingsSnapshot = self.settings.borrow().clone();
        if !settings.auto_suspend_enabled {
            return false;
        }
        let registry = relock(self.executor.registry());
        if registry.is_suspended(tab_id) {
            return false;
        }
        let activity = relock(self.executor.activity());
        let Some(last_active) = activity.get_last_active(tab_id, tab.last_accessed) else {
            return false;
        };
        policy_evaluator::should_suspend(
            &tab,
            last_active,
            &settings,
            env,
            self.executor.codec(),
            self.executor.now_ms(),
        )
    }

    /// Samples the probes the current rules need. A failing probe reads as
    /// online / not on power.
    async fn sample_environment(&self, settings: &SuspenderSettings) -> EnvironmentStatus {
        let mut env = EnvironmentStatus::default();
        if settings.never_suspend_offline {
            env.offline = self.probe.is_offline().await.unwrap_or_else(|e| {
                warn!(error = %e, "network probe failed");
                false
            });
        }
        if settings.never_suspend_power_connected {
            env.power_connected = self.probe.is_power_connected().await.unwrap_or_else(|e| {
                warn!(error = %e, "power probe failed");
                false
            });
        }
        env
    }
}
