//! App Core for the tab suspender.
//!
//! Central struct wiring the registry, activity tracker, settings, executor and
//! scheduler together. Host events, user commands and settings changes all enter here.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::managers::activity_tracker::{ActivityTracker, ActivityTrackerTrait};
use crate::managers::command_manager::CommandManager;
use crate::managers::tab_registry::{NavigationOutcome, TabRegistry, TabRegistryTrait};
use crate::platform::clock::{Clock, SystemClock};
use crate::platform::host::{StatusProbe, TabHost};
use crate::services::context_menu::sync_context_menu;
use crate::services::placeholder::PlaceholderCodec;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait, SettingsSnapshot};
use crate::services::suspend_executor::{relock, SuspendExecutor};
use crate::services::suspension_scheduler::SuspensionScheduler;
use crate::types::command::UserCommand;
use crate::types::errors::{HostError, InvalidTargetReason, SettingsError, SuspendError};
use crate::types::event::HostEvent;
use crate::types::placeholder::{PlaceholderPage, UrlKind};
use crate::types::suspension::{BulkReport, RestoreOptions, SuspendOutcome};
use crate::types::tab::{TabId, TabRecord, TAB_ID_NONE};

/// What handling one host event changed.
#[derive(Debug, Clone, PartialEq)]
pub enum EventEffect {
    /// Nothing to record for this event.
    Ignored,
    /// Activity and/or the tab's identity were updated.
    Recorded,
    /// Tabs seen for the first time were added to the registry.
    Seeded { created: usize },
    /// A suspended tab was restored because the user viewed it.
    AutoRestored(TabId),
    /// The user navigated a suspended tab away from the placeholder.
    ImplicitlyRestored(TabId),
    /// Auto-restore was attempted and failed; the tab stays suspended.
    AutoRestoreFailed(SuspendError),
    /// The tab was closed and its state dropped.
    Forgotten(TabId),
}

/// Central application struct holding all managers and services.
pub struct App<H: TabHost + 'static> {
    pub host: Arc<H>,
    pub executor: Arc<SuspendExecutor<H>>,
    pub scheduler: Arc<SuspensionScheduler<H>>,
    pub settings_engine: Mutex<SettingsEngine>,
    pub command_manager: Mutex<CommandManager>,
    settings: watch::Receiver<SettingsSnapshot>,
}

impl<H: TabHost + 'static> App<H> {
    /// Creates an App with the default placeholder base and the system clock.
    pub fn new(host: Arc<H>, probe: Arc<dyn StatusProbe>, settings_engine: SettingsEngine) -> Self {
        Self::with_parts(
            host,
            probe,
            settings_engine,
            PlaceholderCodec::default(),
            Arc::new(SystemClock),
        )
    }

    pub fn with_parts(
        host: Arc<H>,
        probe: Arc<dyn StatusProbe>,
        settings_engine: SettingsEngine,
        codec: PlaceholderCodec,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry = Arc::new(Mutex::new(TabRegistry::new(codec.clone())));
        let activity = Arc::new(Mutex::new(ActivityTracker::new()));
        let executor = Arc::new(SuspendExecutor::new(
            Arc::clone(&host),
            registry,
            activity,
            codec,
            clock,
        ));
        let settings = settings_engine.subscribe();
        let scheduler = Arc::new(SuspensionScheduler::new(
            Arc::clone(&executor),
            settings_engine.subscribe(),
            probe,
        ));

        Self {
            host,
            executor,
            scheduler,
            settings_engine: Mutex::new(settings_engine),
            command_manager: Mutex::new(CommandManager::new()),
            settings,
        }
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> SettingsSnapshot {
        self.settings.borrow().clone()
    }

    /// Startup sequence: load settings, sync the context menu, seed the registry from
    /// the tabs already open. Returns how many records were seeded.
    pub async fn startup(&self) -> usize {
        let settings = relock(&self.settings_engine).load_or_default();
        if let Err(e) = sync_context_menu(self.host.as_ref(), settings.add_context_menu).await {
            warn!(error = %e, "context menu sync failed");
        }

        match self.host.query_tabs().await {
            Ok(tabs) => {
                let now = self.executor.now_ms();
                let mut registry = relock(self.executor.registry());
                let created = tabs.iter().filter(|t| registry.seed(t, now)).count();
                info!(tabs = tabs.len(), seeded = created, "startup enumeration done");
                created
            }
            Err(e) => {
                warn!(error = %e, "startup enumeration failed");
                0
            }
        }
    }

    /// Shutdown sequence: stop the sweep timer.
    pub fn shutdown(&self) {
        self.scheduler.disarm();
    }

    // ─── Host events ───

    /// Handles one lifecycle event. Callers deliver events one at a time, in order.
    pub async fn handle_event(&self, event: HostEvent) -> EventEffect {
        self.host.observe(&event);
        let now = self.executor.now_ms();

        match event {
            HostEvent::Synced { tabs } => {
                let mut registry = relock(self.executor.registry());
                let created = tabs.iter().filter(|t| registry.seed(t, now)).count();
                debug!(tabs = tabs.len(), created, "tabs synced");
                EventEffect::Seeded { created }
            }
            HostEvent::Created { tab } => {
                relock(self.executor.registry()).seed(&tab, now);
                if self.executor.codec().classify(&tab.url) != UrlKind::Normal {
                    return EventEffect::Ignored;
                }
                relock(self.executor.activity()).record_activity(tab.id, now);
                EventEffect::Recorded
            }
            HostEvent::Activated { tab_id, .. } => {
                let suspended = relock(self.executor.registry()).is_suspended(tab_id);
                if suspended {
                    if self.settings().auto_unsuspend_on_view {
                        return self.auto_restore(tab_id).await;
                    }
                    return EventEffect::Ignored;
                }
                match self.host.get_tab(tab_id).await {
                    Ok(Some(tab)) if self.executor.codec().classify(&tab.url) == UrlKind::Normal => {
                        relock(self.executor.activity()).record_activity(tab_id, now);
                        EventEffect::Recorded
                    }
                    Ok(_) => EventEffect::Ignored,
                    Err(e) => {
                        debug!(tab_id, error = %e, "activated tab lookup failed");
                        EventEffect::Ignored
                    }
                }
            }
            HostEvent::Updated { .. } | HostEvent::StatusChanged { .. } => EventEffect::Ignored,
            HostEvent::NavigationCompleted { tab } => {
                let outcome = relock(self.executor.registry())
                    .upsert_on_navigation(tab.id, &tab.url, &tab.title, now);
                match outcome {
                    NavigationOutcome::Ignored => EventEffect::Ignored,
                    NavigationOutcome::Tracked => {
                        relock(self.executor.activity()).record_activity(tab.id, now);
                        EventEffect::Recorded
                    }
                    NavigationOutcome::ImplicitlyRestored => {
                        relock(self.executor.activity()).record_activity(tab.id, now);
                        info!(tab_id = tab.id, url = %tab.url, "tab left the placeholder");
                        EventEffect::ImplicitlyRestored(tab.id)
                    }
                    NavigationOutcome::PlaceholderLoaded { own_suspend } => {
                        if !own_suspend && tab.active && self.settings().auto_unsuspend_on_view {
                            self.auto_restore(tab.id).await
                        } else {
                            EventEffect::Ignored
                        }
                    }
                }
            }
            HostEvent::Removed { tab_id } => {
                self.executor.forget(tab_id);
                EventEffect::Forgotten(tab_id)
            }
        }
    }

    async fn auto_restore(&self, tab_id: TabId) -> EventEffect {
        let options = RestoreOptions { make_active: true };
        match self.executor.restore(tab_id, options).await {
            Ok(()) => EventEffect::AutoRestored(tab_id),
            Err(e) => {
                warn!(tab_id, error = %e, "auto-restore failed");
                EventEffect::AutoRestoreFailed(e)
            }
        }
    }

    // ─── Manual actions ───

    pub async fn suspend_tab(&self, tab_id: TabId) -> Result<SuspendOutcome, SuspendError> {
        self.executor.suspend(tab_id).await
    }

    pub async fn restore_tab(&self, tab_id: TabId, make_active: bool) -> Result<(), SuspendError> {
        self.executor
            .restore(tab_id, RestoreOptions { make_active })
            .await
    }

    pub async fn run_command(&self, command: UserCommand) -> Result<BulkReport, HostError> {
        debug!(command = command.as_str(), "running command");
        match command {
            UserCommand::SuspendCurrentTab => {
                let mut report = BulkReport::default();
                if let Some(tab) = self.host.current_tab().await? {
                    report.record(tab.id, self.executor.suspend(tab.id).await);
                }
                Ok(report)
            }
            UserCommand::SuspendAllTabs => self.executor.suspend_all(None).await,
            UserCommand::SuspendAllButCurrentTab => {
                let current = self.host.current_tab().await?.map(|t| t.id);
                self.executor.suspend_all(current).await
            }
            UserCommand::UnsuspendAllTabs => self.executor.restore_all().await,
        }
    }

    /// Suspends the tab the context menu was opened on, or the current tab when the
    /// click carried no tab.
    pub async fn context_menu_clicked(
        &self,
        tab_id: Option<TabId>,
    ) -> Result<SuspendOutcome, SuspendError> {
        let target = match tab_id.filter(|id| *id != TAB_ID_NONE) {
            Some(id) => Some(id),
            None => self
                .host
                .current_tab()
                .await
                .map_err(|e| SuspendError::HostCallFailed {
                    tab_id: TAB_ID_NONE,
                    message: e.to_string(),
                })?
                .map(|t| t.id),
        };
        let tab_id = target.ok_or(SuspendError::InvalidTarget {
            tab_id: TAB_ID_NONE,
            reason: InvalidTargetReason::TabGone,
        })?;
        self.executor.suspend(tab_id).await
    }

    // ─── Settings ───

    /// Applies an external change notification. The menu follows `addContextMenu`.
    pub async fn apply_settings_changes(
        &self,
        changes: &Map<String, Value>,
    ) -> Result<SettingsSnapshot, SettingsError> {
        let before = self.settings();
        let after = relock(&self.settings_engine).apply_changes(changes)?;
        self.settings_changed(&before, &after).await;
        Ok(after)
    }

    /// Sets and persists one key.
    pub async fn set_setting(&self, key: &str, value: Value) -> Result<SettingsSnapshot, SettingsError> {
        let before = self.settings();
        let after = relock(&self.settings_engine).set_value(key, value)?;
        self.settings_changed(&before, &after).await;
        Ok(after)
    }

    pub async fn reset_settings(&self) -> Result<SettingsSnapshot, SettingsError> {
        let before = self.settings();
        let after = {
            let mut engine = relock(&self.settings_engine);
            engine.reset()?;
            engine.get_settings()
        };
        self.settings_changed(&before, &after).await;
        Ok(after)
    }

    async fn settings_changed(&self, before: &SettingsSnapshot, after: &SettingsSnapshot) {
        info!(
            auto_suspend = after.auto_suspend_enabled,
            threshold_ms = after.inactivity_threshold_ms(),
            "settings updated"
        );
        if before.add_context_menu != after.add_context_menu {
            if let Err(e) = sync_context_menu(self.host.as_ref(), after.add_context_menu).await {
                warn!(error = %e, "context menu sync failed");
            }
        }
    }

    // ─── Queries ───

    /// Every registry record, ordered by tab id.
    pub fn tab_data(&self) -> Vec<TabRecord> {
        relock(self.executor.registry())
            .get_all()
            .into_iter()
            .cloned()
            .collect()
    }

    /// What the placeholder page at `url` should show.
    pub fn describe_placeholder(&self, url: &str) -> Option<PlaceholderPage> {
        let reference = self.executor.codec().decode(url)?;
        Some(PlaceholderPage {
            original_url: reference.original_url,
            original_title: reference.original_title,
            theme: self.settings().theme,
        })
    }
}
