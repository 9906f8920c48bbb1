//! Mirrored host for the stdio bridge.
//!
//! The extension shell forwards its tab list and lifecycle events as JSON lines. This
//! host keeps a mirror of those tabs to answer queries, and writes navigation and
//! context-menu instructions back to the shell as `{"event": ...}` lines.
//! An instruction counts as delivered once the line is flushed.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::platform::host::{StatusProbe, TabHost};
use crate::types::command::ContextMenuItem;
use crate::types::errors::HostError;
use crate::types::event::HostEvent;
use crate::types::suspension::EnvironmentStatus;
use crate::types::tab::{TabId, TabSnapshot, WindowId};

pub struct StdioHost {
    tabs: Mutex<BTreeMap<TabId, TabSnapshot>>,
    focused_window: Mutex<Option<WindowId>>,
    status: Mutex<EnvironmentStatus>,
    out: Mutex<Box<dyn Write + Send>>,
}

fn relock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StdioHost {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            tabs: Mutex::new(BTreeMap::new()),
            focused_window: Mutex::new(None),
            status: Mutex::new(EnvironmentStatus::default()),
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Number of tabs currently mirrored.
    pub fn tab_count(&self) -> usize {
        relock(&self.tabs).len()
    }

    /// Writes one JSON line to the shell.
    pub fn emit(&self, message: &Value) -> Result<(), HostError> {
        let mut out = relock(&self.out);
        writeln!(out, "{}", message)
            .and_then(|_| out.flush())
            .map_err(|e| HostError::Unavailable(format!("stdout write failed: {}", e)))
    }

    fn activate(tabs: &mut BTreeMap<TabId, TabSnapshot>, tab_id: TabId) -> Option<WindowId> {
        let window_id = tabs.get(&tab_id)?.window_id;
        for tab in tabs.values_mut().filter(|t| t.window_id == window_id) {
            tab.active = tab.id == tab_id;
        }
        Some(window_id)
    }
}

#[async_trait]
impl TabHost for StdioHost {
    async fn query_tabs(&self) -> Result<Vec<TabSnapshot>, HostError> {
        Ok(relock(&self.tabs).values().cloned().collect())
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<Option<TabSnapshot>, HostError> {
        Ok(relock(&self.tabs).get(&tab_id).cloned())
    }

    async fn current_tab(&self) -> Result<Option<TabSnapshot>, HostError> {
        let focused = *relock(&self.focused_window);
        let tabs = relock(&self.tabs);
        let in_focus = tabs
            .values()
            .find(|t| t.active && Some(t.window_id) == focused);
        Ok(in_focus
            .or_else(|| tabs.values().find(|t| t.active))
            .cloned())
    }

    async fn navigate(&self, tab_id: TabId, url: &str, make_active: bool) -> Result<(), HostError> {
        {
            let tabs = relock(&self.tabs);
            if !tabs.contains_key(&tab_id) {
                return Err(HostError::TabNotFound(tab_id));
            }
        }
        self.emit(&json!({
            "event": "navigate",
            "tabId": tab_id,
            "url": url,
            "active": make_active,
        }))?;

        let mut tabs = relock(&self.tabs);
        if let Some(tab) = tabs.get_mut(&tab_id) {
            tab.url = url.to_string();
        }
        if make_active {
            if let Some(window_id) = Self::activate(&mut tabs, tab_id) {
                *relock(&self.focused_window) = Some(window_id);
            }
        }
        Ok(())
    }

    async fn set_context_menu(&self, item: Option<&ContextMenuItem>) -> Result<(), HostError> {
        self.emit(&json!({ "event": "contextMenu", "item": item }))
    }

    fn observe(&self, event: &HostEvent) {
        let mut tabs = relock(&self.tabs);
        match event {
            HostEvent::Synced { tabs: all } => {
                *tabs = all.iter().map(|t| (t.id, t.clone())).collect();
                if let Some(active) = all.iter().find(|t| t.active) {
                    relock(&self.focused_window).get_or_insert(active.window_id);
                }
            }
            HostEvent::Created { tab }
            | HostEvent::Updated { tab }
            | HostEvent::NavigationCompleted { tab } => {
                tabs.insert(tab.id, tab.clone());
            }
            HostEvent::Activated { tab_id, window_id } => {
                if let Some(tab) = tabs.get_mut(tab_id) {
                    tab.window_id = *window_id;
                }
                Self::activate(&mut tabs, *tab_id);
                *relock(&self.focused_window) = Some(*window_id);
            }
            HostEvent::Removed { tab_id } => {
                tabs.remove(tab_id);
            }
            HostEvent::StatusChanged {
                online,
                power_connected,
            } => {
                let mut status = relock(&self.status);
                if let Some(online) = online {
                    status.offline = !online;
                }
                if let Some(power) = power_connected {
                    status.power_connected = *power;
                }
            }
        }
    }
}

#[async_trait]
impl StatusProbe for StdioHost {
    async fn is_offline(&self) -> Result<bool, HostError> {
        Ok(relock(&self.status).offline)
    }

    async fn is_power_connected(&self) -> Result<bool, HostError> {
        Ok(relock(&self.status).power_connected)
    }
}
