//! Capabilities the suspension engine needs from the tab-hosting environment.
//!
//! The engine never talks to a browser directly. Everything it reads or changes goes
//! through [`TabHost`] and [`StatusProbe`], so tests can drive it with in-memory fakes
//! and the RPC binary can back it with a mirrored view of the extension shell.

use async_trait::async_trait;

use crate::types::command::ContextMenuItem;
use crate::types::errors::HostError;
use crate::types::event::HostEvent;
use crate::types::tab::{TabId, TabSnapshot};

/// Tab access and navigation.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// All live tabs across windows.
    async fn query_tabs(&self) -> Result<Vec<TabSnapshot>, HostError>;

    /// A single live tab, `None` when the host no longer knows it.
    async fn get_tab(&self, tab_id: TabId) -> Result<Option<TabSnapshot>, HostError>;

    /// Foreground tab of the focused window.
    async fn current_tab(&self) -> Result<Option<TabSnapshot>, HostError>;

    /// Point `tab_id` at `url`, optionally bringing it to the foreground.
    async fn navigate(&self, tab_id: TabId, url: &str, make_active: bool) -> Result<(), HostError>;

    /// Show `item` as the extension's context menu entry, or remove it with `None`.
    async fn set_context_menu(&self, item: Option<&ContextMenuItem>) -> Result<(), HostError>;

    /// Called for every event before the engine handles it.
    fn observe(&self, _event: &HostEvent) {}
}

/// Best-effort power and network status.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn is_offline(&self) -> Result<bool, HostError>;
    async fn is_power_connected(&self) -> Result<bool, HostError>;
}
