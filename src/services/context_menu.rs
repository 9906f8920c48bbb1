//! The "Suspend This Tab" context menu entry.

use tracing::debug;

use crate::platform::host::TabHost;
use crate::types::command::ContextMenuItem;
use crate::types::errors::HostError;

pub const CONTEXT_MENU_ID: &str = "suspendCurrentTab";
pub const CONTEXT_MENU_TITLE: &str = "Suspend This Tab";

pub fn suspend_menu_item() -> ContextMenuItem {
    ContextMenuItem {
        id: CONTEXT_MENU_ID.to_string(),
        title: CONTEXT_MENU_TITLE.to_string(),
        contexts: vec!["page".to_string(), "tab_strip".to_string()],
    }
}

/// Shows or removes the entry to match the `addContextMenu` setting.
pub async fn sync_context_menu<H: TabHost + ?Sized>(
    host: &H,
    enabled: bool,
) -> Result<(), HostError> {
    let item = enabled.then(suspend_menu_item);
    host.set_context_menu(item.as_ref()).await?;
    debug!(enabled, "context menu synced");
    Ok(())
}
