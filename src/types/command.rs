use serde::{Deserialize, Serialize};

/// Keyboard-triggerable user commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserCommand {
    SuspendCurrentTab,
    SuspendAllTabs,
    SuspendAllButCurrentTab,
    UnsuspendAllTabs,
}

impl UserCommand {
    pub const ALL: [UserCommand; 4] = [
        UserCommand::SuspendCurrentTab,
        UserCommand::SuspendAllTabs,
        UserCommand::SuspendAllButCurrentTab,
        UserCommand::UnsuspendAllTabs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserCommand::SuspendCurrentTab => "suspend-current-tab",
            UserCommand::SuspendAllTabs => "suspend-all-tabs",
            UserCommand::SuspendAllButCurrentTab => "suspend-all-but-current-tab",
            UserCommand::UnsuspendAllTabs => "unsuspend-all-tabs",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// A context menu entry the host should display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextMenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<String>,
}
