use std::fmt;

use super::tab::TabId;

// === SuspendError ===

/// Why a suspend or restore request was refused before any host call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTargetReason {
    /// The host no longer knows the tab.
    TabGone,
    /// Internal or privileged page the extension may not replace.
    InternalUrl,
    /// Pinned tabs are never suspended.
    Pinned,
    /// Another suspend or restore for the same tab has not settled yet.
    TransitionInFlight,
}

impl fmt::Display for InvalidTargetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTargetReason::TabGone => write!(f, "tab no longer exists"),
            InvalidTargetReason::InternalUrl => write!(f, "internal page"),
            InvalidTargetReason::Pinned => write!(f, "tab is pinned"),
            InvalidTargetReason::TransitionInFlight => write!(f, "transition already in flight"),
        }
    }
}

/// Errors from suspend/restore transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum SuspendError {
    /// The tab cannot be transitioned.
    InvalidTarget { tab_id: TabId, reason: InvalidTargetReason },
    /// Restore requested for a tab without a suspended record.
    NotSuspended(TabId),
    /// The host rejected the navigation.
    HostCallFailed { tab_id: TabId, message: String },
}

impl fmt::Display for SuspendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuspendError::InvalidTarget { tab_id, reason } => {
                write!(f, "Invalid target tab {}: {}", tab_id, reason)
            }
            SuspendError::NotSuspended(tab_id) => write!(f, "Tab {} is not suspended", tab_id),
            SuspendError::HostCallFailed { tab_id, message } => {
                write!(f, "Host call failed for tab {}: {}", tab_id, message)
            }
        }
    }
}

impl std::error::Error for SuspendError {}

// === SettingsError ===

/// Errors related to settings loading, validation and persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The store could not be read; defaults are in effect.
    LoadFailed(String),
    /// A file system error occurred.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The given key does not exist in the settings schema.
    InvalidKey(String),
    /// The given value is not acceptable for the key.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::LoadFailed(msg) => write!(f, "Settings load failed: {}", msg),
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

// === HostError ===

/// Errors reported by the tab-hosting environment.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The host has no tab with this ID.
    TabNotFound(TabId),
    /// The host refused the request.
    Rejected(String),
    /// The host or probe could not be reached.
    Unavailable(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::TabNotFound(id) => write!(f, "Host tab not found: {}", id),
            HostError::Rejected(msg) => write!(f, "Host rejected request: {}", msg),
            HostError::Unavailable(msg) => write!(f, "Host unavailable: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

// === CommandError ===

/// Errors related to user command bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// No command with this name exists.
    UnknownCommand(String),
    /// The key combination is already bound to another command.
    Conflict(String),
    /// The provided key combination is invalid.
    InvalidKeys(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => write!(f, "Unknown command: {}", name),
            CommandError::Conflict(msg) => write!(f, "Command binding conflict: {}", msg),
            CommandError::InvalidKeys(keys) => write!(f, "Invalid command keys: {}", keys),
        }
    }
}

impl std::error::Error for CommandError {}
