use serde::{Deserialize, Serialize};

use super::errors::SettingsError;

/// User configuration for the suspender.
///
/// Every field falls back to its default when missing, so a partially written
/// store merges with the built-in values on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SuspenderSettings {
    pub inactivity_time_value: u64,
    pub inactivity_time_unit: TimeUnit,
    pub never_suspend_pinned: bool,
    pub never_suspend_active_in_window: bool,
    pub never_suspend_audio: bool,
    pub never_suspend_offline: bool,
    pub never_suspend_power_connected: bool,
    pub auto_unsuspend_on_view: bool,
    pub add_context_menu: bool,
    /// Master switch for the periodic sweep. Manual suspend/restore ignore it.
    pub auto_suspend_enabled: bool,
    pub excluded_urls: Vec<String>,
    pub theme: ThemeMode,
}

impl Default for SuspenderSettings {
    fn default() -> Self {
        Self {
            inactivity_time_value: 15,
            inactivity_time_unit: TimeUnit::Minutes,
            never_suspend_pinned: true,
            never_suspend_active_in_window: true,
            never_suspend_audio: true,
            never_suspend_offline: false,
            never_suspend_power_connected: false,
            auto_unsuspend_on_view: true,
            add_context_menu: true,
            auto_suspend_enabled: true,
            excluded_urls: Vec::new(),
            theme: ThemeMode::Light,
        }
    }
}

impl SuspenderSettings {
    /// Inactivity threshold normalized to milliseconds.
    pub fn inactivity_threshold_ms(&self) -> i64 {
        let ms = self
            .inactivity_time_value
            .saturating_mul(self.inactivity_time_unit.millis());
        i64::try_from(ms).unwrap_or(i64::MAX)
    }

    /// Trims excluded URL patterns and drops blank entries.
    pub fn normalized(mut self) -> Self {
        self.excluded_urls = self
            .excluded_urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        self
    }

    /// Rejects values the options page would refuse to save.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.inactivity_time_value < 1 {
            return Err(SettingsError::InvalidValue(
                "inactivityTimeValue must be 1 or more".to_string(),
            ));
        }
        Ok(())
    }
}

/// Unit of the inactivity threshold. Unrecognized units read as minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "&'static str")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    pub fn millis(self) -> u64 {
        match self {
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        }
    }
}

impl From<String> for TimeUnit {
    fn from(value: String) -> Self {
        match value.as_str() {
            "seconds" => TimeUnit::Seconds,
            "hours" => TimeUnit::Hours,
            _ => TimeUnit::Minutes,
        }
    }
}

impl From<TimeUnit> for &'static str {
    fn from(unit: TimeUnit) -> Self {
        unit.as_str()
    }
}

/// Presentation theme for the popup, options and placeholder pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}
