// Tab suspender Settings Engine
// Loads user settings merged with defaults, persists them as JSON, and publishes every
// change as a whole new snapshot so readers never see a half-applied configuration.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::SuspenderSettings;

/// Immutable settings value shared with the scheduler and the executor.
pub type SettingsSnapshot = Arc<SuspenderSettings>;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<SettingsSnapshot, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> SettingsSnapshot;
    fn set_value(&mut self, key: &str, value: Value) -> Result<SettingsSnapshot, SettingsError>;
    fn apply_changes(&mut self, changes: &Map<String, Value>)
        -> Result<SettingsSnapshot, SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn subscribe(&self) -> watch::Receiver<SettingsSnapshot>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    sender: watch::Sender<SettingsSnapshot>,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine holding the default settings.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::settings_path().to_string_lossy().to_string(),
        };
        let (sender, _) = watch::channel(Arc::new(SuspenderSettings::default()));

        Self {
            config_path,
            sender,
        }
    }

    /// Loads settings, falling back to defaults when the store is unreadable.
    pub fn load_or_default(&mut self) -> SettingsSnapshot {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.config_path, error = %e, "using default settings");
                self.get_settings()
            }
        }
    }

    /// Serializes the current snapshot, patches it, deserializes and validates it; only
    /// a fully valid result replaces it. With `strict`, an unknown key rejects the batch.
    fn patch(
        &mut self,
        changes: &Map<String, Value>,
        strict: bool,
    ) -> Result<SettingsSnapshot, SettingsError> {
        let mut json_value = serde_json::to_value(self.get_settings().as_ref()).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let Value::Object(map) = &mut json_value else {
            return Err(SettingsError::SerializationError(
                "settings did not serialize to an object".to_string(),
            ));
        };
        for (key, value) in changes {
            if !map.contains_key(key) {
                if strict {
                    return Err(SettingsError::InvalidKey(format!(
                        "Key '{}' not found in settings",
                        key
                    )));
                }
                warn!(key = %key, "ignoring unknown settings key");
                continue;
            }
            map.insert(key.clone(), value.clone());
        }

        let new_settings: SuspenderSettings = serde_json::from_value(json_value)
            .map_err(|e| SettingsError::InvalidValue(format!("{}", e)))?;
        let new_settings = new_settings.normalized();
        new_settings.validate()?;

        Ok(self.publish(new_settings))
    }

    fn publish(&self, settings: SuspenderSettings) -> SettingsSnapshot {
        let snapshot = Arc::new(settings);
        self.sender.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    fn parse(content: &str) -> Result<SuspenderSettings, SettingsError> {
        let settings: SuspenderSettings = serde_json::from_str(content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        let settings = settings.normalized();
        settings.validate()?;
        Ok(settings)
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file also
    /// installs the defaults, and reports `LoadFailed` so the caller can log it.
    fn load(&mut self) -> Result<SettingsSnapshot, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            return Ok(self.publish(SuspenderSettings::default()));
        }

        let loaded = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))
            .and_then(|content| Self::parse(&content));

        match loaded {
            Ok(settings) => {
                info!(path = %self.config_path, "settings loaded");
                Ok(self.publish(settings))
            }
            Err(e) => {
                self.publish(SuspenderSettings::default());
                Err(SettingsError::LoadFailed(e.to_string()))
            }
        }
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(self.get_settings().as_ref()).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Returns the current snapshot.
    fn get_settings(&self) -> SettingsSnapshot {
        self.sender.borrow().clone()
    }

    /// Updates one top-level key (e.g. `"neverSuspendPinned"`) and saves to disk.
    fn set_value(&mut self, key: &str, value: Value) -> Result<SettingsSnapshot, SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        let mut changes = Map::new();
        changes.insert(key.to_string(), value);
        let snapshot = self.patch(&changes, true)?;
        self.save()?;
        Ok(snapshot)
    }

    /// Applies a batch of changed keys, as delivered by a store change notification.
    /// Keys the settings do not know are logged and skipped. Nothing is written to disk.
    fn apply_changes(
        &mut self,
        changes: &Map<String, Value>,
    ) -> Result<SettingsSnapshot, SettingsError> {
        self.patch(changes, false)
    }

    /// Resets all settings to factory defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.publish(SuspenderSettings::default());
        self.save()
    }

    fn subscribe(&self) -> watch::Receiver<SettingsSnapshot> {
        self.sender.subscribe()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
