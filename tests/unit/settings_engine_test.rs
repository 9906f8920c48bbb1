//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface:
//! default loading, merging partial files, validation, persistence, change
//! notifications and reset.

use serde_json::{json, Map, Value};
use tab_suspender::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tab_suspender::types::errors::SettingsError;
use tab_suspender::types::settings::{SuspenderSettings, ThemeMode, TimeUnit};
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

fn write_config(dir: &TempDir, content: &str) {
    std::fs::write(dir.path().join("settings.json"), content).unwrap();
}

fn changes(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(*settings, SuspenderSettings::default());
    assert_eq!(settings.inactivity_threshold_ms(), 15 * 60_000);
}

#[test]
fn test_partial_file_merges_with_defaults() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"inactivityTimeValue": 2, "inactivityTimeUnit": "hours"}"#);
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.inactivity_time_unit, TimeUnit::Hours);
    assert_eq!(settings.inactivity_threshold_ms(), 2 * 3_600_000);
    assert!(settings.never_suspend_pinned);
    assert!(settings.auto_unsuspend_on_view);
}

#[test]
fn test_unknown_unit_reads_as_minutes() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"inactivityTimeValue": 3, "inactivityTimeUnit": "fortnights"}"#);
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.inactivity_time_unit, TimeUnit::Minutes);
    assert_eq!(settings.inactivity_threshold_ms(), 3 * 60_000);
}

#[test]
fn test_malformed_file_reports_load_failed_and_installs_defaults() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "{ this is not json");
    let mut engine = engine_in_temp(&dir);
    engine
        .apply_changes(&changes(json!({"theme": "dark"})))
        .unwrap();

    let err = engine.load().unwrap_err();

    assert!(matches!(err, SettingsError::LoadFailed(_)));
    assert_eq!(*engine.get_settings(), SuspenderSettings::default());
}

#[test]
fn test_load_or_default_never_fails() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"inactivityTimeValue": 0}"#);
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load_or_default();

    assert_eq!(*settings, SuspenderSettings::default());
}

#[test]
fn test_set_value_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine
        .set_value("excludedUrls", json!(["  github.com ", "", "   "]))
        .unwrap();

    let mut reloaded = engine_in_temp(&dir);
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.excluded_urls, vec!["github.com".to_string()]);
}

#[test]
fn test_set_value_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine.set_value("suspendEverything", json!(true)).unwrap_err();

    assert!(matches!(err, SettingsError::InvalidKey(_)));
    assert_eq!(*engine.get_settings(), SuspenderSettings::default());
}

#[test]
fn test_set_value_rejects_empty_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    assert!(matches!(
        engine.set_value("", json!(1)),
        Err(SettingsError::InvalidKey(_))
    ));
}

#[test]
fn test_invalid_value_keeps_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine
        .apply_changes(&changes(json!({"inactivityTimeValue": 30})))
        .unwrap();

    let zero = engine.apply_changes(&changes(json!({"inactivityTimeValue": 0})));
    let wrong_type = engine.apply_changes(&changes(json!({"neverSuspendAudio": "yes"})));

    assert!(matches!(zero, Err(SettingsError::InvalidValue(_))));
    assert!(matches!(wrong_type, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().inactivity_time_value, 30);
    assert!(engine.get_settings().never_suspend_audio);
}

#[test]
fn test_batch_skips_unknown_keys_and_applies_the_rest() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine
        .apply_changes(&changes(json!({
            "inactivityTimeMinutes": 5,
            "autoUnsuspendOnView": false,
        })))
        .unwrap();

    assert!(!settings.auto_unsuspend_on_view);
    assert_eq!(settings.inactivity_time_value, 15);
    assert!(!engine.get_settings().auto_unsuspend_on_view);
}

#[test]
fn test_batch_with_one_bad_value_applies_nothing() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let result = engine.apply_changes(&changes(json!({"theme": "dark", "inactivityTimeValue": 0})));

    assert!(result.is_err());
    assert_eq!(engine.get_settings().theme, ThemeMode::Light);
}

#[test]
fn test_apply_changes_does_not_write_file() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    engine
        .apply_changes(&changes(json!({"autoUnsuspendOnView": false})))
        .unwrap();

    assert!(!dir.path().join("settings.json").exists());
}

#[test]
fn test_subscribers_see_whole_snapshot_swap() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    let rx = engine.subscribe();
    let before = rx.borrow().clone();

    engine
        .apply_changes(&changes(json!({
            "inactivityTimeValue": 45,
            "inactivityTimeUnit": "seconds",
        })))
        .unwrap();

    let after = rx.borrow().clone();
    assert_eq!(before.inactivity_threshold_ms(), 15 * 60_000);
    assert_eq!(after.inactivity_threshold_ms(), 45_000);
    assert_eq!(before.inactivity_time_value, 15);
}

#[test]
fn test_reset_restores_defaults_and_saves() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.set_value("theme", json!("dark")).unwrap();

    engine.reset().unwrap();

    assert_eq!(*engine.get_settings(), SuspenderSettings::default());
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(*reloaded.load().unwrap(), SuspenderSettings::default());
}
