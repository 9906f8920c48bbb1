// Tab suspender platform layer
// Per-OS config paths, plus the capabilities the engine needs from its host:
// tab access, power/network probes and a clock.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific path at compile time.

use std::path::PathBuf;

pub mod clock;
pub mod host;
pub mod stdio_host;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "TAB_SUSPENDER_CONFIG_DIR";

/// Returns the configuration directory for the suspender.
///
/// - **Linux**: `~/.config/tab-suspender` (or `$XDG_CONFIG_HOME/tab-suspender`)
/// - **macOS**: `~/Library/Application Support/TabSuspender`
/// - **Windows**: `%APPDATA%/TabSuspender`
///
/// `TAB_SUSPENDER_CONFIG_DIR` takes precedence on every platform.
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Default location of the settings file.
pub fn settings_path() -> PathBuf {
    get_config_dir().join("settings.json")
}
