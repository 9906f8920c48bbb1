//! Suspension policy.
//!
//! A pure decision over a tab snapshot, its last activity, the current settings and the
//! sampled environment. Rules are checked in a fixed order and the first exclusion
//! that matches wins.

use crate::services::placeholder::PlaceholderCodec;
use crate::types::placeholder::UrlKind;
use crate::types::settings::SuspenderSettings;
use crate::types::suspension::{EnvironmentStatus, KeepReason, Verdict};
use crate::types::tab::TabSnapshot;

/// Decides whether `tab` should be suspended now.
pub fn evaluate(
    tab: &TabSnapshot,
    last_active: i64,
    settings: &SuspenderSettings,
    env: &EnvironmentStatus,
    codec: &PlaceholderCodec,
    now: i64,
) -> Verdict {
    match codec.classify(&tab.url) {
        UrlKind::Internal => return Verdict::Keep(KeepReason::InternalUrl),
        UrlKind::Placeholder => return Verdict::Keep(KeepReason::Placeholder),
        UrlKind::Normal => {}
    }
    if tab.pinned && settings.never_suspend_pinned {
        return Verdict::Keep(KeepReason::Pinned);
    }
    if tab.active && settings.never_suspend_active_in_window {
        return Verdict::Keep(KeepReason::ActiveInWindow);
    }
    if tab.audible && settings.never_suspend_audio {
        return Verdict::Keep(KeepReason::Audible);
    }
    if settings.never_suspend_offline && env.offline {
        return Verdict::Keep(KeepReason::Offline);
    }
    if settings.never_suspend_power_connected && env.power_connected {
        return Verdict::Keep(KeepReason::PowerConnected);
    }
    if is_excluded(&tab.url, &settings.excluded_urls) {
        return Verdict::Keep(KeepReason::ExcludedUrl);
    }
    if now.saturating_sub(last_active) <= settings.inactivity_threshold_ms() {
        return Verdict::Keep(KeepReason::RecentlyActive);
    }
    Verdict::Suspend
}

/// Boolean form of [`evaluate`].
pub fn should_suspend(
    tab: &TabSnapshot,
    last_active: i64,
    settings: &SuspenderSettings,
    env: &EnvironmentStatus,
    codec: &PlaceholderCodec,
    now: i64,
) -> bool {
    evaluate(tab, last_active, settings, env, codec, now).is_suspend()
}

/// Substring match against the configured exclusions. Blank patterns match nothing.
pub fn is_excluded(url: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .map(|p| p.trim())
        .any(|p| !p.is_empty() && url.contains(p))
}
