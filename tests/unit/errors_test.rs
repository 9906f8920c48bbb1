use rstest::rstest;
use tab_suspender::types::errors::*;

// === SuspendError Tests ===

#[rstest]
#[case(InvalidTargetReason::TabGone, "Invalid target tab 4: tab no longer exists")]
#[case(InvalidTargetReason::InternalUrl, "Invalid target tab 4: internal page")]
#[case(InvalidTargetReason::Pinned, "Invalid target tab 4: tab is pinned")]
#[case(
    InvalidTargetReason::TransitionInFlight,
    "Invalid target tab 4: transition already in flight"
)]
fn suspend_error_invalid_target_display(#[case] reason: InvalidTargetReason, #[case] expected: &str) {
    let err = SuspendError::InvalidTarget { tab_id: 4, reason };
    assert_eq!(err.to_string(), expected);
}

#[test]
fn suspend_error_not_suspended_display() {
    assert_eq!(SuspendError::NotSuspended(12).to_string(), "Tab 12 is not suspended");
}

#[test]
fn suspend_error_host_call_failed_display() {
    let err = SuspendError::HostCallFailed {
        tab_id: 3,
        message: "tab crashed".to_string(),
    };
    assert_eq!(err.to_string(), "Host call failed for tab 3: tab crashed");
}

#[test]
fn suspend_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(SuspendError::NotSuspended(1));
    assert!(err.source().is_none());
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::LoadFailed("bad json".to_string()).to_string(),
        "Settings load failed: bad json"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::SerializationError("eof".to_string()).to_string(),
        "Settings serialization error: eof"
    );
    assert_eq!(
        SettingsError::InvalidKey("colour".to_string()).to_string(),
        "Invalid settings key: colour"
    );
    assert_eq!(
        SettingsError::InvalidValue("negative".to_string()).to_string(),
        "Invalid settings value: negative"
    );
}

// === HostError Tests ===

#[test]
fn host_error_display_variants() {
    assert_eq!(HostError::TabNotFound(9).to_string(), "Host tab not found: 9");
    assert_eq!(
        HostError::Rejected("no permission".to_string()).to_string(),
        "Host rejected request: no permission"
    );
    assert_eq!(
        HostError::Unavailable("disconnected".to_string()).to_string(),
        "Host unavailable: disconnected"
    );
}

// === CommandError Tests ===

#[test]
fn command_error_display_variants() {
    assert_eq!(
        CommandError::UnknownCommand("reload".to_string()).to_string(),
        "Unknown command: reload"
    );
    assert_eq!(
        CommandError::Conflict("taken".to_string()).to_string(),
        "Command binding conflict: taken"
    );
    assert_eq!(
        CommandError::InvalidKeys("".to_string()).to_string(),
        "Invalid command keys: "
    );
}
