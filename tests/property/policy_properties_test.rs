//! Property-based tests for the suspension policy invariants.

use proptest::prelude::*;
use tab_suspender::services::placeholder::PlaceholderCodec;
use tab_suspender::services::policy_evaluator::should_suspend;
use tab_suspender::types::settings::{SuspenderSettings, TimeUnit};
use tab_suspender::types::suspension::EnvironmentStatus;
use tab_suspender::types::tab::TabSnapshot;

const NOW: i64 = 1_700_000_000_000;

fn arb_env() -> impl Strategy<Value = EnvironmentStatus> {
    (any::<bool>(), any::<bool>()).prop_map(|(offline, power_connected)| EnvironmentStatus {
        offline,
        power_connected,
    })
}

fn arb_unit() -> impl Strategy<Value = TimeUnit> {
    prop_oneof![
        Just(TimeUnit::Seconds),
        Just(TimeUnit::Minutes),
        Just(TimeUnit::Hours),
    ]
}

fn arb_tab() -> impl Strategy<Value = TabSnapshot> {
    ("[a-z]{1,12}", any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(host, pinned, active, audible)| TabSnapshot {
            id: 1,
            window_id: 1,
            url: format!("https://{}.test/", host),
            title: host,
            pinned,
            active,
            audible,
            last_accessed: None,
        },
    )
}

proptest! {
    #[test]
    fn prop_pinned_never_suspended(
        mut tab in arb_tab(),
        idle_ms in 0i64..(365 * 24 * 3_600_000),
        env in arb_env(),
        value in 1u64..100,
        unit in arb_unit(),
    ) {
        tab.pinned = true;
        let settings = SuspenderSettings {
            inactivity_time_value: value,
            inactivity_time_unit: unit,
            never_suspend_pinned: true,
            ..Default::default()
        };
        prop_assert!(!should_suspend(
            &tab, NOW - idle_ms, &settings, &env, &PlaceholderCodec::default(), NOW
        ));
    }

    #[test]
    fn prop_recent_activity_never_suspended(
        tab in arb_tab(),
        value in 1u64..100,
        unit in arb_unit(),
        fraction in 0.0f64..=1.0,
        env in arb_env(),
    ) {
        let settings = SuspenderSettings {
            inactivity_time_value: value,
            inactivity_time_unit: unit,
            ..Default::default()
        };
        let idle_ms = (settings.inactivity_threshold_ms() as f64 * fraction) as i64;
        prop_assert!(!should_suspend(
            &tab, NOW - idle_ms, &settings, &env, &PlaceholderCodec::default(), NOW
        ));
    }

    #[test]
    fn prop_placeholder_tabs_never_suspended(tab in arb_tab(), idle_ms in 0i64..i64::from(u32::MAX)) {
        let codec = PlaceholderCodec::default();
        let shown = TabSnapshot {
            url: codec.encode(&tab.url, &tab.title),
            pinned: false,
            active: false,
            audible: false,
            ..tab
        };
        let settings = SuspenderSettings {
            inactivity_time_value: 1,
            inactivity_time_unit: TimeUnit::Seconds,
            ..Default::default()
        };
        prop_assert!(!should_suspend(
            &shown, NOW - idle_ms, &settings, &EnvironmentStatus::default(), &codec, NOW
        ));
    }

    #[test]
    fn prop_plain_idle_tab_is_suspended(tab in arb_tab(), extra_ms in 1i64..1_000_000) {
        let plain = TabSnapshot { pinned: false, active: false, audible: false, ..tab };
        let settings = SuspenderSettings::default();
        let idle_ms = settings.inactivity_threshold_ms() + extra_ms;
        prop_assert!(should_suspend(
            &plain,
            NOW - idle_ms,
            &settings,
            &EnvironmentStatus::default(),
            &PlaceholderCodec::default(),
            NOW
        ));
    }
}
