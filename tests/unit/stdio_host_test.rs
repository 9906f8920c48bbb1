//! Tests for the mirrored stdio host: event mirroring and emitted instructions.

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tab_suspender::platform::host::{StatusProbe, TabHost};
use tab_suspender::platform::stdio_host::StdioHost;
use tab_suspender::services::context_menu::suspend_menu_item;
use tab_suspender::types::errors::HostError;
use tab_suspender::types::event::HostEvent;
use tab_suspender::types::tab::TabSnapshot;

/// Writer that keeps everything in memory for inspection.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

fn host() -> (StdioHost, SharedBuf) {
    let buf = SharedBuf::default();
    (StdioHost::new(Box::new(buf.clone())), buf)
}

fn snapshot(id: i64, window_id: i64, url: &str, active: bool) -> TabSnapshot {
    TabSnapshot {
        id,
        window_id,
        url: url.to_string(),
        title: format!("Tab {}", id),
        active,
        ..Default::default()
    }
}

#[tokio::test]
async fn sync_replaces_the_mirror() {
    let (host, _) = host();
    host.observe(&HostEvent::Created {
        tab: snapshot(99, 1, "https://stale.test", false),
    });

    host.observe(&HostEvent::Synced {
        tabs: vec![
            snapshot(1, 1, "https://a.test", true),
            snapshot(2, 1, "https://b.test", false),
        ],
    });

    assert_eq!(host.tab_count(), 2);
    assert!(host.get_tab(99).await.unwrap().is_none());
    assert_eq!(host.current_tab().await.unwrap().unwrap().id, 1);
}

#[tokio::test]
async fn activation_moves_focus_within_window() {
    let (host, _) = host();
    host.observe(&HostEvent::Synced {
        tabs: vec![
            snapshot(1, 1, "https://a.test", true),
            snapshot(2, 1, "https://b.test", false),
            snapshot(3, 2, "https://c.test", true),
        ],
    });

    host.observe(&HostEvent::Activated { tab_id: 2, window_id: 1 });

    assert!(!host.get_tab(1).await.unwrap().unwrap().active);
    assert!(host.get_tab(2).await.unwrap().unwrap().active);
    assert!(host.get_tab(3).await.unwrap().unwrap().active, "other windows keep their tab");
    assert_eq!(host.current_tab().await.unwrap().unwrap().id, 2);

    host.observe(&HostEvent::Activated { tab_id: 3, window_id: 2 });
    assert_eq!(host.current_tab().await.unwrap().unwrap().id, 3);
}

#[tokio::test]
async fn navigate_emits_instruction_and_updates_mirror() {
    let (host, buf) = host();
    host.observe(&HostEvent::Synced {
        tabs: vec![snapshot(1, 1, "https://a.test", true), snapshot(2, 1, "https://b.test", false)],
    });

    host.navigate(2, "https://b2.test", true).await.unwrap();

    assert_eq!(
        buf.lines(),
        vec![json!({"event": "navigate", "tabId": 2, "url": "https://b2.test", "active": true})]
    );
    let tab = host.get_tab(2).await.unwrap().unwrap();
    assert_eq!(tab.url, "https://b2.test");
    assert!(tab.active);
    assert!(!host.get_tab(1).await.unwrap().unwrap().active);
}

#[tokio::test]
async fn navigate_unknown_tab_fails_without_output() {
    let (host, buf) = host();

    let err = host.navigate(5, "https://a.test", false).await.unwrap_err();

    assert_eq!(err, HostError::TabNotFound(5));
    assert!(buf.lines().is_empty());
}

#[tokio::test]
async fn context_menu_instructions() {
    let (host, buf) = host();
    let item = suspend_menu_item();

    host.set_context_menu(Some(&item)).await.unwrap();
    host.set_context_menu(None).await.unwrap();

    let lines = buf.lines();
    assert_eq!(lines[0]["event"], json!("contextMenu"));
    assert_eq!(lines[0]["item"]["id"], json!("suspendCurrentTab"));
    assert_eq!(lines[1]["item"], Value::Null);
}

#[tokio::test]
async fn removal_and_status_are_mirrored() {
    let (host, _) = host();
    host.observe(&HostEvent::Synced {
        tabs: vec![snapshot(1, 1, "https://a.test", true)],
    });

    host.observe(&HostEvent::Removed { tab_id: 1 });
    host.observe(&HostEvent::StatusChanged {
        online: Some(false),
        power_connected: Some(true),
    });

    assert_eq!(host.tab_count(), 0);
    assert!(host.is_offline().await.unwrap());
    assert!(host.is_power_connected().await.unwrap());

    host.observe(&HostEvent::StatusChanged {
        online: Some(true),
        power_connected: None,
    });
    assert!(!host.is_offline().await.unwrap());
    assert!(host.is_power_connected().await.unwrap());
}
