//! RPC method handler for the tab suspender JSON protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one request to the `App`. Failed suspend/restore
//! actions are answered with `{"success": false, "error": ...}`; malformed requests
//! and unknown methods come back as `Err`.

use serde_json::{json, Map, Value};

use crate::app::{App, EventEffect};
use crate::managers::command_manager::CommandManagerTrait;
use crate::platform::host::TabHost;
use crate::services::suspend_executor::relock;
use crate::types::event::HostEvent;
use crate::types::suspension::{BulkReport, SuspendOutcome, SweepOutcome};
use crate::types::tab::TabId;

fn tab_id_param(params: &Value) -> Result<TabId, String> {
    params
        .get("tabId")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| "missing tabId".to_string())
}

/// Accepts either bare ids or tab objects carrying an `id`.
fn tab_list_param(params: &Value) -> Result<Vec<TabId>, String> {
    let tabs = params
        .get("tabs")
        .and_then(|v| v.as_array())
        .ok_or("missing tabs")?;
    tabs.iter()
        .map(|t| {
            t.as_i64()
                .or_else(|| t.get("id").and_then(|v| v.as_i64()))
                .ok_or_else(|| format!("invalid tab entry: {}", t))
        })
        .collect()
}

/// Builds a `HostEvent` from the params of a `tabs.*` / `status.*` method.
fn host_event(kind: &str, params: &Value) -> Result<HostEvent, String> {
    let mut body = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        _ => return Err("params must be an object".to_string()),
    };
    body.insert("type".to_string(), json!(kind));
    serde_json::from_value(Value::Object(body)).map_err(|e| format!("invalid event: {}", e))
}

fn failure(error: impl ToString) -> Value {
    json!({"success": false, "error": error.to_string()})
}

fn bulk_json(report: &BulkReport) -> Value {
    let failed: Vec<Value> = report
        .failed
        .iter()
        .map(|(tab_id, e)| json!({"tabId": tab_id, "error": e.to_string()}))
        .collect();
    json!({
        "success": report.all_succeeded(),
        "succeeded": report.succeeded,
        "failed": failed,
    })
}

fn suspend_json(outcome: SuspendOutcome) -> Value {
    json!({
        "success": true,
        "alreadySuspended": outcome == SuspendOutcome::AlreadySuspended,
    })
}

fn effect_json(effect: &EventEffect) -> Value {
    match effect {
        EventEffect::Ignored => json!({"effect": "ignored"}),
        EventEffect::Recorded => json!({"effect": "recorded"}),
        EventEffect::Seeded { created } => json!({"effect": "seeded", "created": created}),
        EventEffect::AutoRestored(tab_id) => json!({"effect": "autoRestored", "tabId": tab_id}),
        EventEffect::ImplicitlyRestored(tab_id) => {
            json!({"effect": "implicitlyRestored", "tabId": tab_id})
        }
        EventEffect::AutoRestoreFailed(e) => {
            json!({"effect": "autoRestoreFailed", "error": e.to_string()})
        }
        EventEffect::Forgotten(tab_id) => json!({"effect": "forgotten", "tabId": tab_id}),
    }
}

fn sweep_json(outcome: &SweepOutcome) -> Value {
    match outcome {
        SweepOutcome::Skipped => json!({"status": "skipped"}),
        SweepOutcome::Disabled => json!({"status": "disabled"}),
        SweepOutcome::HostUnavailable(e) => json!({"status": "hostUnavailable", "error": e}),
        SweepOutcome::Completed(report) => json!({"status": "completed", "report": report}),
    }
}

/// Dispatch one protocol method to the app.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method<H: TabHost + 'static>(
    app: &App<H>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Tab actions ───
        "getTabData" => {
            let records: Map<String, Value> = app
                .tab_data()
                .into_iter()
                .map(|r| {
                    let key = r.tab_id.to_string();
                    serde_json::to_value(r).map(|v| (key, v))
                })
                .collect::<Result<_, _>>()
                .map_err(|e| e.to_string())?;
            Ok(Value::Object(records))
        }
        "suspendTab" => {
            let tab_id = tab_id_param(params)?;
            Ok(match app.suspend_tab(tab_id).await {
                Ok(outcome) => suspend_json(outcome),
                Err(e) => failure(e),
            })
        }
        "restoreTab" => {
            let tab_id = tab_id_param(params)?;
            let make_active = params
                .get("makeActive")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Ok(match app.restore_tab(tab_id, make_active).await {
                Ok(()) => json!({"success": true}),
                Err(e) => failure(e),
            })
        }
        "suspendAllTabs" => Ok(match app.executor.suspend_all(None).await {
            Ok(report) => bulk_json(&report),
            Err(e) => failure(e),
        }),
        "suspendAllExceptCurrent" => {
            let current = match app.host.current_tab().await {
                Ok(tab) => tab.map(|t| t.id),
                Err(e) => return Ok(failure(e)),
            };
            Ok(match app.executor.suspend_all(current).await {
                Ok(report) => bulk_json(&report),
                Err(e) => failure(e),
            })
        }
        "unsuspendAllTabs" => Ok(match app.executor.restore_all().await {
            Ok(report) => bulk_json(&report),
            Err(e) => failure(e),
        }),
        "bulkSuspend" => {
            let tabs = tab_list_param(params)?;
            Ok(bulk_json(&app.executor.suspend_many(&tabs).await))
        }
        "bulkUnsuspend" => {
            let tabs = tab_list_param(params)?;
            let report = app.executor.restore_many(&tabs, Default::default()).await;
            Ok(bulk_json(&report))
        }

        // ─── Settings ───
        "settings.get" => serde_json::to_value(app.settings().as_ref()).map_err(|e| e.to_string()),
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let settings = app.set_setting(key, value).await.map_err(|e| e.to_string())?;
            serde_json::to_value(settings.as_ref()).map_err(|e| e.to_string())
        }
        "settings.changed" => {
            let changes = params
                .get("changes")
                .and_then(|v| v.as_object())
                .ok_or("missing changes")?;
            let settings = app
                .apply_settings_changes(changes)
                .await
                .map_err(|e| e.to_string())?;
            serde_json::to_value(settings.as_ref()).map_err(|e| e.to_string())
        }
        "settings.reset" => {
            let settings = app.reset_settings().await.map_err(|e| e.to_string())?;
            serde_json::to_value(settings.as_ref()).map_err(|e| e.to_string())
        }

        // ─── Commands and context menu ───
        "command" => {
            let command = {
                let manager = relock(&app.command_manager);
                match (
                    params.get("name").and_then(|v| v.as_str()),
                    params.get("keys").and_then(|v| v.as_str()),
                ) {
                    (Some(name), _) => manager.resolve(name).map_err(|e| e.to_string())?,
                    (None, Some(keys)) => manager
                        .command_for_keys(keys)
                        .ok_or_else(|| format!("no command bound to {}", keys))?,
                    (None, None) => return Err("missing name or keys".to_string()),
                }
            };
            Ok(match app.run_command(command).await {
                Ok(report) => bulk_json(&report),
                Err(e) => failure(e),
            })
        }
        "commands.list" => {
            let bindings: Map<String, Value> = relock(&app.command_manager)
                .list_bindings()
                .iter()
                .map(|(command, keys)| (command.as_str().to_string(), json!(keys)))
                .collect();
            Ok(Value::Object(bindings))
        }
        "commands.bind" => {
            let name = params.get("name").and_then(|v| v.as_str()).ok_or("missing name")?;
            let keys = params.get("keys").and_then(|v| v.as_str()).ok_or("missing keys")?;
            relock(&app.command_manager)
                .bind(name, keys)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "commands.unbind" => {
            let name = params.get("name").and_then(|v| v.as_str()).ok_or("missing name")?;
            relock(&app.command_manager)
                .unbind(name)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "commands.reset" => {
            relock(&app.command_manager).reset_to_defaults();
            Ok(json!({"ok": true}))
        }
        "contextMenu.clicked" => {
            let tab_id = params.get("tabId").and_then(|v| v.as_i64());
            Ok(match app.context_menu_clicked(tab_id).await {
                Ok(outcome) => suspend_json(outcome),
                Err(e) => failure(e),
            })
        }
        "placeholder.describe" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let page = app
                .describe_placeholder(url)
                .ok_or_else(|| format!("not a placeholder url: {}", url))?;
            serde_json::to_value(page).map_err(|e| e.to_string())
        }
        "sweep" => Ok(sweep_json(&app.scheduler.sweep().await)),

        // ─── Host events ───
        "tabs.sync" | "tabs.created" | "tabs.activated" | "tabs.updated" | "tabs.completed"
        | "tabs.removed" | "status.changed" => {
            let kind = match method {
                "tabs.sync" => "synced",
                "tabs.created" => "created",
                "tabs.activated" => "activated",
                "tabs.updated" => "updated",
                "tabs.completed" => "navigationCompleted",
                "tabs.removed" => "removed",
                _ => "statusChanged",
            };
            let event = host_event(kind, params)?;
            Ok(effect_json(&app.handle_event(event).await))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
