//! Tab suspender RPC server: newline-delimited JSON over stdin/stdout.
//!
//! Protocol: one JSON object per line.
//! Request:  {"id":1, "method":"suspendTab", "params":{"tabId":7}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Host instructions ({"event":"navigate",...}, {"event":"contextMenu",...}) share stdout
//! with responses. Logs go to stderr.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tab_suspender::app::App;
use tab_suspender::platform::clock::SystemClock;
use tab_suspender::platform::host::StatusProbe;
use tab_suspender::platform::stdio_host::StdioHost;
use tab_suspender::rpc_handler::handle_method;
use tab_suspender::services::placeholder::{PlaceholderCodec, DEFAULT_PLACEHOLDER_BASE};
use tab_suspender::services::settings_engine::SettingsEngine;
use tab_suspender::services::suspension_scheduler::SWEEP_INTERVAL;

const LOG_ENV: &str = "TAB_SUSPENDER_LOG";
const PLACEHOLDER_BASE_ENV: &str = "TAB_SUSPENDER_PLACEHOLDER_BASE";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let base = std::env::var(PLACEHOLDER_BASE_ENV)
        .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_BASE.to_string());
    let host = Arc::new(StdioHost::stdout());
    let probe: Arc<dyn StatusProbe> = host.clone();
    let app = App::with_parts(
        Arc::clone(&host),
        probe,
        SettingsEngine::new(None),
        PlaceholderCodec::new(&base),
        Arc::new(SystemClock),
    );

    app.startup().await;
    app.scheduler.arm(SWEEP_INTERVAL);

    // Signal ready
    let ready = json!({"event":"ready","version":env!("CARGO_PKG_VERSION")});
    if let Err(e) = host.emit(&ready) {
        error!(error = %e, "could not signal ready");
        return;
    }
    info!(placeholder = %base, "tab suspender ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                let params = req.get("params").cloned().unwrap_or(json!({}));

                match handle_method(&app, method, &params).await {
                    Ok(val) => json!({"id": id, "result": val}),
                    Err(err) => json!({"id": id, "error": err}),
                }
            }
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
        };

        if let Err(e) = host.emit(&response) {
            error!(error = %e, "stdout closed");
            break;
        }
    }

    app.shutdown();
    info!("stdin closed, shutting down");
}
