//! Real-time log stream using Server-Sent Events (SSE).
//!
//! Connects to the backend's `/api/logs` endpoint. Every entry is kept for
//! the logs panel; entries that carry a phase also drive the progress bar.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::config::{BACKEND_URL, MAX_LOG_ENTRIES};
use crate::types::{LogEntry, UploadPhase};

fn parse_sse_log(json: &str) -> Option<LogEntry> {
    serde_json::from_str(json).ok()
}

/// Start the SSE connection. Call once at app startup.
pub fn init_sse_logs(set_logs: WriteSignal<Vec<LogEntry>>, set_phase: WriteSignal<UploadPhase>) {
    let sse_url = format!("{}/api/logs", BACKEND_URL);

    let event_source = match EventSource::new(&sse_url) {
        Ok(es) => es,
        Err(e) => {
            log::error!("Failed to create EventSource: {:?}", e);
            return;
        }
    };

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Some(data) = event.data().as_string() else {
            return;
        };
        let Some(entry) = parse_sse_log(&data) else {
            return;
        };
        if let Some(phase) = entry.phase.clone() {
            set_phase.set(phase);
        }
        set_logs.update(|logs| {
            logs.push(entry);
            if logs.len() > MAX_LOG_ENTRIES {
                logs.remove(0);
            }
        });
    }) as Box<dyn FnMut(MessageEvent)>);

    event_source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onopen = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::info!("📡 SSE connected to logs stream");
    }) as Box<dyn FnMut(web_sys::Event)>);

    event_source.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onerror = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::warn!("SSE connection error - will auto-reconnect");
    }) as Box<dyn FnMut(web_sys::Event)>);

    event_source.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // Lives for the whole app
    std::mem::forget(event_source);

    log::info!("📡 SSE log stream initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;

    #[test]
    fn test_parse_sse_log() {
        let entry = parse_sse_log(
            r#"{"level":"error","message":"Phase: Failed","phase":{"phase":"failed","message":"bad"},"timestamp":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.phase, Some(UploadPhase::Failed("bad".into())));

        assert!(parse_sse_log("not json").is_none());
    }
}
