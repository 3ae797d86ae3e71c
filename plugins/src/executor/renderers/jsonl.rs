use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;
use cisrun_core::executor::traits::{OutputRendererPlugin, RenderEvent};
use serde_json::{json, Value};

/// One JSON object per event, for scripting and log shipping.
pub struct JsonlRendererPlugin {
    pretty_print: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self::with_writer(pretty_print, Box::new(io::stdout()))
    }

    pub fn with_writer(pretty_print: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            pretty_print,
            out: Mutex::new(out),
        }
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        let mut value = match event {
            RenderEvent::RunStart {
                label,
                mode,
                total_scripts,
                ..
            } => json!({
                "metadata": {
                    "label": label,
                    "mode": mode,
                    "total_scripts": total_scripts,
                }
            }),
            RenderEvent::ScriptStart { script, .. } => json!({
                "script": script.path(),
                "metadata": {
                    "kind": script.kind(),
                }
            }),
            RenderEvent::ScriptComplete { result, .. } => json!({
                "script": result.script.path(),
                "verdict": result.verdict,
                "code": result.exit_code(),
                "outcome": result.outcome,
                "stdout": result.stdout,
                "stderr": result.stderr,
                "metadata": {
                    "group": result.group,
                    "started_at": result.started_at,
                    "finished_at": result.finished_at,
                    "duration_ms": result.duration_ms,
                }
            }),
            RenderEvent::RunEnd { summary, .. } => json!({
                "metadata": summary,
            }),
            RenderEvent::NoScripts { label, .. } => json!({
                "metadata": {
                    "label": label,
                }
            }),
        };

        if let Some(obj) = value.as_object_mut() {
            obj.insert("v".into(), json!(1));
            obj.insert("event_type".into(), json!(event.kind()));
            obj.insert("ts".into(), json!(ts));
            obj.insert("run_id".into(), json!(event.run_id()));
        }
        value
    }
}

impl OutputRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        let line = if self.pretty_print {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .unwrap_or_else(|_| "{}".into());

        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
                tracing::debug!(error = %e, "jsonl renderer write failed");
            }
        }
    }
}
