use std::io::{self, Write};
use std::sync::Mutex;

use cisrun_core::executor::traits::{OutputRendererPlugin, RenderEvent};
use cisrun_core::executor::types::{ExecutionResult, RunOutcome};
use cisrun_core::executor::RunSummary;

/// Human-readable output: one block per script, then a `<name>: PASS|FAIL` status list.
pub struct TextRendererPlugin {
    ascii_only: bool,
    verbose: bool,
    out: Mutex<Box<dyn Write + Send>>,
    statuses: Mutex<Vec<String>>,
}

impl TextRendererPlugin {
    pub fn new(ascii_only: bool, verbose: bool) -> Self {
        Self::with_writer(ascii_only, verbose, Box::new(io::stdout()))
    }

    pub fn with_writer(ascii_only: bool, verbose: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            ascii_only,
            verbose,
            out: Mutex::new(out),
            statuses: Mutex::new(Vec::new()),
        }
    }

    fn rule(&self, title: &str) -> String {
        let bar = if self.ascii_only { "-" } else { "─" };
        format!("{} {} {}", bar.repeat(3), title, bar.repeat(3))
    }

    fn format_result(&self, result: &ExecutionResult) -> Option<String> {
        let name = result.name();
        match &result.outcome {
            RunOutcome::Exited { exit_code: Some(0) } => {
                // Passing scripts stay quiet unless asked; anything that printed FAIL is shown.
                if self.verbose || !result.verdict.is_pass() {
                    Some(format!("{}\n{}", self.rule(&name), result.stdout.trim_end()))
                } else {
                    None
                }
            }
            RunOutcome::Exited { exit_code } => {
                let code = exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                Some(format!(
                    "Error executing {name} (exit {code}):\n{}\n{}",
                    result.stderr.trim_end(),
                    result.stdout.trim_end()
                ))
            }
            RunOutcome::LaunchFailed { message } => {
                Some(format!("Error executing {name}: {message}"))
            }
            RunOutcome::TimedOut { after_ms } => Some(format!(
                "Error executing {name}: timed out after {after_ms}ms\n{}\n{}",
                result.stderr.trim_end(),
                result.stdout.trim_end()
            )),
            RunOutcome::Cancelled => Some(format!("{name}: skipped (cancelled)")),
        }
    }

    fn format_summary(&self, summary: &RunSummary) -> String {
        let mut line = format!(
            "{} scripts: {} passed, {} failed",
            summary.total, summary.passed, summary.failed
        );
        if summary.launch_errors > 0 {
            line.push_str(&format!(", {} could not start", summary.launch_errors));
        }
        if summary.timed_out > 0 {
            line.push_str(&format!(", {} timed out", summary.timed_out));
        }
        if summary.cancelled > 0 {
            line.push_str(&format!(", {} cancelled", summary.cancelled));
        }
        line.push_str(&format!(" ({}ms)", summary.duration_ms));
        line
    }

    fn format_event(&self, event: &RenderEvent) -> Option<String> {
        match event {
            RenderEvent::RunStart {
                label,
                mode,
                total_scripts,
                ..
            } => Some(format!("Running {label}: {total_scripts} script(s), {mode}")),
            RenderEvent::ScriptStart { .. } => None,
            RenderEvent::ScriptComplete { result, .. } => {
                if let Ok(mut statuses) = self.statuses.lock() {
                    statuses.push(format!("{}: {}", result.name(), result.verdict));
                }
                self.format_result(result)
            }
            RenderEvent::RunEnd { summary, .. } => {
                let statuses = self
                    .statuses
                    .lock()
                    .map(|mut s| std::mem::take(&mut *s))
                    .unwrap_or_default();
                let mut out = self.rule("Status");
                for status in statuses {
                    out.push('\n');
                    out.push_str(&status);
                }
                out.push('\n');
                out.push_str(&self.format_summary(summary));
                Some(out)
            }
            RenderEvent::NoScripts { label, .. } => Some(format!("No scripts found for '{label}'.")),
        }
    }
}

impl OutputRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        let Some(text) = self.format_event(event) else {
            return;
        };
        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
                tracing::debug!(error = %e, "text renderer write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cisrun_core::executor::types::ExecutionRequest;
    use cisrun_core::resolver::ScriptRef;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn result(path: &str, stdout: &str, stderr: &str, code: i32) -> ExecutionResult {
        let now = Utc::now();
        ExecutionResult::completed(
            &ExecutionRequest::new(ScriptRef::from_path(path).unwrap()),
            stdout.into(),
            stderr.into(),
            RunOutcome::Exited {
                exit_code: Some(code),
            },
            now,
            now,
            3,
        )
    }

    fn complete(result: ExecutionResult) -> RenderEvent {
        RenderEvent::ScriptComplete {
            run_id: "run".into(),
            result,
        }
    }

    #[test]
    fn nonzero_exit_shows_error_block_with_both_streams() {
        let renderer = TextRendererPlugin::new(true, false);
        let text = renderer
            .format_event(&complete(result("a/rem1.sh", "partial\n", "denied\n", 2)))
            .unwrap();
        assert!(text.starts_with("Error executing rem1.sh (exit 2):"));
        assert!(text.contains("denied"));
        assert!(text.contains("partial"));
    }

    #[test]
    fn quiet_mode_hides_passing_output_but_keeps_status() {
        let buf = SharedBuf::default();
        let renderer = TextRendererPlugin::with_writer(true, false, Box::new(buf.clone()));

        renderer.render(&complete(result("a/chk1.sh", "all good\n", "", 0)));
        renderer.render(&complete(result("a/rem1.sh", "FAIL: drift\n", "", 0)));
        renderer.render(&RenderEvent::RunEnd {
            run_id: "run".into(),
            summary: RunSummary {
                total: 2,
                passed: 1,
                failed: 1,
                ..RunSummary::default()
            },
        });

        let text = buf.text();
        assert!(!text.contains("all good"));
        assert!(text.contains("FAIL: drift"));
        assert!(text.contains("chk1.sh: PASS\nrem1.sh: FAIL\n"));
        assert!(text.contains("2 scripts: 1 passed, 1 failed"));
    }

    #[test]
    fn empty_batch_message_names_the_keyword() {
        let renderer = TextRendererPlugin::new(false, true);
        let text = renderer
            .format_event(&RenderEvent::NoScripts {
                run_id: "run".into(),
                label: "chk".into(),
            })
            .unwrap();
        assert_eq!(text, "No scripts found for 'chk'.");
    }
}
