use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Terminal progress display for a running batch.
///
/// One overall bar plus a spinner per running script. A disabled monitor draws nothing,
/// which is what non-interactive and JSONL runs get.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    script_bars: HashMap<String, ProgressBar>,
    enabled: bool,
    ascii: bool,
}

impl ProgressMonitor {
    pub fn new(total_scripts: usize, enabled: bool, ascii: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
        let overall = multi.add(ProgressBar::new(total_scripts as u64));
        let chars = if ascii { "#>-" } else { "█▓▒░  " };
        match ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} scripts ({percent}%) {msg}")
        {
            Ok(style) => overall.set_style(style.progress_chars(chars)),
            Err(e) => tracing::debug!(error = %e, "progress template rejected"),
        }
        overall.set_message("Starting...");

        Self {
            multi,
            overall,
            script_bars: HashMap::new(),
            enabled: true,
            ascii,
        }
    }

    fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            overall: ProgressBar::hidden(),
            script_bars: HashMap::new(),
            enabled: false,
            ascii: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn start_script(&mut self, name: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        let ticks: &[&str] = if self.ascii {
            &["|", "/", "-", "\\"]
        } else {
            &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
            bar.set_style(style.tick_strings(ticks));
        }
        bar.set_message(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        self.script_bars.insert(name.to_string(), bar);
    }

    pub fn complete_script(&mut self, name: &str, passed: bool, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.script_bars.remove(name) {
            bar.finish_and_clear();
        }
        let status = if passed { "PASS" } else { "FAIL" };
        self.overall
            .set_message(format!("{name}: {status} ({duration_ms}ms)"));
        self.overall.inc(1);
    }

    /// Write a line above the bars without tearing them.
    pub fn println(&self, line: &str) {
        if self.enabled {
            let _ = self.multi.println(line);
        }
    }

    pub fn finish(&mut self, all_passed: bool) {
        if !self.enabled {
            return;
        }
        for (_, bar) in self.script_bars.drain() {
            bar.finish_and_clear();
        }
        let msg = if all_passed { "all scripts passed" } else { "some scripts failed" };
        self.overall.finish_with_message(msg);
        self.overall.finish_and_clear();
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.script_bars.drain() {
            bar.finish_and_clear();
        }
    }
}
