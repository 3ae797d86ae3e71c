use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ExecutionMode;

use super::types::{ExecutionResult, RunOutcome};

/// Counts for one finished (or in-flight) batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub launch_errors: usize,
    pub timed_out: usize,
    pub cancelled: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ExecutionResult>) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.total += 1;
            if result.verdict.is_pass() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }
            match result.outcome {
                RunOutcome::LaunchFailed { .. } => summary.launch_errors += 1,
                RunOutcome::TimedOut { .. } => summary.timed_out += 1,
                RunOutcome::Cancelled => summary.cancelled += 1,
                RunOutcome::Exited { .. } => {}
            }
        }
        summary
    }

    /// True when at least one script ran and none failed.
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}

/// The results of one batch, in emission order.
///
/// Only the orchestrator's collector appends to a session, once per script.
#[derive(Debug, Clone, Serialize)]
pub struct RunSession {
    run_id: String,
    label: String,
    mode: ExecutionMode,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    duration_ms: u64,
    results: Vec<ExecutionResult>,
    #[serde(skip)]
    clock: Instant,
}

impl RunSession {
    pub(crate) fn new(run_id: String, label: String, mode: ExecutionMode) -> Self {
        Self {
            run_id,
            label,
            mode,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
            results: Vec::new(),
            clock: Instant::now(),
        }
    }

    pub(crate) fn push(&mut self, result: ExecutionResult) {
        self.results.push(result);
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
        self.duration_ms = self.clock.elapsed().as_millis() as u64;
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            duration_ms: self.duration_ms,
            ..RunSummary::from_results(&self.results)
        }
    }
}
