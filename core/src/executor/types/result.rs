use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::{verdict_for, Verdict};
use crate::error::LaunchError;
use crate::resolver::ScriptRef;

use super::request::ExecutionRequest;

/// How a script execution ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The process ran to completion. `exit_code` is `None` if a signal ended it.
    Exited { exit_code: Option<i32> },
    /// The process could not be started.
    LaunchFailed { message: String },
    /// The process exceeded the per-script timeout and was killed.
    TimedOut { after_ms: u64 },
    /// The batch was aborted before this script started.
    Cancelled,
}

impl RunOutcome {
    pub fn ran_to_completion(&self) -> bool {
        matches!(self, Self::Exited { .. })
    }
}

/// Result of one script execution. Built once, fully populated, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub script: ScriptRef,
    pub group: Option<String>,
    pub stdout: String,
    pub stderr: String,
    pub outcome: RunOutcome,
    pub verdict: Verdict,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn completed(
        request: &ExecutionRequest,
        stdout: String,
        stderr: String,
        outcome: RunOutcome,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        let verdict = verdict_for(&outcome, &stdout);
        Self {
            script: request.script.clone(),
            group: request.group.clone(),
            stdout,
            stderr,
            outcome,
            verdict,
            started_at,
            finished_at,
            duration_ms,
        }
    }

    pub fn launch_failed(
        request: &ExecutionRequest,
        err: &LaunchError,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self::not_run(
            request,
            RunOutcome::LaunchFailed {
                message: err.to_string(),
            },
            started_at,
        )
    }

    pub fn cancelled(request: &ExecutionRequest) -> Self {
        Self::not_run(request, RunOutcome::Cancelled, Utc::now())
    }

    /// The worker running this script died before reporting.
    pub fn worker_failed(request: &ExecutionRequest, message: String) -> Self {
        Self::not_run(request, RunOutcome::LaunchFailed { message }, Utc::now())
    }

    fn not_run(request: &ExecutionRequest, outcome: RunOutcome, started_at: DateTime<Utc>) -> Self {
        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        Self::completed(
            request,
            String::new(),
            String::new(),
            outcome,
            started_at,
            finished_at,
            duration_ms,
        )
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.outcome {
            RunOutcome::Exited { exit_code } => exit_code,
            _ => None,
        }
    }

    /// True when the script ran but exited non-zero or was killed by a signal.
    pub fn exited_abnormally(&self) -> bool {
        matches!(self.outcome, RunOutcome::Exited { exit_code } if exit_code != Some(0))
    }

    pub fn name(&self) -> String {
        self.script.name().into_owned()
    }
}
