use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::error::LaunchError;
use crate::executor::types::{ExecutionRequest, ExecutionResult, RunOutcome};
use crate::resolver::ScriptRef;

use super::capture::CaptureBuffer;
use super::interpreter::InterpreterTable;
use super::io_pump::pump;
use super::traits::RunnerPlugin;
use super::types::{RunnerStartArgs, Signal};

#[derive(Debug, Clone)]
pub struct EngineOpts {
    /// Kill a script that runs longer than this.
    pub timeout: Option<Duration>,
    /// How long to keep reading output after the child is gone.
    pub drain_grace: Duration,
    pub workdir: Option<PathBuf>,
    pub envs: HashMap<String, String>,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            timeout: None,
            drain_grace: Duration::from_millis(1000),
            workdir: None,
            envs: HashMap::new(),
        }
    }
}

impl EngineOpts {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            timeout: cfg.execution.timeout(),
            drain_grace: Duration::from_millis(cfg.execution.drain_grace_ms),
            workdir: cfg.execution.workdir(),
            envs: cfg.execution.env.clone(),
        }
    }
}

/// Runs one script as a child process and captures everything it prints.
pub struct ExecutionEngine {
    runner: Arc<dyn RunnerPlugin>,
    interpreters: InterpreterTable,
    opts: EngineOpts,
}

impl ExecutionEngine {
    pub fn new(runner: Arc<dyn RunnerPlugin>, interpreters: InterpreterTable, opts: EngineOpts) -> Self {
        Self {
            runner,
            interpreters,
            opts,
        }
    }

    pub fn from_config(runner: Arc<dyn RunnerPlugin>, cfg: &AppConfig) -> Self {
        Self::new(
            runner,
            InterpreterTable::from_config(&cfg.interpreters),
            EngineOpts::from_config(cfg),
        )
    }

    pub fn runner_name(&self) -> &str {
        self.runner.name()
    }

    pub fn interpreters(&self) -> &InterpreterTable {
        &self.interpreters
    }

    pub fn start_args(&self, script: &ScriptRef) -> RunnerStartArgs {
        let (cmd, args) = self.interpreters.command_line(script);
        RunnerStartArgs {
            cmd,
            args,
            envs: self.opts.envs.clone(),
            workdir: self.opts.workdir.clone(),
        }
    }

    /// Run `request` to completion (or timeout).
    ///
    /// A non-zero exit is returned as a normal result. Only failing to start the child
    /// is an error; losing it afterwards yields a `LaunchFailed` result with the output
    /// captured so far.
    #[tracing::instrument(
        name = "engine.execute",
        skip_all,
        fields(script = %request.script.path().display(), runner = self.runner.name())
    )]
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, LaunchError> {
        let args = self.start_args(&request.script);
        let script_path = request.script.path();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut session = self.runner.start_session(&args).await.map_err(|e| {
            let err = LaunchError::from_spawn(&args.cmd, script_path, e);
            tracing::warn!(error = %err, "launch failed");
            err
        })?;

        let stdout = CaptureBuffer::new();
        let stderr = CaptureBuffer::new();
        let mut pumps = Vec::with_capacity(2);
        if let Some(rd) = session.stdout() {
            pumps.push(pump(rd, stdout.clone(), "stdout"));
        }
        if let Some(rd) = session.stderr() {
            pumps.push(pump(rd, stderr.clone(), "stderr"));
        }

        let waited = match self.opts.timeout {
            Some(limit) => match tokio::time::timeout(limit, session.wait()).await {
                Ok(status) => Some(status),
                Err(_) => {
                    tracing::warn!(timeout_ms = limit.as_millis() as u64, "script timed out, killing");
                    if let Err(e) = session.signal(Signal::Kill).await {
                        tracing::debug!(error = %e, "kill failed");
                    }
                    None
                }
            },
            None => Some(session.wait().await),
        };

        self.drain(pumps).await;

        let finished_at = Utc::now();
        let duration_ms = start.elapsed().as_millis() as u64;
        let outcome = match waited {
            Some(Ok(info)) => RunOutcome::Exited {
                exit_code: info.code,
            },
            // The script ran; keep whatever it printed before the child was lost.
            Some(Err(source)) => {
                let err = LaunchError::Wait {
                    script: script_path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %err, "wait failed");
                RunOutcome::LaunchFailed {
                    message: err.to_string(),
                }
            }
            None => RunOutcome::TimedOut {
                after_ms: duration_ms,
            },
        };

        let result = ExecutionResult::completed(
            request,
            stdout.decode(script_path, "stdout"),
            stderr.decode(script_path, "stderr"),
            outcome,
            started_at,
            finished_at,
            duration_ms,
        );
        tracing::debug!(
            verdict = %result.verdict,
            exit_code = ?result.exit_code(),
            duration_ms,
            "script finished"
        );
        Ok(result)
    }

    /// Wait for the pumps to hit EOF. A grandchild can keep a pipe open after the
    /// script itself is gone, so give up after the grace period and keep what we have.
    async fn drain(&self, pumps: Vec<JoinHandle<io::Result<u64>>>) {
        let deadline = tokio::time::Instant::now() + self.opts.drain_grace;
        for mut handle in pumps {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(Ok(_))) => {}
                Ok(Ok(Err(e))) => tracing::warn!(error = %e, "output stream read failed"),
                Ok(Err(e)) => tracing::warn!(error = %e, "output pump aborted"),
                Err(_) => {
                    handle.abort();
                    tracing::warn!("output stream still open after exit, keeping captured part");
                }
            }
        }
    }
}
