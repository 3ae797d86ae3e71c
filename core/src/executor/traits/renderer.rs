use crate::config::ExecutionMode;
use crate::executor::session::RunSummary;
use crate::executor::types::ExecutionResult;
use crate::resolver::ScriptRef;

/// Output sink for a batch run. Called only from the orchestrator's collector, in order.
pub trait OutputRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn render(&self, event: &RenderEvent);
}

#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        run_id: String,
        label: String,
        mode: ExecutionMode,
        total_scripts: usize,
    },
    ScriptStart {
        run_id: String,
        script: ScriptRef,
    },
    ScriptComplete {
        run_id: String,
        result: ExecutionResult,
    },
    RunEnd {
        run_id: String,
        summary: RunSummary,
    },
    /// The selection resolved to nothing.
    NoScripts {
        run_id: String,
        label: String,
    },
}

impl RenderEvent {
    pub fn run_id(&self) -> &str {
        match self {
            Self::RunStart { run_id, .. }
            | Self::ScriptStart { run_id, .. }
            | Self::ScriptComplete { run_id, .. }
            | Self::RunEnd { run_id, .. }
            | Self::NoScripts { run_id, .. } => run_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::RunStart { .. } => "run.start",
            Self::ScriptStart { .. } => "script.start",
            Self::ScriptComplete { .. } => "script.end",
            Self::RunEnd { .. } => "run.end",
            Self::NoScripts { .. } => "run.empty",
        }
    }
}
