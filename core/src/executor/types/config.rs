use crate::config::{AppConfig, ExecutionMode};

/// Options for the batch orchestrator.
#[derive(Debug, Clone)]
pub struct ExecutionOpts {
    /// Sequential or background scheduling.
    pub mode: ExecutionMode,

    /// Maximum parallel scripts in background mode (overrides the strategy if Some)
    pub max_parallel: Option<usize>,

    /// Enable visual progress bar
    pub progress_bar: bool,

    /// Draw the progress bar with ASCII characters only
    pub ascii: bool,

    /// Capacity of the worker -> collector result channel
    pub channel_capacity: usize,
}

impl Default for ExecutionOpts {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            max_parallel: None,
            progress_bar: false,
            ascii: false,
            channel_capacity: 64,
        }
    }
}

impl ExecutionOpts {
    pub fn from_config(cfg: &AppConfig) -> Self {
        // Progress bars only make sense for human-readable output.
        let progress_bar = cfg.output.progress_bar && cfg.output.format == "text";

        Self {
            mode: cfg.execution.mode,
            max_parallel: cfg.execution.max_parallel,
            progress_bar,
            ascii: cfg.output.ascii_only,
            ..Self::default()
        }
    }

    pub fn sequential() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            ..Self::default()
        }
    }

    pub fn background(max_parallel: usize) -> Self {
        Self {
            mode: ExecutionMode::Background,
            max_parallel: Some(max_parallel),
            ..Self::default()
        }
    }
}
