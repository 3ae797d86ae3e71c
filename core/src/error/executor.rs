use thiserror::Error;

/// Orchestrator-level failures. Per-script problems never surface here; they become
/// results in the run session.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("batch task failed: {0}")]
    Join(String),

    #[error("invalid executor option: {0}")]
    InvalidOption(String),
}

impl From<tokio::task::JoinError> for ExecutorError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}
