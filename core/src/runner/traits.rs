use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::types::{ExitInfo, RunnerStartArgs, Signal};

/// A started child. Output streams can be taken once.
#[async_trait]
pub trait RunnerSession: Send {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    async fn signal(&mut self, signal: Signal) -> std::io::Result<()>;
    async fn wait(&mut self) -> std::io::Result<ExitInfo>;
}

/// Starts child sessions. Errors from `start_session` are launch failures.
#[async_trait]
pub trait RunnerPlugin: Send + Sync {
    fn name(&self) -> &str;
    async fn start_session(&self, args: &RunnerStartArgs)
        -> std::io::Result<Box<dyn RunnerSession>>;
}
