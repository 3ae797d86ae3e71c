//! Batch orchestration.
//!
//! ```text
//! Selection
//!   ↓ resolve()
//! Batch { label, Vec<ScriptRef> }
//!   ↓ BatchOrchestrator::run()
//! scheduler ── workers (ExecutionEngine::execute) ──► mpsc ──► collector
//!                                                              ├─► RunSession::push
//!                                                              └─► OutputRendererPlugin::render
//! ```
//!
//! `Sequential` is the same scheduler with a concurrency limit of one.

mod batch;
mod orchestrator;
mod progress;
mod scheduler;
mod session;
pub mod traits;
pub mod types;

pub use batch::{Batch, NamedBatch};
pub use orchestrator::{BatchOrchestrator, BatchOrchestratorBuilder};
pub use progress::ProgressMonitor;
pub use session::{RunSession, RunSummary};
pub use traits::{ConcurrencyContext, ConcurrencyStrategyPlugin, OutputRendererPlugin, RenderEvent};
pub use types::{ExecutionOpts, ExecutionRequest, ExecutionResult, RunOutcome};
