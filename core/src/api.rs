//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `cisrun_core::api` instead of reaching into internal modules.

pub use crate::catalog::{scan, Catalog, NodeKind, ScanWarning, ScriptNode, WarningKind};
pub use crate::classifier::{classify, Verdict, FAIL_MARKER};
pub use crate::config::{
    load, load_default, AppConfig, BatchesConfig, ExecutionConfig, ExecutionMode,
    InterpretersConfig, LoggingConfig, OutputConfig, ScriptsConfig,
};
pub use crate::error::{
    CatalogError, CliError, ConfigError, ExecutorError, LaunchError, ResolveError,
};
pub use crate::executor::{
    Batch, BatchOrchestrator, BatchOrchestratorBuilder, ConcurrencyContext,
    ConcurrencyStrategyPlugin, ExecutionOpts, ExecutionRequest, ExecutionResult, NamedBatch,
    OutputRendererPlugin, RenderEvent, RunOutcome, RunSession, RunSummary,
};
pub use crate::resolver::{resolve, ScriptKind, ScriptRef, Selection};
pub use crate::runner::{
    EngineOpts, ExecutionEngine, ExitInfo, Interpreter, InterpreterTable, RunnerPlugin, RunnerSession,
    RunnerStartArgs, Signal,
};
