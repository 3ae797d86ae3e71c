use std::sync::Arc;

use anyhow::{bail, Result};

use cisrun_core::config::AppConfig;
use cisrun_core::executor::traits::{ConcurrencyStrategyPlugin, OutputRendererPlugin};
use cisrun_core::executor::{BatchOrchestrator, ExecutionOpts};
use cisrun_core::runner::{ExecutionEngine, RunnerPlugin};

use crate::executor::{
    AdaptiveConcurrencyPlugin, AdaptiveLimits, FixedConcurrencyPlugin, JsonlRendererPlugin,
    TextRendererPlugin,
};
use crate::runner::ProcessRunnerPlugin;

pub fn build_runner(_cfg: &AppConfig) -> Arc<dyn RunnerPlugin> {
    Arc::new(ProcessRunnerPlugin::new())
}

pub fn build_renderer(cfg: &AppConfig) -> Result<Arc<dyn OutputRendererPlugin>> {
    match cfg.output.format.as_str() {
        "text" => Ok(Arc::new(TextRendererPlugin::new(
            cfg.output.ascii_only,
            cfg.output.verbose,
        ))),
        "jsonl" => Ok(Arc::new(JsonlRendererPlugin::new(false))),
        other => bail!("unknown output format '{other}'"),
    }
}

pub fn build_concurrency(cfg: &AppConfig) -> Result<Arc<dyn ConcurrencyStrategyPlugin>> {
    match cfg.execution.concurrency.as_str() {
        "fixed" => Ok(Arc::new(FixedConcurrencyPlugin::new(cfg.execution.max_parallel))),
        "adaptive" => {
            let mut limits = AdaptiveLimits::default();
            if let Some(max) = cfg.execution.max_parallel {
                limits.max_concurrency = max;
            }
            Ok(Arc::new(AdaptiveConcurrencyPlugin::new(limits)))
        }
        other => bail!("unknown concurrency strategy '{other}'"),
    }
}

/// Engine, renderer and strategy wired from config. `extra` renderers receive every
/// event after the configured one.
pub fn build_orchestrator(
    cfg: &AppConfig,
    opts: ExecutionOpts,
    extra: Vec<Arc<dyn OutputRendererPlugin>>,
) -> Result<BatchOrchestrator> {
    let engine = ExecutionEngine::from_config(build_runner(cfg), cfg);
    let mut builder = BatchOrchestrator::builder(Arc::new(engine))
        .opts(opts)
        .renderer(build_renderer(cfg)?)
        .concurrency_strategy(build_concurrency(cfg)?);
    for renderer in extra {
        builder = builder.renderer(renderer);
    }
    Ok(builder.build()?)
}
