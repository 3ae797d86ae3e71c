use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::ExecutionMode;
use crate::error::ExecutorError;
use crate::runner::ExecutionEngine;

use super::batch::Batch;
use super::progress::ProgressMonitor;
use super::scheduler::{schedule, WorkerEvent};
use super::session::RunSession;
use super::traits::{ConcurrencyContext, ConcurrencyStrategyPlugin, OutputRendererPlugin, RenderEvent};
use super::types::ExecutionOpts;

/// Runs batches through the execution engine and feeds the renderers.
///
/// Workers report through one channel; the collector loop in [`run`](Self::run) is the
/// only writer of the returned [`RunSession`] and the only caller of the renderers.
pub struct BatchOrchestrator {
    engine: Arc<ExecutionEngine>,
    renderers: Vec<Arc<dyn OutputRendererPlugin>>,
    concurrency_strategy: Option<Arc<dyn ConcurrencyStrategyPlugin>>,
    opts: ExecutionOpts,
}

pub struct BatchOrchestratorBuilder {
    engine: Arc<ExecutionEngine>,
    renderers: Vec<Arc<dyn OutputRendererPlugin>>,
    concurrency_strategy: Option<Arc<dyn ConcurrencyStrategyPlugin>>,
    opts: ExecutionOpts,
}

impl BatchOrchestratorBuilder {
    pub fn new(engine: Arc<ExecutionEngine>) -> Self {
        Self {
            engine,
            renderers: Vec::new(),
            concurrency_strategy: None,
            opts: ExecutionOpts::default(),
        }
    }

    pub fn opts(mut self, opts: ExecutionOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn OutputRendererPlugin>) -> Self {
        self.renderers.push(renderer);
        self
    }

    pub fn concurrency_strategy(mut self, strategy: Arc<dyn ConcurrencyStrategyPlugin>) -> Self {
        self.concurrency_strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<BatchOrchestrator, ExecutorError> {
        if self.opts.max_parallel == Some(0) {
            return Err(ExecutorError::InvalidOption(
                "max_parallel must be at least 1".into(),
            ));
        }
        if self.opts.channel_capacity == 0 {
            return Err(ExecutorError::InvalidOption(
                "channel_capacity must be at least 1".into(),
            ));
        }

        Ok(BatchOrchestrator {
            engine: self.engine,
            renderers: self.renderers,
            concurrency_strategy: self.concurrency_strategy,
            opts: self.opts,
        })
    }
}

impl BatchOrchestrator {
    pub fn builder(engine: Arc<ExecutionEngine>) -> BatchOrchestratorBuilder {
        BatchOrchestratorBuilder::new(engine)
    }

    pub fn opts(&self) -> &ExecutionOpts {
        &self.opts
    }

    pub fn mode(&self) -> ExecutionMode {
        self.opts.mode
    }

    /// How many scripts may run at once for a batch of `pending` scripts.
    pub fn concurrency_for(&self, pending: usize) -> usize {
        if self.opts.mode == ExecutionMode::Sequential {
            return 1;
        }

        let available_cpus = num_cpus::get().max(1);
        let base = self.opts.max_parallel.unwrap_or(available_cpus);
        let limit = match &self.concurrency_strategy {
            Some(strategy) => {
                let context = ConcurrencyContext {
                    available_cpus,
                    base_concurrency: base,
                    pending_scripts: pending,
                };
                let limit = strategy.calculate_concurrency(&context);
                tracing::debug!(strategy = strategy.name(), base, limit, "concurrency chosen");
                limit
            }
            None => base,
        };

        limit.min(pending).max(1)
    }

    /// Run every script in `batch` and return the session holding one result per script.
    ///
    /// Once `cancel` fires, scripts that have not started are recorded as cancelled;
    /// running scripts are left to finish.
    #[tracing::instrument(
        name = "orchestrator.run",
        skip_all,
        fields(run_id, label = %batch.label(), total = batch.len(), mode = %self.opts.mode)
    )]
    pub async fn run(&self, batch: Batch, cancel: CancellationToken) -> RunSession {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        let mut session = RunSession::new(run_id.clone(), batch.label().to_string(), self.opts.mode);

        if batch.is_empty() {
            tracing::info!(subject = batch.subject(), "no scripts to run");
            self.emit(&RenderEvent::NoScripts {
                run_id,
                label: batch.subject().to_string(),
            });
            session.finish();
            return session;
        }

        let total = batch.len();
        if self.opts.mode == ExecutionMode::Background {
            if let Some(strategy) = &self.concurrency_strategy {
                strategy.observe().await;
            }
        }
        let limit = self.concurrency_for(total);
        tracing::info!(limit, "batch starting");
        self.emit(&RenderEvent::RunStart {
            run_id: run_id.clone(),
            label: batch.label().to_string(),
            mode: self.opts.mode,
            total_scripts: total,
        });

        let (tx, mut rx) = mpsc::channel(self.opts.channel_capacity);
        let producer = schedule(self.engine.clone(), batch.into_requests(), limit, tx, cancel);

        let mut progress = ProgressMonitor::new(total, self.opts.progress_bar, self.opts.ascii);
        let collector = async {
            while let Some(event) = rx.recv().await {
                match event {
                    WorkerEvent::Started(request) => {
                        progress.start_script(&request.script.path().display().to_string());
                        self.emit(&RenderEvent::ScriptStart {
                            run_id: run_id.clone(),
                            script: request.script,
                        });
                    }
                    WorkerEvent::Finished(result) => {
                        progress.complete_script(
                            &result.script.path().display().to_string(),
                            result.verdict.is_pass(),
                            result.duration_ms,
                        );
                        self.emit(&RenderEvent::ScriptComplete {
                            run_id: run_id.clone(),
                            result: result.clone(),
                        });
                        session.push(result);
                    }
                }
            }
        };

        tokio::join!(producer, collector);

        session.finish();
        let summary = session.summary();
        progress.finish(summary.all_passed());
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            duration_ms = summary.duration_ms,
            "batch finished"
        );
        self.emit(&RenderEvent::RunEnd { run_id, summary });
        session
    }

    /// Run `batch` on its own task so the caller is never blocked.
    pub fn spawn(self: &Arc<Self>, batch: Batch, cancel: CancellationToken) -> JoinHandle<RunSession> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run(batch, cancel).await })
    }

    fn emit(&self, event: &RenderEvent) {
        for renderer in &self.renderers {
            renderer.render(event);
        }
    }
}
