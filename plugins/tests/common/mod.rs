#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cisrun_core::api::{
    BatchOrchestrator, EngineOpts, ExecutionEngine, ExecutionOpts, InterpreterTable,
    OutputRendererPlugin,
};
use cisrun_plugins::runner::ProcessRunnerPlugin;

pub struct ScriptDir {
    dir: tempfile::TempDir,
}

impl ScriptDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, body).expect("write script");
        path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

pub fn engine_opts() -> EngineOpts {
    EngineOpts {
        timeout: Some(Duration::from_secs(30)),
        drain_grace: Duration::from_millis(300),
        ..EngineOpts::default()
    }
}

pub fn orchestrator(
    interpreters: InterpreterTable,
    engine_opts: EngineOpts,
    opts: ExecutionOpts,
    renderers: Vec<Arc<dyn OutputRendererPlugin>>,
) -> BatchOrchestrator {
    let engine = ExecutionEngine::new(Arc::new(ProcessRunnerPlugin::new()), interpreters, engine_opts);
    let mut builder = BatchOrchestrator::builder(Arc::new(engine)).opts(opts);
    for renderer in renderers {
        builder = builder.renderer(renderer);
    }
    builder.build().expect("valid orchestrator options")
}
