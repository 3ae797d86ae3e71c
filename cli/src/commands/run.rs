use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use cisrun_core::api::{
    scan, AppConfig, Batch, Catalog, CliError, NamedBatch, Selection,
};
use cisrun_plugins::factory;
use tokio_util::sync::CancellationToken;

use crate::app::{execution_opts, exit_code_for_session, EXIT_CANCELLED};
use crate::utils::{confirm, under_root};

fn load_catalog(cfg: &AppConfig) -> Result<Catalog, CliError> {
    let catalog = scan(cfg.scripts.catalog_root())?;
    for warning in catalog.warnings() {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
    }
    Ok(catalog)
}

pub async fn run_paths(
    cfg: &AppConfig,
    paths: &[PathBuf],
    yes: bool,
    cancel: CancellationToken,
) -> Result<i32, CliError> {
    let catalog = load_catalog(cfg)?;
    let root = catalog.root().path().to_path_buf();
    let selection = Selection::explicit(paths.iter().map(|p| under_root(&root, p)));
    run_batch(cfg, Batch::from_selection(&catalog, &selection), yes, cancel).await
}

pub async fn run_named(
    cfg: &AppConfig,
    which: NamedBatch,
    yes: bool,
    cancel: CancellationToken,
) -> Result<i32, CliError> {
    let catalog = load_catalog(cfg)?;
    let root = catalog.root().path().to_path_buf();
    let batch = Batch::named(&catalog, &root, which, &cfg.batches);
    run_batch(cfg, batch, yes, cancel).await
}

pub async fn run_keyword(
    cfg: &AppConfig,
    keyword: &str,
    yes: bool,
    cancel: CancellationToken,
) -> Result<i32, CliError> {
    let catalog = load_catalog(cfg)?;
    let root = catalog.root().path().to_path_buf();
    let batch = Batch::from_selection(&catalog, &Selection::keyword(root, keyword));
    run_batch(cfg, batch, yes, cancel).await
}

/// Confirm (when interactive), then run `batch` off the current task and wait for it.
pub async fn run_batch(
    cfg: &AppConfig,
    batch: Batch,
    yes: bool,
    cancel: CancellationToken,
) -> Result<i32, CliError> {
    if !batch.is_empty() && !yes && atty::is(atty::Stream::Stdin) {
        let prompt = format!("Run {} script(s) for '{}'?", batch.len(), batch.subject());
        let stdin = io::stdin();
        if !confirm(&prompt, &mut stdin.lock(), &mut io::stderr())? {
            eprintln!("Aborted.");
            return Ok(EXIT_CANCELLED);
        }
    }
    // Ctrl-C while the prompt was waiting.
    if cancel.is_cancelled() {
        return Ok(EXIT_CANCELLED);
    }

    let opts = execution_opts(cfg, atty::is(atty::Stream::Stderr));
    let orchestrator = Arc::new(factory::build_orchestrator(cfg, opts, Vec::new())?);
    tracing::debug!(label = batch.label(), scripts = batch.len(), mode = %orchestrator.mode(), "dispatching batch");

    let session = orchestrator
        .spawn(batch, cancel.clone())
        .await
        .map_err(cisrun_core::api::ExecutorError::from)?;

    Ok(exit_code_for_session(&session, cancel.is_cancelled()))
}
