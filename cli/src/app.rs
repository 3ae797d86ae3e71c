//! Front-end assembly: merge flags into config, pick exit codes, dispatch subcommands.

use cisrun_core::api::{
    AppConfig, CatalogError, CliError, ExecutionMode, ExecutionOpts, NamedBatch, RunSession,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::commands::cli::{Args, Commands, GlobalArgs, ModeArg};
use crate::commands::{run, targets, tree};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_NOTHING_TO_RUN: i32 = 3;
pub const EXIT_CONFIG: i32 = 11;
pub const EXIT_ROOT_MISSING: i32 = 12;
pub const EXIT_IO: i32 = 20;
pub const EXIT_INTERNAL: i32 = 50;
pub const EXIT_CANCELLED: i32 = 130;

/// Command-line flags win over config files and environment.
pub fn apply_overrides(cfg: &mut AppConfig, args: &GlobalArgs) {
    if let Some(root) = &args.root {
        cfg.scripts.root = root.clone();
    }
    if let Some(os) = &args.os {
        cfg.scripts.os = Some(os.clone());
    }
    if let Some(version) = &args.os_version {
        cfg.scripts.version = Some(version.clone());
    }
    if let Some(mode) = args.mode {
        cfg.execution.mode = match mode {
            ModeArg::Sequential => ExecutionMode::Sequential,
            ModeArg::Background => ExecutionMode::Background,
        };
    }
    if let Some(n) = args.max_parallel {
        cfg.execution.max_parallel = Some(n);
    }
    if let Some(secs) = args.timeout_secs {
        cfg.execution.timeout_secs = secs;
    }
    if let Some(format) = args.format {
        cfg.output.format = format.as_str().to_string();
    }
    if args.verbose {
        cfg.output.verbose = true;
    }
}

/// Orchestrator options for this terminal. The progress display needs a terminal on stderr.
pub fn execution_opts(cfg: &AppConfig, stderr_is_tty: bool) -> ExecutionOpts {
    let mut opts = ExecutionOpts::from_config(cfg);
    opts.progress_bar &= stderr_is_tty;
    opts
}

pub fn exit_code_for_session(session: &RunSession, cancelled: bool) -> i32 {
    let summary = session.summary();
    if cancelled && summary.cancelled > 0 {
        EXIT_CANCELLED
    } else if summary.total == 0 {
        EXIT_NOTHING_TO_RUN
    } else if summary.all_passed() {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}

pub fn exit_code_for_error(e: &CliError) -> i32 {
    match e {
        CliError::Config(_) => EXIT_CONFIG,
        CliError::Catalog(CatalogError::NotFound(_) | CatalogError::NotADirectory(_)) => {
            EXIT_ROOT_MISSING
        }
        CliError::Catalog(CatalogError::Io { .. }) => EXIT_IO,
        CliError::Io(_) => EXIT_IO,
        CliError::Command(_) => EXIT_IO,
        CliError::Executor(_) => EXIT_INTERNAL,
        CliError::Anyhow(_) => EXIT_INTERNAL,
    }
}

/// React to Ctrl-C presses delivered on `interrupts`.
///
/// The first one cancels the batch: unstarted scripts are skipped, running ones finish.
/// Returns `true` on the second press, when the caller should exit without waiting,
/// and `false` if the sender goes away first.
pub async fn watch_interrupts(
    mut interrupts: mpsc::UnboundedReceiver<()>,
    cancel: CancellationToken,
) -> bool {
    if interrupts.recv().await.is_none() {
        return false;
    }
    tracing::warn!("interrupted, skipping scripts that have not started");
    eprintln!("Interrupted: waiting for running scripts to finish (Ctrl-C again to exit now)...");
    cancel.cancel();

    interrupts.recv().await.is_some()
}

#[tracing::instrument(name = "cli.run_app", skip_all)]
pub async fn run_app(args: Args, cfg: AppConfig, cancel: CancellationToken) -> Result<i32, CliError> {
    let yes = args.global.yes;
    match args.command {
        Commands::Tree => tree::run_tree(&cfg),
        Commands::Targets => targets::run_targets(&cfg),
        Commands::Run(run_args) => run::run_paths(&cfg, &run_args.paths, yes, cancel).await,
        Commands::Check => run::run_named(&cfg, NamedBatch::Check, yes, cancel).await,
        Commands::Fix => run::run_named(&cfg, NamedBatch::Fix, yes, cancel).await,
        Commands::Grep(grep) => run::run_keyword(&cfg, &grep.keyword, yes, cancel).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli::FormatArg;
    use std::path::PathBuf;

    #[test]
    fn flags_override_config() {
        let mut cfg = AppConfig::default();
        let args = GlobalArgs {
            root: Some("/srv/scripts".into()),
            os: Some("ubuntu".into()),
            os_version: Some("v22.04".into()),
            mode: Some(ModeArg::Sequential),
            max_parallel: Some(2),
            timeout_secs: Some(0),
            format: Some(FormatArg::Jsonl),
            verbose: true,
            ..GlobalArgs::default()
        };

        apply_overrides(&mut cfg, &args);

        assert_eq!(cfg.scripts.catalog_root(), PathBuf::from("/srv/scripts/ubuntu/v22.04"));
        assert_eq!(cfg.execution.mode, ExecutionMode::Sequential);
        assert_eq!(cfg.execution.max_parallel, Some(2));
        assert!(cfg.execution.timeout().is_none());
        assert_eq!(cfg.output.format, "jsonl");
        assert!(cfg.output.verbose);
    }

    #[test]
    fn progress_bar_needs_a_terminal() {
        let cfg = AppConfig::default();
        assert!(!execution_opts(&cfg, false).progress_bar);
        assert!(execution_opts(&cfg, true).progress_bar);
    }

    #[tokio::test]
    async fn first_interrupt_cancels_second_exits() {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(watch_interrupts(rx, cancel.clone()));

        tx.send(()).unwrap();
        cancel.cancelled().await;
        assert!(!watcher.is_finished());

        tx.send(()).unwrap();
        assert!(watcher.await.unwrap());
    }

    #[tokio::test]
    async fn closed_interrupt_source_does_not_force_exit() {
        let (tx, rx) = mpsc::unbounded_channel::<()>();
        let cancel = CancellationToken::new();
        drop(tx);
        assert!(!watch_interrupts(rx, cancel.clone()).await);
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn missing_root_maps_to_its_own_exit_code() {
        let err = CliError::Catalog(CatalogError::NotFound(PathBuf::from("/nope")));
        assert_eq!(exit_code_for_error(&err), EXIT_ROOT_MISSING);
        let err = CliError::Command("boom".into());
        assert_eq!(exit_code_for_error(&err), EXIT_IO);
    }
}
