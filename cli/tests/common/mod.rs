#![allow(dead_code)]

use std::fs;
use std::path::Path;

use clap::Parser;
use cisrun_cli::app;
use cisrun_cli::commands::cli::Args;
use cisrun_core::api::{AppConfig, CliError};
use tokio_util::sync::CancellationToken;

/// `<root>/ubuntu/v22.04/...` with one passing check and one failing fix.
pub fn scripts_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let base = dir.path().join("ubuntu/v22.04");
    write(&base.join("a/chk1.sh"), "echo 'ok'\n");
    write(&base.join("a/rem1.sh"), "echo 'FAIL: not applied'\n");
    write(&base.join("b/chk2.sh"), "echo 'ok'\n");
    dir
}

pub fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, body).expect("write script");
}

/// Run the front-end in-process the way `main` does, minus tracing and Ctrl-C.
pub async fn cisrun(argv: &[&str]) -> Result<i32, CliError> {
    cisrun_with_cancel(argv, CancellationToken::new()).await
}

pub async fn cisrun_with_cancel(argv: &[&str], cancel: CancellationToken) -> Result<i32, CliError> {
    let mut full = vec!["cisrun"];
    full.extend_from_slice(argv);
    let args = Args::try_parse_from(full).expect("valid arguments");

    let mut cfg = AppConfig::default();
    app::apply_overrides(&mut cfg, &args.global);
    app::run_app(args, cfg, cancel).await
}
