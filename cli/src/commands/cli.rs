use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Sequential,
    Background,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Jsonl,
}

impl FormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Jsonl => "jsonl",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cisrun", version, about = "Browse and run compliance check/remediation scripts")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file to use instead of ~/.cisrun/config.toml or ./cisrun.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scripts root, laid out as <root>/<os>/<version>/...
    #[arg(long, global = true)]
    pub root: Option<String>,

    #[arg(long, global = true)]
    pub os: Option<String>,

    #[arg(long = "os-version", global = true)]
    pub os_version: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub mode: Option<ModeArg>,

    /// Upper bound on scripts running at once in background mode.
    #[arg(long, global = true)]
    pub max_parallel: Option<usize>,

    /// Per-script timeout; 0 disables it.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Do not ask before running scripts.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Show output of passing scripts too.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Script files or directories, relative to the scripts root.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GrepArgs {
    /// Run every script whose file name contains this text.
    pub keyword: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the script tree.
    Tree,
    /// List the OS/version pairs available under the scripts root.
    Targets,
    /// Run the selected scripts and directories.
    Run(RunArgs),
    /// Run every audit script ("Complete Check").
    Check,
    /// Run every remediation script ("Complete Fix").
    Fix,
    /// Run scripts matching a name fragment.
    Grep(GrepArgs),
}
