use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub interpreters: InterpretersConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub batches: BatchesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the script tree lives. Scripts are laid out as `<root>/<os>/<version>/...`;
/// when `os` (and optionally `version`) is set the catalog starts below that level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    #[serde(default = "default_scripts_root")]
    pub root: String,

    #[serde(default)]
    pub os: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

fn default_scripts_root() -> String {
    "./scripts".to_string()
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            root: default_scripts_root(),
            os: None,
            version: None,
        }
    }
}

impl ScriptsConfig {
    /// The scripts root with `~` expanded, without the os/version suffix.
    pub fn base_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.root).into_owned())
    }

    /// The directory the catalog scans.
    pub fn catalog_root(&self) -> PathBuf {
        let mut root = self.base_dir();
        if let Some(os) = self.os.as_deref().filter(|s| !s.trim().is_empty()) {
            root.push(os);
            if let Some(version) = self.version.as_deref().filter(|s| !s.trim().is_empty()) {
                root.push(version);
            }
        }
        root
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or `~/.cisrun/logs` if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "cisrun_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Fixed interpreter table: `.sh` runs under `shell`, `.py` under `python`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretersConfig {
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default)]
    pub shell_args: Vec<String>,

    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default)]
    pub python_args: Vec<String>,
}

fn default_shell() -> String {
    "bash".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

impl Default for InterpretersConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            shell_args: Vec::new(),
            python: default_python(),
            python_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One script at a time, results in submission order.
    Sequential,
    /// Scripts run on independent workers, results in completion order.
    #[default]
    Background,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "background" | "bg" | "parallel" => Ok(Self::Background),
            other => Err(format!("unknown execution mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Worker limit for background mode. Unset lets the concurrency strategy decide.
    #[serde(default)]
    pub max_parallel: Option<usize>,

    /// "fixed" (CPU count) or "adaptive" (scaled by current CPU load).
    #[serde(default = "default_concurrency_strategy")]
    pub concurrency: String,

    /// Per-script timeout in seconds; 0 disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long to wait for output pipes after a child exits or is killed.
    #[serde(default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,

    #[serde(default)]
    pub workdir: Option<String>,

    #[serde(default)]
    pub env: HashMap<String, String>,
}

fn default_concurrency_strategy() -> String {
    "fixed".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_drain_grace_ms() -> u64 {
    1000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            max_parallel: None,
            concurrency: default_concurrency_strategy(),
            timeout_secs: default_timeout_secs(),
            drain_grace_ms: default_drain_grace_ms(),
            workdir: None,
            env: HashMap::new(),
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn workdir(&self) -> Option<PathBuf> {
        self.workdir
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| PathBuf::from(shellexpand::tilde(s).into_owned()))
    }
}

/// Name fragments selecting the "Complete Check" and "Complete Fix" batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchesConfig {
    #[serde(default = "default_check_keyword")]
    pub check_keyword: String,

    #[serde(default = "default_fix_keyword")]
    pub fix_keyword: String,
}

fn default_check_keyword() -> String {
    "chk".to_string()
}

fn default_fix_keyword() -> String {
    "rem".to_string()
}

impl Default for BatchesConfig {
    fn default() -> Self {
        Self {
            check_keyword: default_check_keyword(),
            fix_keyword: default_fix_keyword(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "text" or "jsonl".
    #[serde(default = "default_output_format")]
    pub format: String,

    #[serde(default)]
    pub ascii_only: bool,

    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,

    /// Print stdout of passing scripts too, not just failures.
    #[serde(default)]
    pub verbose: bool,
}

fn default_output_format() -> String {
    "text".to_string()
}

fn default_progress_bar() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            ascii_only: false,
            progress_bar: default_progress_bar(),
            verbose: false,
        }
    }
}
