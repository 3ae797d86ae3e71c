use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Signal {
    Kill,
    Term,
}

/// A fully resolved command line for one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerStartArgs {
    pub cmd: String,
    pub args: Vec<OsString>,
    pub envs: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
}

/// How a child process ended. `code` is `None` when it was terminated by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
}

impl ExitInfo {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitInfo {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}
