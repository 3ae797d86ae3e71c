use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The child process for a script could not be started.
///
/// A script that starts and exits non-zero is not a launch error; it is recorded as a
/// normal result and classified from its output.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("interpreter '{program}' not found (script {})", script.display())]
    InterpreterNotFound { program: String, script: PathBuf },

    #[error("permission denied starting '{program}' (script {})", script.display())]
    PermissionDenied { program: String, script: PathBuf },

    #[error("failed to start '{program}' for {}: {source}", script.display())]
    Spawn {
        program: String,
        script: PathBuf,
        source: io::Error,
    },

    #[error("lost child process for {}: {source}", script.display())]
    Wait { script: PathBuf, source: io::Error },
}

impl LaunchError {
    pub fn from_spawn(program: &str, script: &Path, err: io::Error) -> Self {
        let program = program.to_string();
        let script = script.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::InterpreterNotFound { program, script },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { program, script },
            _ => Self::Spawn {
                program,
                script,
                source: err,
            },
        }
    }

    pub fn script(&self) -> &Path {
        match self {
            Self::InterpreterNotFound { script, .. }
            | Self::PermissionDenied { script, .. }
            | Self::Spawn { script, .. }
            | Self::Wait { script, .. } => script,
        }
    }
}
