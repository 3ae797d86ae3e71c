use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// How a script is launched. Derived from its extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    /// `.sh`, run under the shell interpreter.
    Shell,
    /// `.py`, run under the Python 3 interpreter.
    Interpreted,
}

impl ScriptKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "sh" => Some(Self::Shell),
            "py" => Some(Self::Interpreted),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ResolveError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or_else(|| ResolveError::Unsupported {
            path: path.to_path_buf(),
            extension: ext.into_owned(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Interpreted => "interpreted",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, runnable script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScriptRef {
    path: PathBuf,
    kind: ScriptKind,
}

impl ScriptRef {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ResolveError> {
        let path = path.into();
        let kind = ScriptKind::from_path(&path)?;
        Ok(Self { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// File name for status lines, falling back to the full path.
    pub fn name(&self) -> Cow<'_, str> {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => self.path.to_string_lossy(),
        }
    }
}
