use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scanning the script root.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Directory '{}' not found.", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A selected path that cannot become a runnable script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unsupported script type '{extension}' for {}", path.display())]
    Unsupported { path: PathBuf, extension: String },
}
