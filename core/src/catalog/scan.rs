use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::CatalogError;

use super::node::ScriptNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Symlink,
    Unreadable,
    Special,
}

/// An entry the scan skipped instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

/// In-memory mirror of a script directory, produced by one [`scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    root: ScriptNode,
    warnings: Vec<ScanWarning>,
}

impl Catalog {
    pub fn root(&self) -> &ScriptNode {
        &self.root
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn find(&self, path: &Path) -> Option<&ScriptNode> {
        self.root.find(path)
    }

    /// Scan the same root again. The result replaces this catalog wholesale.
    pub fn rescan(&self) -> Result<Catalog, CatalogError> {
        scan(self.root.path())
    }
}

/// Walk `root` into a [`Catalog`].
///
/// Entries are visited in byte-wise file name order at every level so an unchanged
/// tree always scans to the same catalog. Symbolic links, special files and entries
/// that cannot be read are skipped and reported as warnings.
#[tracing::instrument(name = "catalog.scan", skip_all, fields(root = %root.as_ref().display()))]
pub fn scan(root: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let root = root.as_ref();
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CatalogError::NotFound(root.to_path_buf()))
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: root.to_path_buf(),
                source,
            })
        }
    };
    if !meta.is_dir() {
        return Err(CatalogError::NotADirectory(root.to_path_buf()));
    }

    let mut top = ScriptNode::directory(root.to_path_buf(), display_name(root));
    // Directories currently open below `top`; `open[d - 1]` sits at depth `d`.
    let mut open: Vec<ScriptNode> = Vec::new();
    let mut warnings = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                record(&mut warnings, path, WarningKind::Unreadable, err.to_string());
                continue;
            }
        };

        close_until(&mut top, &mut open, entry.depth() - 1);

        let path = entry.path().to_path_buf();
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            record(
                &mut warnings,
                path,
                WarningKind::Symlink,
                "symbolic link skipped".into(),
            );
        } else if file_type.is_dir() {
            open.push(ScriptNode::directory(path, name));
        } else if file_type.is_file() {
            parent_of(&mut top, &mut open).push_child(ScriptNode::file(path, name));
        } else {
            record(
                &mut warnings,
                path,
                WarningKind::Special,
                "not a regular file".into(),
            );
        }
    }
    close_until(&mut top, &mut open, 0);

    tracing::debug!(
        files = top.file_count(),
        warnings = warnings.len(),
        "catalog scanned"
    );

    Ok(Catalog {
        root: top,
        warnings,
    })
}

fn parent_of<'a>(top: &'a mut ScriptNode, open: &'a mut [ScriptNode]) -> &'a mut ScriptNode {
    match open.last_mut() {
        Some(dir) => dir,
        None => top,
    }
}

fn close_until(top: &mut ScriptNode, open: &mut Vec<ScriptNode>, depth: usize) {
    while open.len() > depth {
        let Some(done) = open.pop() else { break };
        parent_of(top, open).push_child(done);
    }
}

fn record(warnings: &mut Vec<ScanWarning>, path: PathBuf, kind: WarningKind, message: String) {
    tracing::warn!(path = %path.display(), ?kind, "{}", message);
    warnings.push(ScanWarning {
        path,
        kind,
        message,
    });
}

fn display_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}
