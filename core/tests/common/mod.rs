#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cisrun_core::api::{Catalog, ScriptRef};

/// A scripts root on disk laid out like `scripts/<os>/<version>/...`.
pub struct ScriptTree {
    dir: tempfile::TempDir,
}

impl ScriptTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// The layout used by the end-to-end scenarios.
    pub fn sample() -> Self {
        let tree = Self::new();
        tree.file("a/chk1.sh", "#!/bin/bash\necho ok\n");
        tree.file("a/chk2.py", "print('ok')\n");
        tree.file("a/rem1.sh", "#!/bin/bash\necho FAIL\n");
        tree.file("a/readme.txt", "notes\n");
        tree.file("b/nested/chk3.sh", "#!/bin/bash\necho nested\n");
        tree
    }

    pub fn file(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, body).expect("write fixture");
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(&path).expect("create dir");
        path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

/// File names of `refs`, in order.
pub fn names(refs: &[ScriptRef]) -> Vec<String> {
    refs.iter().map(|r| r.name().into_owned()).collect()
}

/// Paths of the catalog relative to its root, in pre-order.
pub fn catalog_listing(catalog: &Catalog) -> Vec<String> {
    let root = catalog.root().path();
    catalog
        .root()
        .walk()
        .skip(1)
        .map(|node| {
            let rel = node.path().strip_prefix(root).unwrap_or(node.path());
            let mut line = rel.to_string_lossy().replace('\\', "/");
            if node.is_dir() {
                line.push('/');
            }
            line
        })
        .collect()
}
