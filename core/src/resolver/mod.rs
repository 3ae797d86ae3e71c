//! Turns a [`Selection`] into the ordered list of scripts to run.

mod script_ref;
mod selection;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, ScriptNode};

pub use script_ref::{ScriptKind, ScriptRef};
pub use selection::Selection;

/// Expand `selection` against the catalog.
///
/// The result keeps first-seen order and lists each path once. Files with unsupported
/// extensions are dropped, and an empty result is a normal outcome.
pub fn resolve(catalog: &Catalog, selection: &Selection) -> Vec<ScriptRef> {
    let mut resolved = Resolved::default();

    match selection {
        Selection::Explicit(paths) => {
            for path in paths {
                let Some(node) = lookup(catalog, path) else {
                    continue;
                };
                for file in node.files() {
                    resolved.push(file.path());
                }
            }
        }
        Selection::Keyword { root, keyword } => {
            if let Some(node) = lookup(catalog, root) {
                for file in node.files().filter(|f| f.name().contains(keyword.as_str())) {
                    resolved.push(file.path());
                }
            }
        }
    }

    tracing::debug!(count = resolved.refs.len(), "selection resolved");
    resolved.refs
}

fn lookup<'a>(catalog: &'a Catalog, path: &Path) -> Option<&'a ScriptNode> {
    let node = catalog.find(path);
    if node.is_none() {
        tracing::warn!(path = %path.display(), "selected path is not in the catalog");
    }
    node
}

#[derive(Default)]
struct Resolved {
    seen: HashSet<PathBuf>,
    refs: Vec<ScriptRef>,
}

impl Resolved {
    fn push(&mut self, path: &Path) {
        if self.seen.contains(path) {
            return;
        }
        match ScriptRef::from_path(path) {
            Ok(script) => {
                self.seen.insert(path.to_path_buf());
                self.refs.push(script);
            }
            Err(err) => tracing::debug!("excluded: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::scan;
    use std::fs;

    fn tree(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for rel in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn names(refs: &[ScriptRef]) -> Vec<String> {
        refs.iter().map(|r| r.name().into_owned()).collect()
    }

    #[test]
    fn directory_selection_takes_supported_descendants_only() {
        let dir = tree(&[
            "a/chk1.sh",
            "a/notes.txt",
            "a/sub/chk2.py",
            "b/chk3.sh",
        ]);
        let catalog = scan(dir.path()).unwrap();

        let refs = resolve(&catalog, &Selection::explicit([dir.path().join("a")]));
        assert_eq!(names(&refs), ["chk1.sh", "chk2.py"]);
        for r in &refs {
            assert!(r.path().starts_with(dir.path().join("a")));
        }
    }

    #[test]
    fn overlapping_selection_is_deduplicated_in_first_seen_order() {
        let dir = tree(&["a/x.sh", "a/sub/y.sh", "z.py"]);
        let catalog = scan(dir.path()).unwrap();
        let selection = Selection::explicit([
            dir.path().join("z.py"),
            dir.path().join("a/sub"),
            dir.path().join("a"),
            dir.path().join("a/x.sh"),
        ]);

        let refs = resolve(&catalog, &selection);
        assert_eq!(names(&refs), ["z.py", "y.sh", "x.sh"]);
    }

    #[test]
    fn unsupported_only_selection_is_empty() {
        let dir = tree(&["a/readme.md", "a/run.bat", "b.txt"]);
        let catalog = scan(dir.path()).unwrap();
        let selection = Selection::explicit([dir.path().join("a/readme.md"), dir.path().join("b.txt")]);
        assert!(resolve(&catalog, &selection).is_empty());
    }

    #[test]
    fn unknown_paths_are_skipped() {
        let dir = tree(&["a/x.sh"]);
        let catalog = scan(dir.path()).unwrap();
        let selection = Selection::explicit([dir.path().join("missing.sh"), dir.path().join("a/x.sh")]);
        assert_eq!(names(&resolve(&catalog, &selection)), ["x.sh"]);
    }

    #[test]
    fn keyword_matches_file_names_and_rechecks_extension() {
        let dir = tree(&["chk1.sh", "chk2.py", "chk_notes.txt", "remediate.sh", "chk/plain.sh"]);
        let catalog = scan(dir.path()).unwrap();

        let refs = resolve(&catalog, &Selection::keyword(dir.path(), "chk"));
        assert_eq!(names(&refs), ["chk1.sh", "chk2.py"]);
    }

    #[test]
    fn keyword_without_matches_is_empty() {
        let dir = tree(&["a/chk1.sh"]);
        let catalog = scan(dir.path()).unwrap();
        assert!(resolve(&catalog, &Selection::keyword(dir.path(), "rem")).is_empty());
        assert!(resolve(&catalog, &Selection::keyword(dir.path().join("nope"), "chk")).is_empty());
    }
}
