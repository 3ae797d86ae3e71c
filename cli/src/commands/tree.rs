use std::fmt::Write;

use cisrun_core::api::{scan, AppConfig, Catalog, CliError, ScriptKind, ScriptNode};

use crate::app::EXIT_OK;

pub fn run_tree(cfg: &AppConfig) -> Result<i32, CliError> {
    let catalog = scan(cfg.scripts.catalog_root())?;
    print!("{}", render_tree(&catalog, cfg.output.ascii_only));
    for warning in catalog.warnings() {
        eprintln!("warning: {}: {}", warning.path.display(), warning.message);
    }
    Ok(EXIT_OK)
}

/// Indented listing of the catalog, directories first marked with a trailing slash.
/// Files that cannot be run are flagged so the operator knows why they never execute.
pub fn render_tree(catalog: &Catalog, ascii: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog.root().path().display());
    render_children(catalog.root(), "", ascii, &mut out);
    out
}

fn render_children(node: &ScriptNode, prefix: &str, ascii: bool, out: &mut String) {
    let (tee, elbow, pipe, blank) = if ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    let children = node.children();
    for (idx, child) in children.iter().enumerate() {
        let last = idx + 1 == children.len();
        let branch = if last { elbow } else { tee };
        if child.is_dir() {
            let _ = writeln!(out, "{prefix}{branch}{}/", child.name());
            let next = format!("{prefix}{}", if last { blank } else { pipe });
            render_children(child, &next, ascii, out);
        } else if ScriptKind::from_path(child.path()).is_ok() {
            let _ = writeln!(out, "{prefix}{branch}{}", child.name());
        } else {
            let _ = writeln!(out, "{prefix}{branch}{} (not runnable)", child.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cisrun_core::api::scan;
    use std::fs;

    #[test]
    fn renders_nested_tree_in_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/chk1.sh"), "").unwrap();
        fs::write(dir.path().join("a/notes.txt"), "").unwrap();
        fs::write(dir.path().join("b/rem1.py"), "").unwrap();

        let catalog = scan(dir.path()).unwrap();
        let text = render_tree(&catalog, true);
        let body: Vec<&str> = text.lines().skip(1).collect();

        assert_eq!(
            body,
            vec![
                "|-- a/",
                "|   |-- chk1.sh",
                "|   `-- notes.txt (not runnable)",
                "`-- b/",
                "    `-- rem1.py",
            ]
        );
    }
}
