use std::fs;
use std::io;
use std::path::Path;

use cisrun_core::api::{AppConfig, CatalogError, CliError};

use crate::app::EXIT_OK;

pub fn run_targets(cfg: &AppConfig) -> Result<i32, CliError> {
    let base = cfg.scripts.base_dir();
    if !base.is_dir() {
        return Err(CatalogError::NotFound(base).into());
    }
    let targets = list_targets(&base)?;
    if targets.is_empty() {
        println!("No OS directories under '{}'.", base.display());
    } else {
        print!("{}", render_targets(&targets));
    }
    Ok(EXIT_OK)
}

/// One `<os>/<version>` directory under the scripts root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub os: String,
    pub versions: Vec<String>,
}

/// OS directories under `base` and the version directories inside each, sorted by name.
pub fn list_targets(base: &Path) -> io::Result<Vec<Target>> {
    let mut targets = Vec::new();
    for os in sorted_subdirs(base)? {
        let versions = sorted_subdirs(&base.join(&os))?;
        targets.push(Target { os, versions });
    }
    Ok(targets)
}

fn sorted_subdirs(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

pub fn render_targets(targets: &[Target]) -> String {
    let mut out = String::new();
    for target in targets {
        if target.versions.is_empty() {
            out.push_str(&format!("{}\n", target.os));
        }
        for version in &target.versions {
            out.push_str(&format!("{}/{}\n", target.os, version));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_os_and_versions_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ubuntu/v22.04")).unwrap();
        fs::create_dir_all(dir.path().join("ubuntu/v20.04")).unwrap();
        fs::create_dir_all(dir.path().join("rhel")).unwrap();
        fs::write(dir.path().join("README"), "").unwrap();

        let targets = list_targets(dir.path()).unwrap();
        assert_eq!(
            render_targets(&targets),
            "rhel\nubuntu/v20.04\nubuntu/v22.04\n"
        );
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_targets(&dir.path().join("nope")).is_err());
    }
}
