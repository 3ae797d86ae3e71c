use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

/// Get the default cisrun data directory: ~/.cisrun
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".cisrun"))
        .ok_or(ConfigError::HomeDir)
}

/// Load configuration with the usual lookup order and environment overrides.
///
/// Priority: `explicit` file, then `~/.cisrun/config.toml`, then `./cisrun.toml`,
/// then built-in defaults. `CISRUN_*` variables override whatever was loaded.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut cfg = match explicit {
        Some(path) => load_from(path)?,
        None => {
            let user_config = get_data_dir().ok().map(|d| d.join("config.toml"));
            let local_config = Path::new("cisrun.toml");
            match user_config.filter(|p| p.exists()) {
                Some(path) => load_from(&path)?,
                None if local_config.exists() => load_from(local_config)?,
                None => AppConfig::default(),
            }
        }
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    load(None)
}

pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory for log files when `logging.directory` is unset.
pub fn default_log_dir() -> Result<PathBuf, ConfigError> {
    Ok(get_data_dir()?.join("logs"))
}

pub(crate) fn apply_env_overrides<F>(cfg: &mut AppConfig, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| var(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CISRUN_SCRIPTS_ROOT") {
        cfg.scripts.root = v;
    }
    if let Some(v) = get("CISRUN_MODE") {
        cfg.execution.mode = v.parse().map_err(|message| ConfigError::Invalid {
            key: "CISRUN_MODE",
            message,
        })?;
    }
    if let Some(v) = get("CISRUN_MAX_PARALLEL") {
        let n = v.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
            key: "CISRUN_MAX_PARALLEL",
            message: e.to_string(),
        })?;
        cfg.execution.max_parallel = Some(n);
    }
    if let Some(v) = get("CISRUN_TIMEOUT_SECS") {
        cfg.execution.timeout_secs =
            v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "CISRUN_TIMEOUT_SECS",
                message: e.to_string(),
            })?;
    }
    Ok(())
}

pub fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.interpreters.shell.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key: "interpreters.shell",
            message: "must not be empty".into(),
        });
    }
    if cfg.interpreters.python.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key: "interpreters.python",
            message: "must not be empty".into(),
        });
    }
    if cfg.execution.max_parallel == Some(0) {
        return Err(ConfigError::Invalid {
            key: "execution.max_parallel",
            message: "must be at least 1".into(),
        });
    }
    match cfg.output.format.as_str() {
        "text" | "jsonl" => {}
        other => {
            return Err(ConfigError::Invalid {
                key: "output.format",
                message: format!("expected 'text' or 'jsonl', got '{other}'"),
            })
        }
    }
    match cfg.execution.concurrency.as_str() {
        "fixed" | "adaptive" => Ok(()),
        other => Err(ConfigError::Invalid {
            key: "execution.concurrency",
            message: format!("expected 'fixed' or 'adaptive', got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[
                ("CISRUN_SCRIPTS_ROOT", "/opt/cis"),
                ("CISRUN_MODE", "sequential"),
                ("CISRUN_MAX_PARALLEL", "3"),
                ("CISRUN_TIMEOUT_SECS", "0"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.scripts.root, "/opt/cis");
        assert_eq!(cfg.execution.mode, ExecutionMode::Sequential);
        assert_eq!(cfg.execution.max_parallel, Some(3));
        assert_eq!(cfg.execution.timeout_secs, 0);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, env(&[("CISRUN_SCRIPTS_ROOT", "  ")])).unwrap();
        assert_eq!(cfg.scripts.root, "./scripts");
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, env(&[("CISRUN_MAX_PARALLEL", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "CISRUN_MAX_PARALLEL",
                ..
            }
        ));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cisrun.toml");
        std::fs::write(&path, "[execution]\nmode = 7\n").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));

        std::fs::write(&path, "[batches]\ncheck_keyword = \"check\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.batches.check_keyword, "check");
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let mut cfg = AppConfig::default();
        cfg.execution.max_parallel = Some(0);
        assert!(validate(&cfg).is_err());
        cfg.execution.max_parallel = Some(1);
        assert!(validate(&cfg).is_ok());
    }
}
