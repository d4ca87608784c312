//! # Runtime Configuration Module
//!
//! Application settings loaded from an optional YAML file and overridden by
//! environment variables.
//!
//! ## File format
//!
//! ```yaml
//! views_dir: ./views
//! debug: false
//! log:
//!   log_level: info
//!   format: pretty
//! ```
//!
//! Every key is optional.
//!
//! ## Environment Variables
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `WAYPOINT_VIEWS_DIR` | directory searched for views before the built-ins |
//! | `WAYPOINT_DEBUG` | `1`/`true`/`yes` shows error messages on error pages |
//! | `WAYPOINT_LOG_LEVEL` | base log level when `RUST_LOG` is unset |
//! | `WAYPOINT_LOG_FORMAT` | `json` or `pretty` |
//! | `WAYPOINT_LOG_TARGET_FILTER` | extra filter directives |
//!
//! ## Usage
//!
//! ```rust
//! use waypoint::runtime_config::AppConfig;
//!
//! let config = AppConfig::from_env();
//! println!("debug pages: {}", config.debug);
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::telemetry::LogConfig;

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding application views
    pub views_dir: Option<PathBuf>,
    /// Show error messages on error pages
    pub debug: bool,
    pub log: LogConfig,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Parse a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("invalid configuration")
    }

    /// Load a YAML file. Relative `views_dir` paths are resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml(&source)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if let (Some(dir), Some(base)) = (&config.views_dir, path.parent()) {
            if dir.is_relative() {
                config.views_dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    /// Load `path` if given, then apply environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Override fields from variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("WAYPOINT_VIEWS_DIR").filter(|d| !d.is_empty()) {
            self.views_dir = Some(PathBuf::from(dir));
        }
        if let Some(debug) = lookup("WAYPOINT_DEBUG").as_deref().and_then(parse_flag) {
            self.debug = debug;
        }
        self.log.apply_env(lookup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.views_dir, None);
        assert!(!config.debug);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_from_yaml() {
        let config = AppConfig::from_yaml(
            "views_dir: /srv/views\ndebug: true\nlog:\n  format: pretty\n",
        )
        .unwrap();
        assert_eq!(config.views_dir, Some(PathBuf::from("/srv/views")));
        assert!(config.debug);
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.log.log_level, "info");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(AppConfig::from_yaml("debg: true\n").is_err());
    }

    #[test]
    fn test_load_resolves_relative_views_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoint.yaml");
        fs::write(&path, "views_dir: views\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.views_dir, Some(dir.path().join("views")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WAYPOINT_VIEWS_DIR", "/tmp/views"),
            ("WAYPOINT_DEBUG", "yes"),
            ("WAYPOINT_LOG_LEVEL", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.views_dir, Some(PathBuf::from("/tmp/views")));
        assert!(config.debug);
        assert_eq!(config.log.log_level, "warn");
    }

    #[test]
    fn test_invalid_debug_flag_is_ignored() {
        let mut config = AppConfig {
            debug: true,
            ..AppConfig::default()
        };
        config.apply_env(|key| (key == "WAYPOINT_DEBUG").then(|| "perhaps".to_string()));
        assert!(config.debug);
    }
}
