//! Configuration loading and management
//!
//! Handles parsing of `taskman.toml`, found in the platform config dir.
//! Settings cover the data directory and defaults applied to new tasks.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::task::{Category, Priority};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override (flag and env still take precedence)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Defaults for new tasks
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Default field values for new tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_priority")]
    pub priority: String,

    #[serde(default = "default_category")]
    pub category: String,
}

fn default_priority() -> String {
    "medium".to_string()
}

fn default_category() -> String {
    "other".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            category: default_category(),
        }
    }
}

impl DefaultsConfig {
    pub fn priority(&self) -> Result<Priority> {
        Priority::parse(&self.priority)
            .map_err(|_| invalid("defaults.priority", &self.priority))
    }

    pub fn category(&self) -> Result<Category> {
        Category::parse(&self.category)
            .map_err(|_| invalid("defaults.category", &self.category))
    }
}

fn invalid(field: &str, value: &str) -> Error {
    Error::InvalidConfig(format!("{field}: invalid value '{value}'"))
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the platform config dir, or return defaults when the file
    /// does not exist. A present but malformed file is an error.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Path of the config file in the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "taskman").map(|dirs| dirs.config_dir().join("taskman.toml"))
    }

    fn validate(&self) -> Result<()> {
        self.defaults.priority()?;
        self.defaults.category()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert!(cfg.data_dir.is_none());
        assert_eq!(cfg.defaults.priority().unwrap(), Priority::Medium);
        assert_eq!(cfg.defaults.category().unwrap(), Category::Other);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskman.toml");
        let content = r#"
data_dir = "/tmp/taskman-data"

[defaults]
priority = "high"
category = "work"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/taskman-data")));
        assert_eq!(cfg.defaults.priority().unwrap(), Priority::High);
        assert_eq!(cfg.defaults.category().unwrap(), Category::Work);
    }

    #[test]
    fn invalid_defaults_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskman.toml");
        fs::write(&path, "[defaults]\npriority = \"urgent\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskman.toml");
        fs::write(&path, "defaults = [").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
