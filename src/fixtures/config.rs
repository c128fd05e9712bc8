//! Fixture root configuration (stagehand.toml)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// The three roots every other component derives paths from.
///
/// Constructed once at startup and passed by reference; nothing in the
/// crate reaches for these locations through globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Base project trees, the source of truth.
    pub projects_root: PathBuf,
    /// One directory per registered overlay fixture.
    pub fixtures_root: PathBuf,
    /// Ephemeral materialized output, under the OS temp dir by default.
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
}

fn default_workspace_root() -> PathBuf {
    env::temp_dir().join("stagehand-projects")
}

impl FixtureConfig {
    /// Conventional layout under a system-tests base directory:
    /// `<base>/projects` and `<base>/project-fixtures`.
    pub fn from_base(base: &Path) -> Self {
        Self {
            projects_root: base.join("projects"),
            fixtures_root: base.join("project-fixtures"),
            workspace_root: default_workspace_root(),
        }
    }

    /// Load roots from a stagehand.toml file. Relative roots are anchored
    /// to the directory containing the config file.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", config_path.display(), e)))?;

        let mut config: FixtureConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(base) = config_path.parent() {
            config.projects_root = anchor(base, config.projects_root);
            config.fixtures_root = anchor(base, config.fixtures_root);
            config.workspace_root = anchor(base, config.workspace_root);
        }

        Ok(config)
    }
}

fn anchor(base: &Path, root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        root
    } else {
        base.join(root)
    }
}
