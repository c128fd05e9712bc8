//! Canonical path derivation from the configured roots
//!
//! Pure functions of (root, identifier) with no I/O, so every other
//! component can be exercised against a scratch filesystem or none at all.
//! The same config and identifier always resolve to the same path, which
//! is what makes removal and re-scaffold idempotent.

use crate::fixtures::config::FixtureConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PathResolver {
    config: FixtureConfig,
}

impl PathResolver {
    pub fn new(config: FixtureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Source tree of a base project.
    pub fn project_source(&self, name: &str) -> PathBuf {
        self.config.projects_root.join(name)
    }

    /// Source tree of an overlay fixture.
    pub fn fixture_source(&self, name: &str) -> PathBuf {
        self.config.fixtures_root.join(name)
    }

    /// Materialized workspace for a project.
    pub fn workspace_dir(&self, name: &str) -> PathBuf {
        self.config.workspace_root.join(name)
    }

    pub fn projects_root(&self) -> &Path {
        &self.config.projects_root
    }

    pub fn fixtures_root(&self) -> &Path {
        &self.config.fixtures_root
    }

    pub fn workspace_root(&self) -> &Path {
        &self.config.workspace_root
    }
}
