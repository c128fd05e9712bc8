//! Registry of overlay fixture directories
//!
//! Built once by listing the fixtures root at startup; immutable after
//! that. A failure to read the root is fatal to the caller, not retried
//! per operation.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to list fixtures root {0}: {1}")]
    ReadError(String, std::io::Error),
}

#[derive(Debug, Clone)]
pub struct FixtureRegistry {
    names: BTreeSet<String>,
}

impl FixtureRegistry {
    /// List the fixtures root and keep directory entries only.
    pub fn load(fixtures_root: &Path) -> Result<Self, RegistryError> {
        let mut names = BTreeSet::new();

        let entries = fs::read_dir(fixtures_root)
            .map_err(|e| RegistryError::ReadError(fixtures_root.display().to_string(), e))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| RegistryError::ReadError(fixtures_root.display().to_string(), e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| RegistryError::ReadError(fixtures_root.display().to_string(), e))?;
            if file_type.is_dir() {
                names.insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        debug!(count = names.len(), "Fixture registry loaded");
        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Registered names in sorted order, as quoted back in validation
    /// errors.
    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
