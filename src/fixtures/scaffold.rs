//! Project scaffolding into the ephemeral workspace
//!
//! A scaffold is a full tree copy of a base project into its workspace
//! directory, optionally followed by an overlay fixture merged on top.
//! The overlay is named by the `projectFixtureDirectory` field of the
//! copied project's package.json; on a path collision the overlay file
//! wins, files only present in the base are left as copied.

use crate::fixtures::paths::PathResolver;
use crate::fixtures::registry::FixtureRegistry;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Invalid project fixture directory: {requested}, expected one of {available:?}")]
    UnknownFixture {
        requested: String,
        available: Vec<String>,
    },
    #[error("Invalid package descriptor at {}: {reason}", .path.display())]
    Descriptor { path: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The slice of package.json this crate cares about. Unknown fields are
/// ignored, a missing field means "no overlay".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDescriptor {
    #[serde(rename = "projectFixtureDirectory", default)]
    pub fixture_directory: Option<String>,
}

pub struct Scaffolder<'a> {
    paths: &'a PathResolver,
    registry: &'a FixtureRegistry,
}

impl<'a> Scaffolder<'a> {
    pub fn new(paths: &'a PathResolver, registry: &'a FixtureRegistry) -> Self {
        Self { paths, registry }
    }

    /// Copy every base project into the workspace root in one pass.
    /// Global setup for a run, not incremental.
    pub async fn scaffold_all(&self) -> Result<(), ScaffoldError> {
        info!(
            from = %self.paths.projects_root().display(),
            to = %self.paths.workspace_root().display(),
            "Scaffolding all projects"
        );
        copy_tree(self.paths.projects_root(), self.paths.workspace_root()).await?;
        Ok(())
    }

    /// Materialize one project into its workspace directory and merge its
    /// overlay fixture, if the package descriptor names one. Returns the
    /// workspace path.
    ///
    /// Concurrent calls for distinct projects write disjoint subtrees and
    /// cannot interfere; concurrent calls for the same project are not
    /// serialized and land last-write-wins.
    pub async fn scaffold_project(&self, project: &str) -> Result<PathBuf, ScaffoldError> {
        let from = self.paths.project_source(project);
        let to = self.paths.workspace_dir(project);

        debug!(project, to = %to.display(), "Scaffolding project");
        copy_tree(&from, &to).await?;

        if let Some(fixture_dir) = read_descriptor(&to).await?.fixture_directory {
            if !self.registry.contains(&fixture_dir) {
                return Err(ScaffoldError::UnknownFixture {
                    requested: fixture_dir,
                    available: self.registry.names(),
                });
            }

            info!(project, fixture = fixture_dir, "Applying overlay fixture");
            copy_tree(&self.paths.fixture_source(&fixture_dir), &to).await?;
        }

        Ok(to)
    }
}

/// Read the package descriptor at the root of a scaffolded tree.
///
/// A missing file is the common case (most projects request no overlay)
/// and is not an error; anything else that goes wrong reading or parsing
/// it propagates.
async fn read_descriptor(project_dir: &Path) -> Result<PackageDescriptor, ScaffoldError> {
    let descriptor_path = project_dir.join("package.json");

    let content = match tokio::fs::read_to_string(&descriptor_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PackageDescriptor::default()),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map_err(|e| ScaffoldError::Descriptor {
        path: descriptor_path,
        reason: e.to_string(),
    })
}

/// Recursive tree copy. Existing destination files with the same relative
/// path are overwritten; everything else in the destination is left alone,
/// which is what gives overlay-on-base its merge semantics.
async fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .expect("walked path is under the copy root");
        let dest = to.join(rel);

        if entry.file_type().is_dir() {
            tokio::fs::create_dir_all(&dest).await?;
        } else {
            tokio::fs::copy(entry.path(), &dest).await?;
        }
    }
    Ok(())
}
