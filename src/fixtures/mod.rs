//! Fixture Engine - project provisioning for system tests
//!
//! This module provides:
//! - Root configuration and pure path resolution
//! - Overlay fixture registry (listed once at startup)
//! - Project scaffolding into an ephemeral workspace, with overlay merge
//! - Workspace removal with lock-contention retry
//! - Live mirroring of source edits during interactive runs

pub mod config;
pub mod paths;
pub mod registry;
pub mod remove;
pub mod scaffold;
pub mod watch;

pub use config::{ConfigError, FixtureConfig};
pub use paths::PathResolver;
pub use registry::{FixtureRegistry, RegistryError};
pub use remove::{safe_remove, SafeRemover};
pub use scaffold::{PackageDescriptor, ScaffoldError, Scaffolder};
pub use watch::{WatchError, WatchSession};
