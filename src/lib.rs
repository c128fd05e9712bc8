//! Stagehand Core - fixture provisioning for system tests
//!
//! Materializes curated test-project trees into an ephemeral workspace,
//! merges optional per-scenario overlay fixtures on top, mirrors live
//! source edits into the workspace while interactive runs are open, and
//! tears workspaces down with a bounded retry policy for platforms where
//! other processes briefly lock files mid-delete.

pub mod fixtures;
pub mod util;
