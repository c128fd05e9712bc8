//! Workspace teardown under file-lock contention
//!
//! Windows does not like en-masse deletion of freshly written trees: an
//! antivirus or indexer can still hold a lock on a file inside, and the
//! whole remove fails with a sharing violation. Removal therefore runs
//! through a fixed retry table, waiting 1s and then 10s before the final
//! attempt, and only retries on that error class and that platform.

use crate::fixtures::paths::PathResolver;
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Delay before each attempt. Three attempts total, 11s worst case.
const REMOVE_DELAYS_MS: [u64; 3] = [0, 1000, 10000];

/// Lock contention is only worth retrying where the OS hands out
/// mandatory file locks.
const RETRY_LOCKED: bool = cfg!(windows);

pub struct SafeRemover<'a> {
    paths: &'a PathResolver,
}

impl<'a> SafeRemover<'a> {
    pub fn new(paths: &'a PathResolver) -> Self {
        Self { paths }
    }

    /// Remove the entire workspace root.
    pub async fn remove_all(&self) -> io::Result<()> {
        safe_remove(self.paths.workspace_root()).await
    }

    /// Remove one project's workspace subtree.
    pub async fn remove_project(&self, project: &str) -> io::Result<()> {
        safe_remove(&self.paths.workspace_dir(project)).await
    }

    /// Remove node_modules left in the *source* project tree by an
    /// initial package install. Best-effort: a tree that stays locked
    /// after all retries is logged and left behind, but unexpected
    /// errors still surface.
    pub async fn clear_project_node_modules(&self, project: &str) -> io::Result<()> {
        let path = self.paths.project_source(project).join("node_modules");
        match safe_remove(&path).await {
            Ok(()) => Ok(()),
            Err(err) if is_lock_contention(&err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Leaving locked node_modules behind"
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Remove a file or directory tree, retrying lock-contention failures per
/// the fixed delay table. Removing an already-absent path succeeds.
pub async fn safe_remove(path: &Path) -> io::Result<()> {
    remove_with_retry(path, RETRY_LOCKED, || remove_tree(path)).await
}

/// The retry loop, separated from the actual filesystem call so the
/// attempt/delay bound and the platform gate can be exercised directly.
async fn remove_with_retry<F, Fut>(
    path: &Path,
    retry_locked: bool,
    mut attempt: F,
) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    for (index, &delay_ms) in REMOVE_DELAYS_MS.iter().enumerate() {
        if delay_ms > 0 {
            info!(
                path = %path.display(),
                delay_ms,
                "Remove failed on a file lock, trying again after delay"
            );
            sleep(Duration::from_millis(delay_ms)).await;
        }

        match attempt().await {
            Ok(()) => return Ok(()),
            Err(err) => {
                if !retry_locked || !is_lock_contention(&err) {
                    return Err(err);
                }
                if index + 1 == REMOVE_DELAYS_MS.len() {
                    warn!(path = %path.display(), "Ran out of attempts to retry locked remove");
                    return Err(err);
                }
            }
        }
    }
    unreachable!("delay table is non-empty")
}

async fn remove_tree(path: &Path) -> io::Result<()> {
    let meta = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Nothing to remove");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let result = if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    match result {
        // A concurrent remove winning the race still counts as removed.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(unix)]
fn is_lock_contention(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EBUSY)
}

#[cfg(windows)]
fn is_lock_contention(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    matches!(err.raw_os_error(), Some(32) | Some(33))
}
