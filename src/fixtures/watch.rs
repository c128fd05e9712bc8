//! Live mirroring of source edits into the workspace
//!
//! Used by interactive runs that stay open while fixture sources are
//! edited: changes under the projects root are copied straight into the
//! already-scaffolded workspace, so the run sees the edit without a
//! re-scaffold. The session lives until the hosting process exits.

use crate::fixtures::paths::PathResolver;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Debounce window for change notifications.
const DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to watch {}: {source}", .path.display())]
    Notify {
        path: PathBuf,
        source: notify::Error,
    },
}

/// A running watch session. Dropping it stops the watcher; there is no
/// restart primitive.
pub struct WatchSession {
    _debouncer: Debouncer<RecommendedWatcher>,
    watch_root: PathBuf,
}

impl WatchSession {
    /// Subscribe to recursive change notifications under the projects
    /// root and mirror changed files into the workspace root.
    pub fn start(paths: &PathResolver) -> Result<Self, WatchError> {
        let watch_root = paths.projects_root().to_path_buf();
        let mirror_root = paths.workspace_root().to_path_buf();

        let (tx, rx) = std::sync::mpsc::channel();

        let mut debouncer = new_debouncer(DEBOUNCE, tx).map_err(|source| WatchError::Notify {
            path: watch_root.clone(),
            source,
        })?;

        debouncer
            .watcher()
            .watch(&watch_root, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Notify {
                path: watch_root.clone(),
                source,
            })?;

        info!(path = %watch_root.display(), "Watching fixture sources for live edits");

        let source_root = watch_root.clone();
        std::thread::spawn(move || Self::event_loop(rx, source_root, mirror_root));

        Ok(Self {
            _debouncer: debouncer,
            watch_root,
        })
    }

    pub fn watch_root(&self) -> &Path {
        &self.watch_root
    }

    fn event_loop(
        rx: std::sync::mpsc::Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
        source_root: PathBuf,
        mirror_root: PathBuf,
    ) {
        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        Self::mirror_change(&event.path, &source_root, &mirror_root);
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(_) => {
                    debug!("Watch channel closed, exiting event loop");
                    break;
                }
            }
        }
    }

    /// Mirror a single changed source file into the workspace. Failures
    /// are logged and never unwind the session.
    fn mirror_change(changed: &Path, source_root: &Path, mirror_root: &Path) {
        let rel = match changed.strip_prefix(source_root) {
            Ok(rel) => rel,
            Err(_) => return,
        };

        // Directory events and removals carry no content to mirror.
        if !changed.is_file() {
            return;
        }

        let dest = mirror_root.join(rel);
        debug!(path = %rel.display(), "Mirroring source change into workspace");

        if let Err(e) = copy_contents(changed, &dest) {
            warn!(
                from = %changed.display(),
                to = %dest.display(),
                error = %e,
                "Failed to mirror change into workspace"
            );
        }
    }
}

/// Overwrite `to` in place instead of delete + recreate. A consumer
/// holding a handle on `to`, or watching it, sees a change event rather
/// than a deletion and keeps tracking the same file.
fn copy_contents(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut dest = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(to)?;
    let content = fs::read(from)?;
    dest.write_all(&content)?;
    Ok(())
}
