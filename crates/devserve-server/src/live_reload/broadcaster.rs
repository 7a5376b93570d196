//! Watch-to-broadcast pipeline.
//!
//! A dedicated task owns the change watcher and turns every change event
//! into exactly one reload broadcast. No debouncing.
//!
//! Removing the served root kills the underlying watch, so the pipeline drops
//! the watcher and starts a new one once the root is back.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::registry::ConnectionRegistry;
use super::watcher::{ChangeEvent, ChangeKind, ChangeWatcher};
use crate::diagnostics;

/// Delay before retrying a watcher that failed to start.
const WATCH_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Broadcast one reload per event.
///
/// Returns when the event stream ends or the watched root is removed.
pub(crate) async fn broadcast_changes(
    mut events: mpsc::Receiver<ChangeEvent>,
    registry: &ConnectionRegistry,
    root: &Path,
) {
    while let Some(change) = events.recv().await {
        diagnostics::change_detected(&change);
        let outcome = registry.broadcast_reload();
        diagnostics::reload_broadcast(&outcome);

        if root_lost(root, &change) {
            diagnostics::watched_root_lost(root);
            return;
        }
    }
}

/// The watch on `root` is dead once the root itself is removed.
fn root_lost(root: &Path, change: &ChangeEvent) -> bool {
    change.kind == ChangeKind::Removed && (change.path == root || !root.is_dir())
}

/// Spawn the task that watches `root` and broadcasts reloads.
///
/// A watcher that cannot be started, or whose root was removed, is retried;
/// HTTP serving is unaffected.
pub(crate) fn spawn_reload_pipeline(
    root: PathBuf,
    registry: Arc<ConnectionRegistry>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let watch_root = root.clone();
            match tokio::task::spawn_blocking(move || ChangeWatcher::start(&watch_root)).await {
                Ok(Ok(watcher)) => {
                    diagnostics::watching(&root);
                    let (_watcher, events) = watcher.into_parts();
                    broadcast_changes(events, &registry, &root).await;
                }
                Ok(Err(err)) => diagnostics::watcher_error(&err),
                Err(err) => diagnostics::watcher_task_failed(&err),
            }
            tokio::time::sleep(WATCH_RETRY_INTERVAL).await;
        }
    })
}
