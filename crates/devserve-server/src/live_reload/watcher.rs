//! Filesystem change watcher.
//!
//! Wraps a recursive `notify` watcher on the served root and turns its
//! callbacks into a channel of [`ChangeEvent`]s.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::diagnostics;

/// Pending change events buffered between the watcher and the broadcaster.
const EVENT_CAPACITY: usize = 100;

/// Kind of filesystem change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A single change under the served root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChangeEvent {
    pub(crate) path: PathBuf,
    pub(crate) kind: ChangeKind,
}

/// Live recursive watch on a directory.
///
/// Events stop when the watcher is dropped.
pub(crate) struct ChangeWatcher {
    watcher: RecommendedWatcher,
    events: mpsc::Receiver<ChangeEvent>,
}

impl ChangeWatcher {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher cannot be created or `root` cannot be watched.
    pub(crate) fn start(root: &Path) -> Result<Self, notify::Error> {
        let (tx, events) = mpsc::channel(EVENT_CAPACITY);

        // The callback runs on notify's own thread, so blocking_send is allowed
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if let Some(change) = change_event(event) {
                        let _ = tx.blocking_send(change);
                    }
                }
                Err(err) => diagnostics::watcher_error(&err),
            }
        })?;

        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(Self { watcher, events })
    }

    /// Split into the watch handle (keep alive) and the event stream.
    pub(crate) fn into_parts(self) -> (RecommendedWatcher, mpsc::Receiver<ChangeEvent>) {
        (self.watcher, self.events)
    }
}

/// Convert a notify event into a change event.
///
/// Returns `None` for kinds that don't change content (access, other).
fn change_event(event: Event) -> Option<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => return None,
    };
    let path = event.paths.into_iter().next()?;
    Some(ChangeEvent { path, kind })
}
