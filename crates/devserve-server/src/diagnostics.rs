//! Diagnostic logging.
//!
//! Every log line the server emits outside of HTTP access logs goes through
//! here, so request resolution and the live reload pipeline stay free of
//! logging concerns.

use std::io;
use std::path::Path;

use axum::http::StatusCode;

use crate::live_reload::{BroadcastOutcome, ChangeEvent, ChangeKind, ConnectionId};
use crate::resolve::Resolved;

/// Request path resolved (or rejected).
pub(crate) fn request_resolved(request_path: &str, resolved: &Resolved) {
    match resolved {
        Resolved::Html(path) => {
            tracing::debug!(request = request_path, file = %path.display(), "Serving HTML");
        }
        Resolved::Static(path) => {
            tracing::debug!(request = request_path, file = %path.display(), "Serving static file");
        }
        Resolved::NotFound => not_found(request_path),
        Resolved::Forbidden => {
            tracing::warn!(request = request_path, "Rejected path outside served root");
        }
    }
}

/// Nothing to serve, not even the SPA fallback.
pub(crate) fn not_found(request_path: &str) {
    tracing::warn!(request = request_path, "File not found");
}

/// Resolved static file vanished or is unreadable.
pub(crate) fn static_read_failed(path: &Path, status: StatusCode) {
    tracing::error!(file = %path.display(), status = status.as_u16(), "Failed to read static file");
}

/// HTML document vanished or is unreadable.
pub(crate) fn html_read_failed(path: &Path, err: &io::Error) {
    tracing::error!(file = %path.display(), error = %err, "Failed to read HTML file");
}

pub(crate) fn client_connected(id: ConnectionId, open: usize) {
    tracing::info!(connection = %id, open, "Browser connected for live reload");
}

pub(crate) fn client_disconnected(id: ConnectionId, open: usize) {
    tracing::debug!(connection = %id, open, "Browser disconnected");
}

pub(crate) fn watching(root: &Path) {
    tracing::info!(root = %root.display(), "Watching for changes");
}

pub(crate) fn change_detected(change: &ChangeEvent) {
    let kind = match change.kind {
        ChangeKind::Created => "created",
        ChangeKind::Modified => "modified",
        ChangeKind::Removed => "removed",
    };
    tracing::info!(path = %change.path.display(), kind, "Changed");
}

pub(crate) fn reload_broadcast(outcome: &BroadcastOutcome) {
    tracing::debug!(
        delivered = outcome.delivered,
        lagging = outcome.lagging,
        pruned = outcome.pruned,
        "Reload broadcast"
    );
}

/// Served root removed; the watch is restarted once it exists again.
pub(crate) fn watched_root_lost(root: &Path) {
    tracing::warn!(root = %root.display(), "Served root removed, restarting watcher");
}

pub(crate) fn watcher_error(err: &notify::Error) {
    tracing::warn!(error = %err, "File watcher error");
}

pub(crate) fn watcher_task_failed(err: &tokio::task::JoinError) {
    tracing::warn!(error = %err, "File watcher failed to start");
}
