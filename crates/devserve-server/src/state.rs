//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::live_reload::ConnectionRegistry;
use crate::resolve::Resolver;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Resolves request paths against the served root.
    pub(crate) resolver: Arc<Resolver>,
    /// Open live reload connections (if enabled).
    pub(crate) live_reload: Option<Arc<ConnectionRegistry>>,
}

impl AppState {
    pub(crate) fn new(root: PathBuf, live_reload: Option<Arc<ConnectionRegistry>>) -> Self {
        Self {
            resolver: Arc::new(Resolver::new(root)),
            live_reload,
        }
    }

    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
