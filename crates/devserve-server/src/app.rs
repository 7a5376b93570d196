//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::inject::LIVE_RELOAD_PATH;
use crate::live_reload;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    // WebSocket for live reload
    if state.live_reload_enabled() {
        router = router.route(LIVE_RELOAD_PATH, get(live_reload::ws_handler));
    }

    // Everything else is resolved against the served root
    router
        .merge(static_files::static_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
