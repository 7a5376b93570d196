//! Request handling for the served root.
//!
//! Every request outside the live reload route lands here: it is resolved
//! once, then served either as injected HTML or as a static file. A WebSocket
//! upgrade on `/` is handed to the live reload channel.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::diagnostics;
use crate::error::ResponseError;
use crate::inject;
use crate::live_reload;
use crate::resolve::Resolved;
use crate::state::AppState;

/// Create router that serves the root with SPA fallback.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_request)
}

/// Resolve the request path and serve the result.
async fn serve_request(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    if let Some(registry) = &state.live_reload
        && req.uri().path() == "/"
        && is_websocket_upgrade(&req)
    {
        return live_reload::upgrade_request(req, Arc::clone(registry)).await;
    }

    let method = req.method().clone();
    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET, HEAD")]).into_response();
    }

    let request_path = req.uri().path().to_owned();
    let resolver = Arc::clone(&state.resolver);
    let lookup_path = request_path.clone();
    let Ok(resolved) = tokio::task::spawn_blocking(move || resolver.resolve(&lookup_path)).await
    else {
        return ResponseError::Internal.into_response();
    };

    diagnostics::request_resolved(&request_path, &resolved);

    match resolved {
        Resolved::Html(path) => {
            inject::serve_html(&path, state.live_reload_enabled(), method == Method::HEAD)
                .await
                .into_response()
        }
        Resolved::Static(path) => serve_static(&path, req).await,
        Resolved::NotFound => ResponseError::NotFound.into_response(),
        Resolved::Forbidden => ResponseError::Forbidden.into_response(),
    }
}

fn is_websocket_upgrade(req: &Request<Body>) -> bool {
    req.headers()
        .get(header::UPGRADE)
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"websocket"))
}

/// Serve a file as-is with an extension-derived content type.
///
/// The resolver has already seen `path`, so a missing file here means it
/// vanished or became unreadable in between.
async fn serve_static(path: &std::path::Path, req: Request<Body>) -> Response {
    let response = match ServeFile::new(path).oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        diagnostics::static_read_failed(path, response.status());
        return ResponseError::Read.into_response();
    }

    response.map(Body::new)
}
