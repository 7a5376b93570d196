//! HTML serving with live reload injection.
//!
//! Reads the resolved HTML document on every request, inserts the reload
//! client before the last `</body>`, and disables caching so the next
//! navigation gets a fresh copy.

use std::borrow::Cow;
use std::path::Path;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

use crate::diagnostics;
use crate::error::ResponseError;

/// WebSocket endpoint the injected client connects to.
pub(crate) const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Closing tag the snippet is inserted in front of.
const CLOSING_BODY: &str = "</body>";

/// Client that reloads the page when the server sends `reload`.
pub(crate) const RELOAD_SNIPPET: &str = r#"<script>
  (() => {
    const scheme = location.protocol === "https:" ? "wss://" : "ws://";
    const ws = new WebSocket(scheme + location.host + "/__livereload");
    ws.onmessage = (msg) => {
      if (msg.data === "reload") location.reload();
    };
  })();
</script>"#;

/// Insert [`RELOAD_SNIPPET`] before the last `</body>` (ASCII case-insensitive).
///
/// Documents without a closing body tag are returned unchanged.
pub(crate) fn inject_reload_snippet(html: &str) -> Cow<'_, str> {
    let Some(at) = find_closing_body(html) else {
        return Cow::Borrowed(html);
    };

    let mut out = String::with_capacity(html.len() + RELOAD_SNIPPET.len());
    out.push_str(&html[..at]);
    out.push_str(RELOAD_SNIPPET);
    out.push_str(&html[at..]);
    Cow::Owned(out)
}

/// Byte offset of the last `</body>` tag.
fn find_closing_body(html: &str) -> Option<usize> {
    html.as_bytes()
        .windows(CLOSING_BODY.len())
        .rposition(|window| window.eq_ignore_ascii_case(CLOSING_BODY.as_bytes()))
}

/// Serve an HTML document, injecting the reload client when `inject` is set.
///
/// `head_only` keeps the headers and drops the body.
pub(crate) async fn serve_html(
    path: &Path,
    inject: bool,
    head_only: bool,
) -> Result<Response, ResponseError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            diagnostics::html_read_failed(path, &err);
            return Err(ResponseError::Read);
        }
    };

    let html = String::from_utf8_lossy(&bytes);
    let html = if inject {
        inject_reload_snippet(&html).into_owned()
    } else {
        html.into_owned()
    };

    let body = if head_only {
        Body::empty()
    } else {
        Body::from(html)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-store")
        .body(body)
        .map_err(|_| ResponseError::Internal)
}
