//! Server error types.

use std::io;
use std::path::PathBuf;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Served root cannot be read.
    #[error("Served root {} is not accessible: {source}", path.display())]
    Root {
        /// Configured root.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Served root exists but is not a directory.
    #[error("Served root {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),
    /// Listener could not be bound.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Requested `host:port`.
        address: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// I/O error while serving.
    #[error("Server error: {0}")]
    Io(#[from] io::Error),
}

/// Per-request failure, rendered as a plain-text response.
#[derive(Debug)]
pub(crate) enum ResponseError {
    /// Nothing to serve, even after the SPA fallback.
    NotFound,
    /// Request path escapes the served root.
    Forbidden,
    /// Resolved file could not be read.
    Read,
    /// Response could not be assembled.
    Internal,
}

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            Self::Read | Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_plain_text_404() {
        let response = ResponseError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_forbidden_is_403() {
        let response = ResponseError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_read_failure_is_500() {
        let response = ResponseError::Read.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_server_error_messages() {
        let err = ServerError::RootNotDirectory(PathBuf::from("/srv/index.html"));
        assert_eq!(
            err.to_string(),
            "Served root /srv/index.html is not a directory"
        );

        let err = ServerError::Bind {
            address: "127.0.0.1:3000".to_owned(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to bind 127.0.0.1:3000: address in use"
        );
    }
}
