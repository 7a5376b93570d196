//! Live-reloading development server.
//!
//! Serves a directory of built static assets over HTTP. HTML documents get a
//! small client script injected before `</body>`; that script holds a
//! WebSocket open and reloads the page whenever a file under the served root
//! changes.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use devserve_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 3000,
//!         root_dir: PathBuf::from("dist"),
//!         live_reload_enabled: true,
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router
//!                        │
//!                        ├─► Resolver ──► HTML (inject snippet, no-store)
//!                        │            └─► static file (ServeFile)
//!                        │
//!                        └─► /__livereload WebSocket ──► ConnectionRegistry
//!                                                              ▲
//! notify ──► ChangeWatcher ──mpsc──► broadcaster task ─────────┘
//! ```

mod app;
mod diagnostics;
mod error;
mod inject;
mod live_reload;
mod resolve;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use live_reload::ConnectionRegistry;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served over HTTP and watched for changes.
    pub root_dir: PathBuf,
    /// Enable live reload.
    pub live_reload_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root_dir: PathBuf::from("dist"),
            live_reload_enabled: true,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the served root is unusable or the listener cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    bind(config).await?.run().await
}

/// Validate the served root and bind the listener.
///
/// Live reload starts watching only once the address is bound.
///
/// # Errors
///
/// Returns an error if the served root is unusable or the listener cannot be bound.
pub async fn bind(config: ServerConfig) -> Result<BoundServer, ServerError> {
    let root = served_root(&config.root_dir)?;

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    // Create registry and start watching if enabled
    let live_reload = if config.live_reload_enabled {
        let registry = Arc::new(ConnectionRegistry::new());
        live_reload::spawn_reload_pipeline(root.clone(), Arc::clone(&registry));
        Some(registry)
    } else {
        None
    };

    let state = Arc::new(AppState::new(root, live_reload));
    let app = app::create_router(state);

    Ok(BoundServer { listener, app })
}

/// Server with a bound listener, not yet accepting requests.
pub struct BoundServer {
    listener: tokio::net::TcpListener,
    app: axum::Router,
}

impl BoundServer {
    /// Address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the accept loop fails.
    pub async fn run(self) -> Result<(), ServerError> {
        if let Ok(address) = self.listener.local_addr() {
            tracing::info!(address = %address, "Starting server");
        }

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Canonicalize the served root and check that it is a directory.
fn served_root(root_dir: &std::path::Path) -> Result<PathBuf, ServerError> {
    let root = std::fs::canonicalize(root_dir).map_err(|source| ServerError::Root {
        path: root_dir.to_path_buf(),
        source,
    })?;
    if !root.is_dir() {
        return Err(ServerError::RootNotDirectory(root));
    }
    Ok(root)
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from devserve config.
#[must_use]
pub fn server_config_from_config(config: &devserve_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_dir: config.root_dir.clone(),
        live_reload_enabled: config.live_reload.enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_served_root_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("dist");
        std::fs::create_dir(&nested).unwrap();

        let root = served_root(&dir.path().join("dist/../dist")).unwrap();

        assert_eq!(root, std::fs::canonicalize(&nested).unwrap());
    }

    #[test]
    fn test_served_root_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = served_root(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ServerError::Root { .. }));
    }

    #[test]
    fn test_served_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "").unwrap();

        let err = served_root(&file).unwrap_err();

        assert!(matches!(err, ServerError::RootNotDirectory(_)));
    }

    #[test]
    fn test_server_config_from_config() {
        let config = devserve_config::Config::default();

        let server_config = server_config_from_config(&config);

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 3000);
        assert_eq!(server_config.root_dir, config.root_dir);
        assert!(server_config.live_reload_enabled);
    }

    #[tokio::test]
    async fn test_run_server_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            root_dir: dir.path().join("missing"),
            ..ServerConfig::default()
        };

        let err = run_server(config).await.unwrap_err();

        assert!(matches!(err, ServerError::Root { .. }));
    }

    #[tokio::test]
    async fn test_bind_reports_actual_address() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            port: 0,
            root_dir: dir.path().to_path_buf(),
            live_reload_enabled: false,
            ..ServerConfig::default()
        };

        let server = bind(config).await.unwrap();
        let address = server.local_addr().unwrap();

        assert!(address.ip().is_loopback());
        assert_ne!(address.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_taken() {
        let dir = tempfile::tempdir().unwrap();
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            port: taken.local_addr().unwrap().port(),
            root_dir: dir.path().to_path_buf(),
            live_reload_enabled: false,
            ..ServerConfig::default()
        };

        let result = bind(config).await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }
}
