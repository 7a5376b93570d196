//! Serve command implementation.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use devserve_config::{CliSettings, Config};
use devserve_server::server_config_from_config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for serving a directory.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover devserve.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve and watch (overrides config; default: dist).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config; default: 3000).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Disable live reload.
    #[arg(long)]
    no_live_reload: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config_file = ?config.config_path, "Configuration loaded");

        let server = devserve_server::bind(server_config_from_config(&config)).await?;

        output.highlight(&format!(
            "Dev server running at {}",
            server_url(server.local_addr()?)
        ));
        output.info(&format!("Serving: {}", config.root_dir.display()));
        if config.live_reload.enabled {
            output.success("Live reload: enabled");
        } else {
            output.info("Live reload: disabled");
        }

        server.run().await?;

        Ok(())
    }

    /// Build config overrides from the parsed flags.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            root: self.root.clone(),
            live_reload_enabled: self.no_live_reload.then_some(false),
        }
    }
}

/// URL to show in the banner: wildcard binds are reachable as localhost.
fn server_url(address: SocketAddr) -> String {
    if address.ip().is_unspecified() {
        format!("http://localhost:{}", address.port())
    } else {
        format!("http://{address}")
    }
}
