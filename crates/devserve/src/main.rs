//! devserve CLI - live-reloading development server.
//!
//! Serves a built front-end directory and reloads connected browsers
//! whenever a file in it changes.

mod error;
mod output;
mod serve;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use output::Output;
use serve::ServeArgs;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "devserve=info,devserve_server=info";

/// devserve - serve a static build with live reload.
#[derive(Parser)]
#[command(name = "devserve", version, about)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO for everything, otherwise use RUST_LOG or the default
    let filter = if cli.serve.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = tokio::runtime::Runtime::new()
        .map_err(error::CliError::from)
        .and_then(|rt| rt.block_on(cli.serve.execute()));

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
