//! diffwindow-mcp: MCP server for time-windowed git diffs
//!
//! This binary serves the `git_diff` and `git_contributors` tools over the
//! MCP stdio transport. Logs go to stderr.

use clap::Parser;
use tracing::{error, info};

use diffwindow_mcp::config::Config;
use diffwindow_mcp::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }
    let settings = config.tool_settings()?;

    info!(
        exclusions = settings.exclusions.len(),
        depth = ?settings.default_depth,
        "Starting diffwindow-mcp server..."
    );

    server::serve_stdio(settings).await
}
