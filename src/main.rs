//! Trello MCP Server
//!
//! A Model Context Protocol server for Trello with board-scoped access control.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trello_mcp::{
    access_control::{BoardAccessGate, BoardPolicy},
    config::{AppConfig, TransportMode, load_config},
    server::TrelloMcpHandler,
    transport::{DEFAULT_HTTP_PORT, HttpConfig, run_http_blocking, run_stdio},
    trello::TrelloClient,
};

/// Trello MCP Server - Board-scoped access control for Trello via MCP
#[derive(Parser, Debug)]
#[command(name = "trello-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "TRELLO_MCP_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TRELLO_MCP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Transport mode (stdio, http)
    #[arg(long, env = "TRELLO_MCP_TRANSPORT")]
    transport: Option<String>,

    /// HTTP server host (for http transport)
    #[arg(long, env = "TRELLO_MCP_HTTP_HOST", default_value = "127.0.0.1")]
    http_host: String,

    /// HTTP server port (for http transport)
    #[arg(long, env = "TRELLO_MCP_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    http_port: u16,
}

fn create_handler(
    config: &AppConfig,
    trello: Arc<TrelloClient>,
    gate: Arc<BoardAccessGate>,
) -> TrelloMcpHandler {
    TrelloMcpHandler::new_with_shared(config, trello, gate)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging; stdout belongs to the stdio transport
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Trello MCP server"
    );

    // Load configuration
    let config = load_config(args.config.as_deref())
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    // Create Trello client
    let trello = Arc::new(
        TrelloClient::new(&config.trello)
            .inspect_err(|e| error!(error = %e, "Failed to create Trello client"))?,
    );

    // Build the board allow-list policy and the access gate
    let policy = BoardPolicy::from_config(&config.access_control);
    let gate = Arc::new(BoardAccessGate::new(trello.clone(), policy));

    // Determine transport mode
    let transport = args
        .transport
        .as_deref()
        .map(|t| match t {
            "stdio" => TransportMode::Stdio,
            "http" => TransportMode::Http,
            _ => config.server.transport,
        })
        .unwrap_or(config.server.transport);

    // Run the appropriate transport
    match transport {
        TransportMode::Stdio => {
            let handler = create_handler(&config, trello, gate);
            run_stdio(handler).await?;
        }
        TransportMode::Http => {
            let http_config = HttpConfig::from_host_port(&args.http_host, args.http_port)?;

            // Clone the shared resources for the factory closure
            let config = Arc::new(config);

            run_http_blocking(
                move || create_handler(&config, trello.clone(), gate.clone()),
                http_config,
            )
            .await?;
        }
    }

    Ok(())
}
