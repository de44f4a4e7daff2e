//! Confluence MCP (Model Context Protocol) Server
//!
//! A stdio-based MCP server that exposes the Confluence Cloud REST
//! API (spaces, pages, search) as tools for AI-assistant hosts.

use confluence_mcp::core::config::Settings;
use confluence_mcp::core::services::Services;
use confluence_mcp::mcp::McpServer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // Critical: stderr not stdout
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_ansi(false) // No color codes
        .compact() // Concise format
        .init();
}

#[tokio::main]
async fn main() {
    // DEBUG controls the log level, so read it before full validation
    let debug = std::env::var(confluence_mcp::core::config::ENV_DEBUG)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    init_logging(debug);

    tracing::info!("Starting Confluence MCP server");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Settings::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        eprintln!("Run confluence-check to diagnose your environment");
        std::process::exit(1);
    });

    config.log_config();

    // Create services
    let services = match Services::new(config) {
        Ok(services) => Arc::new(services),
        Err(e) => {
            eprintln!("Failed to initialize API client: {e}");
            std::process::exit(1);
        }
    };

    // Create and run MCP server
    let mut server = McpServer::new(services);

    if let Err(e) = server.run().await {
        eprintln!("MCP server error: {e}");
        std::process::exit(1);
    }
}
