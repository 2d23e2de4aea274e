//! ClickHouse MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to run queries against a ClickHouse database and inspect its schema.

use clap::Parser;
use clickhouse_mcp_server::config::{Config, TransportMode};
use clickhouse_mcp_server::db::{ClickHouseConnection, HttpConnection};
use clickhouse_mcp_server::tools::WritePolicy;
use clickhouse_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    if !config.enable_logs {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    init_tracing(&config);

    let policy = WritePolicy::from_allow_writes(config.allow_writes);
    let clickhouse = config.clickhouse();

    info!(
        transport = %config.transport,
        host = %clickhouse.host,
        port = clickhouse.port,
        database = %clickhouse.database,
        read_only = !policy.allows_writes(),
        "Starting ClickHouse MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let connection = HttpConnection::new(&clickhouse)?;

    // Tool calls report connection failures themselves; an unreachable server
    // at startup is not fatal.
    match connection.ping().await {
        Ok(()) => info!(url = %connection.base_url(), "ClickHouse is reachable"),
        Err(e) => warn!(error = %e, "ClickHouse ping failed; continuing"),
    }

    let connection: Arc<dyn ClickHouseConnection> = Arc::new(connection);

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(connection, policy);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                connection,
                policy,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
