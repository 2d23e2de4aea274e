//! Transport layer for the MCP server.
//!
//! Both transports serve a [`crate::mcp::ClickHouseService`] over the same
//! shared connection:
//! - Stdio: Standard input/output for CLI integration (default)
//! - HTTP: Streamable HTTP with Server-Sent Events for web clients

pub mod http;
pub mod stdio;

pub use http::HttpTransport;
pub use stdio::StdioTransport;

use crate::error::DbResult;
use std::future::Future;
use tokio::signal;
use tracing::{info, warn};

/// Trait for MCP transport implementations.
pub trait Transport: Send + Sync {
    /// Serve MCP requests until the client disconnects or a shutdown signal arrives.
    fn run(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the name of this transport for logging.
    fn name(&self) -> &'static str;
}

/// Resolve on SIGINT or SIGTERM. A handler that cannot be installed never fires.
pub(crate) async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
