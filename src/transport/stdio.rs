//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::db::ClickHouseConnection;
use crate::error::{DbError, DbResult};
use crate::mcp::ClickHouseService;
use crate::tools::WritePolicy;
use crate::transport::{Transport, shutdown_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport {
    connection: Arc<dyn ClickHouseConnection>,
    policy: WritePolicy,
}

impl StdioTransport {
    /// Create a new stdio transport serving the given connection.
    pub fn new(connection: Arc<dyn ClickHouseConnection>, policy: WritePolicy) -> Self {
        Self { connection, policy }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = ClickHouseService::new(self.connection.clone(), self.policy);

        // Create the stdio transport and run the service
        let transport = stdio();
        let running_service = service
            .serve(transport)
            .await
            .map_err(|e| DbError::internal(format!("Failed to start stdio transport: {e}")))?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(DbError::internal(format!("Stdio transport error: {e}")));
                    }
                }
                false
            }
            _ = shutdown_signal() => {
                info!("Shutdown signal received");
                true
            }
        };

        if shutdown_requested {
            // stdin reads block and cannot be interrupted by tokio::select!
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClickHouseConfig;
    use crate::db::HttpConnection;

    #[test]
    fn test_stdio_transport_creation() {
        let connection = HttpConnection::new(&ClickHouseConfig::default()).unwrap();
        let transport = StdioTransport::new(Arc::new(connection), WritePolicy::ReadOnly);
        assert_eq!(transport.name(), "stdio");
    }
}
