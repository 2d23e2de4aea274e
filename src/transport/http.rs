//! Streamable HTTP transport.
//!
//! Each MCP session gets its own [`ClickHouseService`]; all sessions share the
//! one ClickHouse connection and write policy.

use crate::db::ClickHouseConnection;
use crate::error::{DbError, DbResult};
use crate::mcp::ClickHouseService;
use crate::tools::WritePolicy;
use crate::transport::{Transport, shutdown_signal};
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// How long open SSE streams may hold the server after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpTransport {
    connection: Arc<dyn ClickHouseConnection>,
    policy: WritePolicy,
    host: String,
    port: u16,
    /// Path the MCP service is mounted at; "/" serves every path.
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        connection: Arc<dyn ClickHouseConnection>,
        policy: WritePolicy,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            connection,
            policy,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Router serving the MCP service at the configured endpoint.
    fn router(&self) -> Router {
        let connection = self.connection.clone();
        let policy = self.policy;
        let service = StreamableHttpService::new(
            move || Ok(ClickHouseService::new(connection.clone(), policy)),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // axum cannot nest a service at "/"
        if self.endpoint == "/" {
            Router::new().fallback_service(service)
        } else {
            Router::new().nest_service(&self.endpoint, service)
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> DbResult<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            DbError::connection(
                format!("Failed to bind to {bind_addr}: {e}"),
                "Choose a free port with --http-port",
            )
        })?;
        info!(addr = %bind_addr, endpoint = %self.endpoint, "MCP HTTP endpoint ready");

        let draining = Arc::new(Notify::new());
        let notify = draining.clone();
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            shutdown_signal().await;
            notify.notify_one();
        });

        // Streaming sessions can keep a graceful shutdown open forever; stop
        // waiting after DRAIN_TIMEOUT or a second signal.
        let forced = async {
            draining.notified().await;
            info!(
                timeout_secs = DRAIN_TIMEOUT.as_secs(),
                "Draining sessions (signal again to exit now)"
            );
            tokio::select! {
                _ = tokio::time::sleep(DRAIN_TIMEOUT) => warn!("Drain timeout reached"),
                _ = shutdown_signal() => warn!("Second signal received"),
            }
        };

        tokio::select! {
            result = server => result.map_err(|e| {
                error!(error = %e, "HTTP server error");
                DbError::internal(format!("HTTP server error: {e}"))
            })?,
            _ = forced => {}
        }

        info!("HTTP server stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
