//! ClickHouse connection handle.
//!
//! The gateway talks to the database only through [`ClickHouseConnection`],
//! so tool handlers can be exercised against an in-memory double. The
//! production implementation, [`HttpConnection`], speaks the ClickHouse HTTP
//! interface: every statement is POSTed as the request body and results come
//! back in `JSONCompact` format, with wide integers and decimals quoted. A
//! read-only connection also sends `readonly=2`, so the server refuses writes
//! that slip past the keyword gate.

use crate::config::ClickHouseConfig;
use crate::error::{DbError, DbResult};
use crate::models::ResultSet;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const HEADER_USER: &str = "X-ClickHouse-User";
const HEADER_KEY: &str = "X-ClickHouse-Key";
const HEADER_EXCEPTION_CODE: &str = "X-ClickHouse-Exception-Code";

/// A live handle to one ClickHouse database.
///
/// Implementations must be shareable across tasks; the server holds a single
/// handle for its whole lifetime and never locks around it.
#[async_trait]
pub trait ClickHouseConnection: Send + Sync {
    /// Submit one statement and collect its rows.
    async fn execute(&self, sql: &str) -> DbResult<ResultSet>;

    /// Check that the server is reachable.
    async fn ping(&self) -> DbResult<()>;

    /// Name of the database statements run against.
    fn database(&self) -> &str;
}

/// Connection over the ClickHouse HTTP interface.
pub struct HttpConnection {
    client: Client,
    base_url: Url,
    user: String,
    password: String,
    database: String,
    read_only: bool,
    query_timeout: Duration,
}

impl HttpConnection {
    /// Build the HTTP client for the given settings.
    ///
    /// No request is made here; use [`ClickHouseConnection::ping`] to probe
    /// the server.
    pub fn new(config: &ClickHouseConfig) -> DbResult<Self> {
        let base_url = config
            .base_url()
            .map_err(DbError::invalid_input)?;

        let client = Client::builder()
            .timeout(config.query_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| {
                DbError::connection(
                    format!("Failed to build HTTP client: {e}"),
                    "Enable the tls-native or tls-rustls feature for https endpoints",
                )
            })?;

        Ok(Self {
            client,
            base_url,
            user: config.user.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
            read_only: config.read_only,
            query_timeout: config.query_timeout,
        })
    }

    /// Base URL of the HTTP interface (without credentials).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for a statement request, carrying the format settings.
    fn query_url(&self) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("database", &self.database)
                .append_pair("default_format", "JSONCompact")
                .append_pair("output_format_json_quote_decimals", "1");
            if self.read_only {
                pairs.append_pair("readonly", "2");
            }
        }
        url
    }

    fn map_request_error(&self, err: reqwest::Error, operation: &str) -> DbError {
        if err.is_timeout() {
            DbError::timeout(operation, self.query_timeout.as_secs())
        } else if err.is_connect() {
            DbError::connection(
                format!("Cannot reach ClickHouse at {}: {err}", self.base_url),
                "Check that ClickHouse is running and the host/port point at its HTTP interface",
            )
        } else if err.is_builder() {
            DbError::invalid_input(format!("Invalid request: {err}"))
        } else {
            DbError::connection(
                format!("HTTP error: {err}"),
                "Check network connectivity and ClickHouse server status",
            )
        }
    }
}

#[async_trait]
impl ClickHouseConnection for HttpConnection {
    async fn execute(&self, sql: &str) -> DbResult<ResultSet> {
        let start = Instant::now();
        debug!(sql = %sql, database = %self.database, "Executing statement");

        let response = self
            .client
            .post(self.query_url())
            .header(HEADER_USER, &self.user)
            .header(HEADER_KEY, &self.password)
            .body(sql.to_owned())
            .send()
            .await
            .map_err(|e| self.map_request_error(e, "query"))?;

        let status = response.status();
        let exception_code = response
            .headers()
            .get(HEADER_EXCEPTION_CODE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i32>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e, "read response"))?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                code = ?exception_code,
                "ClickHouse rejected statement"
            );
            return Err(server_error(status, exception_code, &body));
        }

        let result = ResultSet::from_body(&body);
        debug!(
            row_count = result.row_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Statement completed"
        );
        Ok(result)
    }

    async fn ping(&self) -> DbResult<()> {
        let url = self
            .base_url
            .join("ping")
            .map_err(|e| DbError::internal(format!("Invalid ping URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e, "ping"))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DbError::connection(
                format!("Ping returned HTTP {}", response.status()),
                "Check that the port points at the ClickHouse HTTP interface",
            ))
        }
    }

    fn database(&self) -> &str {
        &self.database
    }
}

/// Turn a non-2xx ClickHouse response into an error.
fn server_error(status: StatusCode, code: Option<i32>, body: &str) -> DbError {
    let message = body.trim();
    if message.is_empty() {
        DbError::query(format!("HTTP {status}"), code)
    } else {
        DbError::query(message, code)
    }
}
