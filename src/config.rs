//! Configuration handling for the ClickHouse MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::{Parser, ValueEnum};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CLICKHOUSE_HOST: &str = "localhost";
/// ClickHouse HTTP interface port.
pub const DEFAULT_CLICKHOUSE_PORT: u16 = 8123;
pub const DEFAULT_CLICKHOUSE_USER: &str = "default";
pub const DEFAULT_CLICKHOUSE_DATABASE: &str = "default";

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Settings needed to open the ClickHouse connection.
#[derive(Clone)]
pub struct ClickHouseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Sensitive - never logged.
    pub password: String,
    pub database: String,
    /// Use https instead of http.
    pub secure: bool,
    /// Ask the server to refuse writes for every statement (`readonly=2`).
    pub read_only: bool,
    pub query_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClickHouseConfig {
    /// Base URL of the ClickHouse HTTP interface.
    pub fn base_url(&self) -> Result<Url, String> {
        let scheme = if self.secure { "https" } else { "http" };
        let host = self.host.trim();
        if host.is_empty() {
            return Err("ClickHouse host must not be empty".to_string());
        }
        Url::parse(&format!("{scheme}://{host}:{}/", self.port))
            .map_err(|e| format!("Invalid ClickHouse address '{host}:{}': {e}", self.port))
    }
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CLICKHOUSE_HOST.to_string(),
            port: DEFAULT_CLICKHOUSE_PORT,
            user: DEFAULT_CLICKHOUSE_USER.to_string(),
            password: String::new(),
            database: DEFAULT_CLICKHOUSE_DATABASE.to_string(),
            secure: false,
            read_only: true,
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("secure", &self.secure)
            .field("read_only", &self.read_only)
            .field("query_timeout", &self.query_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Configuration for the ClickHouse MCP Server.
#[derive(Clone, Parser)]
#[command(
    name = "clickhouse-mcp-server",
    about = "MCP server for ClickHouse - lets AI assistants run read-only queries and inspect schemas",
    version,
    author
)]
pub struct Config {
    /// ClickHouse server host
    #[arg(long, default_value = DEFAULT_CLICKHOUSE_HOST, env = "CLICKHOUSE_HOST")]
    pub host: String,

    /// ClickHouse HTTP interface port
    #[arg(long, default_value_t = DEFAULT_CLICKHOUSE_PORT, env = "CLICKHOUSE_PORT")]
    pub port: u16,

    /// ClickHouse user
    #[arg(short, long, default_value = DEFAULT_CLICKHOUSE_USER, env = "CLICKHOUSE_USERNAME")]
    pub user: String,

    /// ClickHouse password
    #[arg(
        long,
        default_value = "",
        env = "CLICKHOUSE_PASSWORD",
        hide_env_values = true
    )]
    pub password: String,

    /// Default database for queries
    #[arg(short, long, default_value = DEFAULT_CLICKHOUSE_DATABASE, env = "CLICKHOUSE_DATABASE")]
    pub database: String,

    /// Connect to ClickHouse over https
    #[arg(long, env = "CLICKHOUSE_SECURE")]
    pub secure: bool,

    /// Let run_query execute statements other than SELECT/SHOW/DESCRIBE/EXPLAIN
    #[arg(long, env = "CLICKHOUSE_ALLOW_WRITES")]
    pub allow_writes: bool,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Query timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "MCP_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "MCP_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (disabled by default to avoid interfering with stdio transport)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            host: DEFAULT_CLICKHOUSE_HOST.to_string(),
            port: DEFAULT_CLICKHOUSE_PORT,
            user: DEFAULT_CLICKHOUSE_USER.to_string(),
            password: String::new(),
            database: DEFAULT_CLICKHOUSE_DATABASE.to_string(),
            secure: false,
            allow_writes: false,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Connection settings for the ClickHouse handle.
    pub fn clickhouse(&self) -> ClickHouseConfig {
        ClickHouseConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            secure: self.secure,
            read_only: !self.allow_writes,
            query_timeout: self.query_timeout_duration(),
            connect_timeout: self.connect_timeout_duration(),
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Get the query timeout as a Duration.
    pub fn query_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("clickhouse", &self.clickhouse())
            .field("allow_writes", &self.allow_writes)
            .field("transport", &self.transport)
            .field("http_bind_addr", &self.http_bind_addr())
            .field("mcp_endpoint", &self.mcp_endpoint)
            .field("log_level", &self.log_level)
            .field("json_logs", &self.json_logs)
            .field("enable_logs", &self.enable_logs)
            .finish()
    }
}
