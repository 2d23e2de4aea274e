//! MCP service implementation using rmcp.
//!
//! This module defines the ClickHouseService struct with the ClickHouse tools
//! exposed via the MCP protocol using the rmcp framework's macros. Every tool
//! answers with text; failures are flagged `is_error` but still carry their
//! message as text content.

use crate::db::ClickHouseConnection;
use crate::tools::query::{QueryInput, QueryToolHandler};
use crate::tools::schema::{DescribeTableInput, SchemaToolHandler};
use crate::tools::sql_validator::WritePolicy;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ClickHouseService {
    /// Shared connection for all tool calls
    connection: Arc<dyn ClickHouseConnection>,
    /// Whether run_query may execute non-read statements
    policy: WritePolicy,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl ClickHouseService {
    /// Create a new ClickHouseService instance.
    ///
    /// # Arguments
    ///
    /// * `connection` - Shared ClickHouse connection
    /// * `policy` - Read-only gate applied by `run_query`
    pub fn new(connection: Arc<dyn ClickHouseConnection>, policy: WritePolicy) -> Self {
        Self {
            connection,
            policy,
            tool_router: Self::tool_router(),
        }
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }
}

#[tool_router]
impl ClickHouseService {
    #[tool(
        description = "Execute a SQL query and return formatted results.\nOnly read statements (SELECT, WITH, SHOW, DESCRIBE, EXPLAIN, EXISTS) are accepted unless the server runs with --allow-writes.\nSELECT results start with a header of column names; values are separated by ' | '."
    )]
    pub async fn run_query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.connection.clone(), self.policy);
        Ok(handler.run_query(&input.sql).await.into())
    }

    #[tool(description = "List all tables in the current ClickHouse database.")]
    pub async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.connection.clone());
        Ok(handler.list_tables().await.into())
    }

    #[tool(
        description = "Describe the schema of a ClickHouse table.\nReturns column name, type, default type and default expression.\nAccepts 'table' or 'database.table'."
    )]
    pub async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.connection.clone());
        Ok(handler.describe_table(&input.table_name).await.into())
    }
}

#[tool_handler]
impl ServerHandler for ClickHouseService {
    fn get_info(&self) -> ServerInfo {
        let mode = if self.policy.allows_writes() {
            "Writes are enabled: run_query executes any statement."
        } else {
            "The server is read-only: run_query rejects INSERT, ALTER, CREATE, DROP and similar statements."
        };

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "clickhouse-mcp-server".to_owned(),
                title: Some("ClickHouse MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Tools for querying a ClickHouse database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` to see the tables in the current database\n\
                2. Call `describe_table` to inspect a table's columns\n\
                3. Call `run_query` with a SELECT statement\n\
                \n\
                ## Results\n\
                All tools return plain text. A result starting with \"❌ Error\" is a failure.\n\
                Column names of a SELECT are derived by appending `LIMIT 0`, so a SELECT that ends \
                in its own LIMIT clause fails; wrap it as `SELECT * FROM (...)` instead.\n\
                \n\
                {mode}"
            )),
        }
    }
}
