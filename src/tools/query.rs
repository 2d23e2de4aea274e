//! Query execution tool.
//!
//! This module implements the `run_query` MCP tool. Statements pass the
//! read-only gate, run once, and come back as a pipe-delimited text table.
//! For `SELECT` statements the column names are fetched with a second,
//! row-free round-trip (`DESC (<sql> LIMIT 0)`).

use crate::db::ClickHouseConnection;
use crate::error::DbResult;
use crate::models::ColumnDescriptor;
use crate::tools::format::{self, NO_ROWS_MESSAGE};
use crate::tools::output::{QUERY_ERROR_PREFIX, ToolOutput};
use crate::tools::sql_validator::{self, WritePolicy};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Input for the run_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// A SQL query to run on the ClickHouse database.
    pub sql: String,
}

/// Statement used to learn the column names of a `SELECT` without reading rows.
pub fn column_probe_sql(sql: &str) -> String {
    format!(
        "DESC ({} LIMIT 0)",
        sql_validator::strip_trailing_terminators(sql)
    )
}

/// Handler for query execution.
pub struct QueryToolHandler {
    connection: Arc<dyn ClickHouseConnection>,
    policy: WritePolicy,
}

impl QueryToolHandler {
    /// Create a new query tool handler.
    pub fn new(connection: Arc<dyn ClickHouseConnection>, policy: WritePolicy) -> Self {
        Self { connection, policy }
    }

    /// Handle the run_query tool call.
    pub async fn run_query(&self, sql: &str) -> ToolOutput {
        ToolOutput::from_result(self.execute(sql).await, QUERY_ERROR_PREFIX)
    }

    async fn execute(&self, sql: &str) -> DbResult<String> {
        sql_validator::validate(sql, self.policy)?;

        let start = Instant::now();
        let result = self.connection.execute(sql).await?;

        if result.is_empty() {
            info!(
                execution_time_ms = start.elapsed().as_millis() as u64,
                "Query returned no rows"
            );
            return Ok(NO_ROWS_MESSAGE.to_string());
        }

        let read = sql_validator::is_read_statement(sql);
        let columns = if read {
            Some(self.column_names(sql).await?)
        } else {
            None
        };

        if let (Some(columns), Some(first)) = (&columns, result.rows.first()) {
            if columns.len() != first.len() {
                warn!(
                    columns = columns.len(),
                    arity = first.len(),
                    "Column count does not match row arity"
                );
            }
        }

        info!(
            row_count = result.row_count(),
            read_statement = read,
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );

        Ok(format::render_query_result(columns.as_deref(), &result.rows))
    }

    async fn column_names(&self, sql: &str) -> DbResult<Vec<String>> {
        let described = self.connection.execute(&column_probe_sql(sql)).await?;
        Ok(described
            .rows
            .iter()
            .filter_map(|row| ColumnDescriptor::from_describe_row(row))
            .map(|desc| desc.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_input_deserialization() {
        let json = r#"{ "sql": "SELECT count() FROM events" }"#;
        let input: QueryInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.sql, "SELECT count() FROM events");
    }

    #[test]
    fn test_query_input_requires_sql() {
        assert!(serde_json::from_str::<QueryInput>("{}").is_err());
    }

    #[test]
    fn test_column_probe_sql() {
        assert_eq!(
            column_probe_sql("SELECT id, name FROM users"),
            "DESC (SELECT id, name FROM users LIMIT 0)"
        );
        assert_eq!(column_probe_sql("SELECT 1;\n"), "DESC (SELECT 1 LIMIT 0)");
    }
}
