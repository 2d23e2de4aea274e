//! Schema introspection tools.
//!
//! This module implements the `list_tables` and `describe_table` MCP tools.

use crate::db::ClickHouseConnection;
use crate::error::DbResult;
use crate::models::ColumnDescriptor;
use crate::tools::format;
use crate::tools::identifier::TableRef;
use crate::tools::output::{DESCRIBE_ERROR_PREFIX, LIST_TABLES_ERROR_PREFIX, ToolOutput};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const LIST_TABLES_SQL: &str = "SHOW TABLES";

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the ClickHouse table to describe ("table" or "database.table").
    pub table_name: String,
}

/// Statement that describes a validated table.
pub fn describe_table_sql(table: &TableRef) -> String {
    format!("DESCRIBE TABLE {}", table.quoted())
}

/// Handler for schema introspection operations.
pub struct SchemaToolHandler {
    connection: Arc<dyn ClickHouseConnection>,
}

impl SchemaToolHandler {
    /// Create a new schema tool handler.
    pub fn new(connection: Arc<dyn ClickHouseConnection>) -> Self {
        Self { connection }
    }

    /// List all tables in the current database.
    pub async fn list_tables(&self) -> ToolOutput {
        ToolOutput::from_result(self.fetch_tables().await, LIST_TABLES_ERROR_PREFIX)
    }

    /// Describe the columns of a table.
    pub async fn describe_table(&self, table_name: &str) -> ToolOutput {
        ToolOutput::from_result(self.fetch_description(table_name).await, DESCRIBE_ERROR_PREFIX)
    }

    async fn fetch_tables(&self) -> DbResult<String> {
        info!(database = %self.connection.database(), "Listing tables");
        let result = self.connection.execute(LIST_TABLES_SQL).await?;
        let tables = result.first_column();
        info!(count = tables.len(), "Tables listed");
        Ok(format::render_table_list(&tables))
    }

    async fn fetch_description(&self, table_name: &str) -> DbResult<String> {
        let table = TableRef::parse(table_name)?;
        let result = self.connection.execute(&describe_table_sql(&table)).await?;
        let columns: Vec<ColumnDescriptor> = result
            .rows
            .iter()
            .filter_map(|row| ColumnDescriptor::from_describe_row(row))
            .collect();
        info!(table = %table.table, columns = columns.len(), "Table described");
        Ok(format::render_describe(&columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_table_input_deserialization() {
        let input: DescribeTableInput =
            serde_json::from_str(r#"{ "table_name": "orders" }"#).unwrap();
        assert_eq!(input.table_name, "orders");
    }

    #[test]
    fn test_describe_table_sql() {
        let table = TableRef::parse("orders").unwrap();
        assert_eq!(describe_table_sql(&table), "DESCRIBE TABLE `orders`");

        let table = TableRef::parse("sales.orders").unwrap();
        assert_eq!(describe_table_sql(&table), "DESCRIBE TABLE `sales`.`orders`");
    }
}
