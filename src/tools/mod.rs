//! MCP tool implementations.
//!
//! This module contains the ClickHouse tool handlers:
//! - `query`: Execute a statement and render the rows (`run_query`)
//! - `schema`: List tables and describe a table
//! - `sql_validator`: Read-statement classification and the read-only gate
//! - `identifier`: Table name validation
//! - `format`: Text rendering of result sets
//! - `output`: The uniform text result type

pub mod format;
pub mod identifier;
pub mod output;
pub mod query;
pub mod schema;
pub mod sql_validator;

pub use output::{ERROR_MARKER, ToolOutput};
pub use query::{QueryInput, QueryToolHandler};
pub use schema::{DescribeTableInput, SchemaToolHandler};
pub use sql_validator::WritePolicy;
