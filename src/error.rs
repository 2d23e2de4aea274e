//! Error types for the ClickHouse MCP Server.
//!
//! Every failure coming out of the database layer is a `DbError`. Tool
//! handlers never hand these to the MCP client as protocol errors; they are
//! rendered into the tool's text result (see [`crate::tools::ToolOutput`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("{}", format_query_error(.message, .code))]
    Query {
        message: String,
        /// ClickHouse exception code, e.g. 60 for UNKNOWN_TABLE
        code: Option<i32>,
    },

    #[error("Permission denied: {operation} - {reason}")]
    Permission { operation: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_query_error(message: &str, code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("Query failed (code {code}): {message}"),
        None => format!("Query failed: {message}"),
    }
}

impl DbError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a query error with the optional server exception code.
    pub fn query(message: impl Into<String>, code: Option<i32>) -> Self {
        Self::Query {
            message: message.into(),
            code,
        }
    }

    /// Create a permission error.
    pub fn permission(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Permission {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// ClickHouse exception code reported by the server, if any.
    pub fn server_code(&self) -> Option<i32> {
        match self {
            Self::Query { code, .. } => *code,
            _ => None,
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
