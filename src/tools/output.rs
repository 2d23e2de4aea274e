//! Uniform tool result type.
//!
//! Tool handlers never fail: success and failure are both text, and a
//! failure always starts with [`ERROR_MARKER`]. [`ToolOutput`] carries which
//! of the two it is so the MCP layer can flag errors without changing the
//! text the caller sees.

use crate::error::DbResult;
use rmcp::model::{CallToolResult, Content};

/// Every failure message starts with this marker.
pub const ERROR_MARKER: &str = "❌ Error";

pub const QUERY_ERROR_PREFIX: &str = "❌ Error";
pub const LIST_TABLES_ERROR_PREFIX: &str = "❌ Error fetching tables";
pub const DESCRIBE_ERROR_PREFIX: &str = "❌ Error describing table";

/// Text result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Success(String),
    Failure(String),
}

impl ToolOutput {
    /// Fold a handler pipeline into text, prefixing failures with `error_prefix`.
    ///
    /// A failure that carries a suggestion gets it on a second line.
    pub fn from_result(result: DbResult<String>, error_prefix: &str) -> Self {
        match result {
            Ok(text) => Self::Success(text),
            Err(e) => match e.suggestion() {
                Some(suggestion) => {
                    Self::Failure(format!("{error_prefix}: {e}\nSuggestion: {suggestion}"))
                }
                None => Self::Failure(format!("{error_prefix}: {e}")),
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl From<ToolOutput> for CallToolResult {
    fn from(output: ToolOutput) -> Self {
        match output {
            ToolOutput::Success(text) => CallToolResult::success(vec![Content::text(text)]),
            ToolOutput::Failure(text) => CallToolResult::error(vec![Content::text(text)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    #[test]
    fn test_from_result_success() {
        let out = ToolOutput::from_result(Ok("1".to_string()), QUERY_ERROR_PREFIX);
        assert_eq!(out, ToolOutput::Success("1".to_string()));
        assert!(!out.is_error());
    }

    #[test]
    fn test_from_result_failure() {
        let out = ToolOutput::from_result(
            Err(DbError::query("Syntax error", Some(62))),
            QUERY_ERROR_PREFIX,
        );
        assert!(out.is_error());
        assert_eq!(out.text(), "❌ Error: Query failed (code 62): Syntax error");
    }

    #[test]
    fn test_from_result_failure_with_suggestion() {
        let out = ToolOutput::from_result(
            Err(DbError::connection(
                "Cannot reach ClickHouse at http://localhost:8123/",
                "Check that ClickHouse is running",
            )),
            LIST_TABLES_ERROR_PREFIX,
        );
        assert_eq!(
            out.text(),
            "❌ Error fetching tables: Connection failed: Cannot reach ClickHouse at http://localhost:8123/\n\
             Suggestion: Check that ClickHouse is running"
        );
    }

    #[test]
    fn test_all_prefixes_carry_marker() {
        for prefix in [
            QUERY_ERROR_PREFIX,
            LIST_TABLES_ERROR_PREFIX,
            DESCRIBE_ERROR_PREFIX,
        ] {
            let out = ToolOutput::from_result(Err(DbError::internal("boom")), prefix);
            assert!(out.text().starts_with(ERROR_MARKER));
        }
    }

    #[test]
    fn test_into_call_tool_result() {
        let ok: CallToolResult = ToolOutput::Success("fine".to_string()).into();
        assert_eq!(ok.is_error, Some(false));

        let err: CallToolResult = ToolOutput::Failure("❌ Error: x".to_string()).into();
        assert_eq!(err.is_error, Some(true));
    }
}
