//! SQL statement classification for the `run_query` tool.
//!
//! Two independent checks live here:
//!
//! - [`is_read_statement`] decides how a result is rendered (header row or
//!   not). It is a plain `SELECT` prefix test.
//! - [`validate`] is the read-only gate. It looks at the leading keyword only
//!   and, unless writes are allowed, rejects anything outside
//!   [`READ_KEYWORDS`] before the statement reaches the server.
//!
//! Neither check parses SQL. A mutating statement hidden behind an allowed
//! keyword (e.g. `WITH ... INSERT`) is refused by the server, since a
//! read-only connection sends `readonly=2` with every statement.

use crate::error::{DbError, DbResult};

/// Leading keywords accepted while the server is read-only.
pub const READ_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "SHOW", "DESC", "DESCRIBE", "EXPLAIN", "EXISTS",
];

/// Type of SQL statement detected from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlStatementType {
    /// SELECT, WITH, SHOW, DESCRIBE, EXPLAIN, EXISTS
    Read,
    /// INSERT, UPDATE, DELETE
    DmlWrite,
    /// CREATE, DROP, ALTER, TRUNCATE, RENAME, ATTACH, DETACH, EXCHANGE, UNDROP
    Ddl,
    /// SET, USE, GRANT, REVOKE, KILL, OPTIMIZE, SYSTEM, ...
    Administrative,
    /// Anything else
    Unknown,
}

/// Whether `run_query` may execute statements outside the read allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Only [`READ_KEYWORDS`] statements run.
    #[default]
    ReadOnly,
    /// Every statement runs.
    AllowWrites,
}

impl WritePolicy {
    pub fn from_allow_writes(allow_writes: bool) -> Self {
        if allow_writes {
            Self::AllowWrites
        } else {
            Self::ReadOnly
        }
    }

    pub fn allows_writes(self) -> bool {
        matches!(self, Self::AllowWrites)
    }
}

mod error_messages {
    pub const DML_WRITE: &str = "Write operations are not allowed; the server is read-only.";
    pub const DDL: &str = "Schema modifications are not allowed; the server is read-only.";
    pub const ADMINISTRATIVE: &str =
        "Administrative statements are not allowed; the server is read-only.";
    pub const UNKNOWN: &str =
        "Unrecognized statement. Only SELECT, WITH, SHOW, DESCRIBE, EXPLAIN and EXISTS are allowed.";
}

/// True if the statement starts with `SELECT`, ignoring case and leading whitespace.
///
/// Decides only whether a header row is rendered.
pub fn is_read_statement(sql: &str) -> bool {
    sql.trim_start().to_uppercase().starts_with("SELECT")
}

/// Upper-cased leading keyword, skipping whitespace and opening parentheses.
pub fn leading_keyword(sql: &str) -> String {
    sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Classify a statement by its leading keyword.
pub fn classify(sql: &str) -> SqlStatementType {
    let keyword = leading_keyword(sql);
    if READ_KEYWORDS.contains(&keyword.as_str()) {
        return SqlStatementType::Read;
    }
    match keyword.as_str() {
        "INSERT" | "UPDATE" | "DELETE" => SqlStatementType::DmlWrite,
        "CREATE" | "DROP" | "ALTER" | "TRUNCATE" | "RENAME" | "ATTACH" | "DETACH"
        | "EXCHANGE" | "UNDROP" => SqlStatementType::Ddl,
        "SET" | "USE" | "GRANT" | "REVOKE" | "KILL" | "OPTIMIZE" | "SYSTEM" | "BACKUP"
        | "RESTORE" | "MOVE" => SqlStatementType::Administrative,
        _ => SqlStatementType::Unknown,
    }
}

/// Gate a statement before execution.
///
/// Empty statements are rejected under every policy.
pub fn validate(sql: &str, policy: WritePolicy) -> DbResult<()> {
    if sql.trim().is_empty() {
        return Err(DbError::invalid_input("Empty SQL statement"));
    }
    if policy.allows_writes() {
        return Ok(());
    }
    validate_readonly(sql)
}

/// Reject anything that is not a read statement.
pub fn validate_readonly(sql: &str) -> DbResult<()> {
    let reason = match classify(sql) {
        SqlStatementType::Read => return Ok(()),
        SqlStatementType::DmlWrite => error_messages::DML_WRITE,
        SqlStatementType::Ddl => error_messages::DDL,
        SqlStatementType::Administrative => error_messages::ADMINISTRATIVE,
        SqlStatementType::Unknown => error_messages::UNKNOWN,
    };
    let keyword = leading_keyword(sql);
    let operation = if keyword.is_empty() {
        "Unknown".to_string()
    } else {
        keyword
    };
    Err(DbError::permission(operation, reason))
}

/// Drop trailing whitespace and statement terminators so a clause can be appended.
pub fn strip_trailing_terminators(sql: &str) -> &str {
    sql.trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}
