//! Shared test helpers: an in-memory ClickHouse connection with scripted replies.

#![allow(dead_code)]

use async_trait::async_trait;
use clickhouse_mcp_server::db::ClickHouseConnection;
use clickhouse_mcp_server::error::{DbError, DbResult};
use clickhouse_mcp_server::models::{ResultSet, Row};
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reply produced for a scripted statement.
#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<Row>),
    ServerError { message: String, code: i32 },
    Unreachable,
}

/// Connection double that answers exact SQL strings and records every call.
///
/// Unscripted statements fail with a syntax error, the way an unknown
/// statement would on a real server.
#[derive(Default)]
pub struct ScriptedConnection {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, sql: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(sql.to_string(), reply);
        self
    }

    pub fn rows(self, sql: &str, rows: Vec<Row>) -> Self {
        self.on(sql, Reply::Rows(rows))
    }

    /// Script a SELECT together with the column probe issued for it.
    pub fn select(self, sql: &str, columns: &[&str], rows: Vec<Row>) -> Self {
        let probe = format!("DESC ({sql} LIMIT 0)");
        let described = columns
            .iter()
            .map(|name| describe_row(name, "String"))
            .collect();
        self.rows(sql, rows).rows(&probe, described)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClickHouseConnection for ScriptedConnection {
    async fn execute(&self, sql: &str) -> DbResult<ResultSet> {
        self.calls.lock().unwrap().push(sql.to_string());
        let reply = self.replies.lock().unwrap().get(sql).cloned();
        match reply {
            Some(Reply::Rows(rows)) => Ok(ResultSet::from_rows(rows)),
            Some(Reply::ServerError { message, code }) => Err(DbError::query(message, Some(code))),
            Some(Reply::Unreachable) => Err(DbError::connection(
                "Cannot reach ClickHouse at http://localhost:8123/: connection refused",
                "Check that ClickHouse is running",
            )),
            None => Err(DbError::query(
                format!("Syntax error: failed at position 1 ({sql})"),
                Some(62),
            )),
        }
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }

    fn database(&self) -> &str {
        "default"
    }
}

/// A `DESCRIBE` row as ClickHouse returns it (seven positions).
pub fn describe_row(name: &str, type_name: &str) -> Row {
    vec![
        json!(name),
        json!(type_name),
        json!(""),
        json!(""),
        json!(""),
        json!(""),
        json!(""),
    ]
}

pub fn row(values: &[JsonValue]) -> Row {
    values.to_vec()
}
