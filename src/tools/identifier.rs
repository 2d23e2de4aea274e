//! Table identifier validation for schema tools.
//!
//! Table names reach SQL only after passing an allow-list check and being
//! back-quoted, so a name can never close the identifier or start a new
//! statement.

use crate::error::{DbError, DbResult};

/// Maximum length of a single identifier part.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// A validated `table` or `database.table` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub database: Option<String>,
    pub table: String,
}

impl TableRef {
    /// Parse and validate a user-supplied table name.
    pub fn parse(name: &str) -> DbResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::invalid_input("Table name cannot be empty"));
        }

        let mut parts = name.split('.');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(DbError::invalid_input(format!(
                "Invalid table name '{name}': expected 'table' or 'database.table'"
            )));
        }

        let (database, table) = match second {
            Some(table) => (Some(first), table),
            None => (None, first),
        };

        if let Some(db) = database {
            validate_part(db, name)?;
        }
        validate_part(table, name)?;

        Ok(Self {
            database: database.map(String::from),
            table: table.to_string(),
        })
    }

    /// Back-quoted form, safe to splice into a statement.
    pub fn quoted(&self) -> String {
        match &self.database {
            Some(db) => format!("`{db}`.`{}`", self.table),
            None => format!("`{}`", self.table),
        }
    }
}

fn validate_part(part: &str, full: &str) -> DbResult<()> {
    if part.is_empty() {
        return Err(DbError::invalid_input(format!(
            "Invalid table name '{full}': empty identifier"
        )));
    }
    if part.len() > MAX_IDENTIFIER_LEN {
        return Err(DbError::invalid_input(format!(
            "Invalid table name: identifier longer than {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbError::invalid_input(format!(
            "Invalid characters in table name '{full}': only letters, digits and '_' are allowed"
        )));
    }
    Ok(())
}
