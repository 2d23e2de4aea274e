//! Result-set data models.
//!
//! ClickHouse answers over HTTP in `JSONCompact` format:
//!
//! ```text
//! {"meta":[{"name":"id","type":"UInt64"}],"data":[[1],[2]],"rows":2, ...}
//! ```
//!
//! 64-bit and wider integers and decimals are requested as JSON strings, so
//! no value is ever narrowed to `f64`. A body without a `data`
//! array, such as the output of a statement with its own `FORMAT` clause, is
//! decoded as tab-separated lines.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One result row; values are positionally aligned with the column list.
pub type Row = Vec<JsonValue>;

/// Rows returned by a single statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<Row>,
}

/// The part of a `JSONCompact` body the gateway reads; `meta`, `rows` and
/// `statistics` are ignored.
#[derive(Deserialize)]
struct JsonCompactBody {
    data: Vec<Row>,
}

impl ResultSet {
    /// An empty result (DDL, INSERT, or a SELECT matching nothing).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Decode a ClickHouse HTTP response body.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::empty();
        }

        match serde_json::from_str::<JsonCompactBody>(trimmed) {
            Ok(parsed) => Self::from_rows(parsed.data),
            Err(_) => Self::from_tab_separated(trimmed),
        }
    }

    fn from_tab_separated(text: &str) -> Self {
        let rows = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split('\t')
                    .map(|field| JsonValue::String(field.to_string()))
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first value of every row, as display text.
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first())
            .map(display_value)
            .collect()
    }
}

/// Column description as returned by `DESCRIBE`.
///
/// `DESCRIBE` rows are `name, type, default_type, default_expression, ...`;
/// only the leading four positions are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_name: Option<String>,
    pub default_kind: Option<String>,
    pub default_expression: Option<String>,
}

impl ColumnDescriptor {
    /// Read a descriptor from a `DESCRIBE` row. Returns `None` for an empty row.
    pub fn from_describe_row(row: &[JsonValue]) -> Option<Self> {
        let field = |idx: usize| row.get(idx).map(display_value);
        Some(Self {
            name: field(0)?,
            type_name: field(1),
            default_kind: field(2),
            default_expression: field(3),
        })
    }
}

/// Display form of a single value.
///
/// Strings are shown without quotes, NULL as `NULL`, nested values
/// (arrays, tuples, maps) as compact JSON.
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => serde_json::to_string(arr).unwrap_or_default(),
        JsonValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_body_json_compact() {
        let body = r#"{
            "meta": [{"name": "id", "type": "UInt64"}, {"name": "name", "type": "String"}],
            "data": [[1, "alice"], [2, "bob"]],
            "rows": 2,
            "statistics": {"elapsed": 0.001, "rows_read": 2, "bytes_read": 40}
        }"#;

        let rs = ResultSet::from_body(body);
        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.rows[1], vec![json!(2), json!("bob")]);
    }

    #[test]
    fn test_from_body_keeps_wide_integers_exact() {
        // UInt128/UInt64/Decimal values arrive quoted under the default settings.
        let body = r#"{
            "meta": [
                {"name": "big", "type": "UInt128"},
                {"name": "id", "type": "UInt64"},
                {"name": "price", "type": "Decimal(38, 10)"}
            ],
            "data": [["340282366920938463463374607431768211455", "18446744073709551615", "12345678901234567890.0123456789"]],
            "rows": 1
        }"#;

        let rs = ResultSet::from_body(body);
        let rendered: Vec<String> = rs.rows[0].iter().map(display_value).collect();
        assert_eq!(
            rendered,
            vec![
                "340282366920938463463374607431768211455",
                "18446744073709551615",
                "12345678901234567890.0123456789",
            ]
        );
    }

    #[test]
    fn test_from_body_empty_data_array() {
        let body = r#"{"meta": [{"name": "id", "type": "UInt64"}], "data": [], "rows": 0}"#;
        assert!(ResultSet::from_body(body).is_empty());
    }

    #[test]
    fn test_from_body_object_without_data_is_not_dropped() {
        // JSONEachRow output from a statement with its own FORMAT clause
        let rs = ResultSet::from_body("{\"a\":1}\n{\"a\":2}\n");
        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.rows[0], vec![json!("{\"a\":1}")]);
    }

    #[test]
    fn test_from_body_empty() {
        assert!(ResultSet::from_body("").is_empty());
        assert!(ResultSet::from_body("  \n").is_empty());
    }

    #[test]
    fn test_from_body_tab_separated_fallback() {
        let rs = ResultSet::from_body("a\t1\nb\t2\n");
        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.rows[0], vec![json!("a"), json!("1")]);
    }

    #[test]
    fn test_first_column() {
        let rs = ResultSet::from_rows(vec![vec![json!("events")], vec![json!("users")], vec![]]);
        assert_eq!(rs.first_column(), vec!["events", "users"]);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(null)), "NULL");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!("2024-01-01 00:00:00")), "2024-01-01 00:00:00");
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_descriptor_from_describe_row() {
        let row = vec![
            json!("created_at"),
            json!("DateTime"),
            json!("DEFAULT"),
            json!("now()"),
            json!(""),
            json!(""),
            json!(""),
        ];
        let desc = ColumnDescriptor::from_describe_row(&row).unwrap();
        assert_eq!(desc.name, "created_at");
        assert_eq!(desc.type_name.as_deref(), Some("DateTime"));
        assert_eq!(desc.default_kind.as_deref(), Some("DEFAULT"));
        assert_eq!(desc.default_expression.as_deref(), Some("now()"));
    }

    #[test]
    fn test_descriptor_from_short_row() {
        let desc = ColumnDescriptor::from_describe_row(&[json!("x")]).unwrap();
        assert_eq!(desc.name, "x");
        assert_eq!(desc.type_name, None);
        assert_eq!(desc.default_expression, None);
        assert!(ColumnDescriptor::from_describe_row(&[]).is_none());
    }
}
