//! Text rendering for tool results.
//!
//! Every tool returns plain text. Tables are rendered as a header line, a
//! dashed separator and one line per row, with values joined by
//! [`COLUMN_DELIMITER`].

use crate::models::{ColumnDescriptor, Row, display_value};
use serde_json::Value as JsonValue;

pub const COLUMN_DELIMITER: &str = " | ";

/// Returned by `run_query` when the statement produced no rows.
pub const NO_ROWS_MESSAGE: &str = "No results returned";

/// Returned by `run_query` when rows were produced but rendered to nothing.
pub const EMPTY_OUTPUT_MESSAGE: &str = "Query executed successfully but returned no data";

pub const QUERY_SEPARATOR_WIDTH: usize = 50;
pub const DESCRIBE_SEPARATOR_WIDTH: usize = 60;

pub const TABLES_HEADER: &str = "📦 Tables:";
pub const DESCRIBE_HEADER: &str = "Column | Type | Default Type | Default Expression";

/// Join row values with the column delimiter.
pub fn render_row(values: &[JsonValue]) -> String {
    values
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(COLUMN_DELIMITER)
}

pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

/// Render a `run_query` result.
///
/// With `columns`, a header line and separator precede the rows; without,
/// rows are emitted directly. Callers handle the empty-result case.
pub fn render_query_result(columns: Option<&[String]>, rows: &[Row]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    if let Some(columns) = columns {
        lines.push(columns.join(COLUMN_DELIMITER));
        lines.push(separator(QUERY_SEPARATOR_WIDTH));
    }
    lines.extend(rows.iter().map(|row| render_row(row)));

    let text = lines.join("\n");
    if text.is_empty() {
        EMPTY_OUTPUT_MESSAGE.to_string()
    } else {
        text
    }
}

/// Render table names as a bulleted list.
pub fn render_table_list(names: &[String]) -> String {
    let items = names
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{TABLES_HEADER}\n{items}")
}

/// Render `DESCRIBE TABLE` output as name, type, default kind and default
/// expression. Missing positions render empty.
pub fn render_describe(columns: &[ColumnDescriptor]) -> String {
    let mut lines = vec![DESCRIBE_HEADER.to_string(), separator(DESCRIBE_SEPARATOR_WIDTH)];
    lines.extend(columns.iter().map(|col| {
        [
            col.name.as_str(),
            col.type_name.as_deref().unwrap_or_default(),
            col.default_kind.as_deref().unwrap_or_default(),
            col.default_expression.as_deref().unwrap_or_default(),
        ]
        .join(COLUMN_DELIMITER)
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_row() {
        let row = vec![json!(1), json!("alice"), json!(null), json!(2.5)];
        assert_eq!(render_row(&row), "1 | alice | NULL | 2.5");
        assert_eq!(render_row(&[]), "");
    }

    #[test]
    fn test_render_query_result_with_header() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let rows = vec![vec![json!(1), json!("a")], vec![json!(2), json!("b")]];
        let text = render_query_result(Some(columns.as_slice()), &rows);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id | name");
        assert_eq!(lines[1], "-".repeat(50));
        assert_eq!(lines[2], "1 | a");
        assert_eq!(lines[3], "2 | b");
    }

    #[test]
    fn test_render_query_result_without_header() {
        let rows = vec![vec![json!("x"), json!(10)]];
        assert_eq!(render_query_result(None, &rows), "x | 10");
    }

    #[test]
    fn test_render_query_result_zero_width_rows() {
        let rows: Vec<Row> = vec![vec![]];
        assert_eq!(render_query_result(None, &rows), EMPTY_OUTPUT_MESSAGE);
    }

    #[test]
    fn test_render_table_list() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render_table_list(&names), "📦 Tables:\n- a\n- b");
        assert_eq!(render_table_list(&[]), "📦 Tables:\n");
    }

    fn describe(row: &[JsonValue]) -> Vec<ColumnDescriptor> {
        ColumnDescriptor::from_describe_row(row).into_iter().collect()
    }

    #[test]
    fn test_render_describe_truncates_to_four() {
        let columns = describe(&[
            json!("id"),
            json!("UInt64"),
            json!(""),
            json!(""),
            json!("primary id"),
            json!(""),
            json!(""),
        ]);
        let text = render_describe(&columns);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], DESCRIBE_HEADER);
        assert_eq!(lines[1], "-".repeat(60));
        assert_eq!(lines[2], "id | UInt64 |  | ");
        assert_eq!(lines[2].split(" | ").count(), 4);
    }

    #[test]
    fn test_render_describe_short_row() {
        let columns = describe(&[json!("id"), json!("UInt8")]);
        assert!(render_describe(&columns).ends_with("id | UInt8 |  | "));
    }

    #[test]
    fn test_render_describe_no_columns() {
        assert_eq!(render_describe(&[]), format!("{DESCRIBE_HEADER}\n{}", "-".repeat(60)));
    }
}
