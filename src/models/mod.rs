//! Data models for the ClickHouse MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod result;

pub use result::{ColumnDescriptor, ResultSet, Row, display_value};
