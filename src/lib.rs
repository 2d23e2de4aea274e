//! ClickHouse MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to query a ClickHouse database and inspect its schema. Every tool returns
//! pre-formatted text.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::ClickHouseService;
