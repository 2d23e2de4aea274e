//! Database abstraction layer.
//!
//! This module provides the connection handle the tool handlers run
//! statements through.

pub mod connection;

pub use connection::{ClickHouseConnection, HttpConnection};
