//! diffwindow-mcp library
//!
//! This module exports the configuration, tool handlers and MCP server of
//! diffwindow-mcp for use in integration tests and as a library.

pub mod config;
pub mod handlers;
pub mod server;
