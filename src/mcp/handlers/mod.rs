//! MCP Tool handlers
//!
//! Each module handles a group of related tools.

pub mod graph;
pub mod query;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::state::ServerState;
use crate::core::error::MemoryError;

/// Failure of a single tool call, rendered as the `isError` text
#[derive(Debug)]
pub enum ToolError {
    Memory(MemoryError),
    Invalid(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Memory(err) => write!(f, "{}: {}", err.category(), err),
            ToolError::Invalid(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl From<MemoryError> for ToolError {
    fn from(err: MemoryError) -> Self {
        ToolError::Memory(err)
    }
}

/// Result type for tool handlers
pub type ToolResult = Result<String, ToolError>;

/// Dispatch a tool call to the appropriate handler
pub fn dispatch_tool(state: &mut ServerState, name: &str, args: &Value) -> ToolResult {
    match name {
        // Mutations
        "create_entities" => graph::do_create_entities(state, args),
        "create_relations" => graph::do_create_relations(state, args),
        "add_observations" => graph::do_add_observations(state, args),
        "delete_entities" => graph::do_delete_entities(state, args),
        "delete_observations" => graph::do_delete_observations(state, args),
        "delete_relations" => graph::do_delete_relations(state, args),

        // Reads
        "read_graph" => query::do_read_graph(state, args),
        "search_nodes" => query::do_search_nodes(state, args),
        "open_nodes" => query::do_open_nodes(state, args),
        "read_profile" => query::do_read_profile(state, args),

        _ => Err(ToolError::Invalid(format!("Unknown tool: {}", name))),
    }
}

pub(crate) fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone())
        .map_err(|e| ToolError::Invalid(format!("Invalid params: {}", e)))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> ToolResult {
    serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::Invalid(format!("Failed to encode result: {}", e)))
}
