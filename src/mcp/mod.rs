//! MCP (Model Context Protocol) Server
//!
//! Exposes the knowledge graph via MCP tools for AI integration.
//!
//! # Tools
//! - `create_entities` / `create_relations` - Insert new nodes and edges
//! - `add_observations` - Append facts to existing entities
//! - `delete_entities` / `delete_observations` / `delete_relations`
//! - `read_graph` - Whole graph
//! - `search_nodes` - Ranked substring search
//! - `open_nodes` - Named entities plus the relations among them
//! - `read_profile` - Inferred user profile

mod handlers;
mod jsonrpc;
mod server;
mod state;
mod tools;

pub use server::{run_mcp_server, McpServer};
