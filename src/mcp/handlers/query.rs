//! Read tools: whole graph, ranked search, named lookup, profile

use serde_json::Value;

use super::{parse_args, to_json, ToolResult};
use crate::core::search::SearchQuery;
use crate::mcp::state::ServerState;
use crate::mcp::tools::*;

pub fn do_read_graph(state: &mut ServerState, _args: &Value) -> ToolResult {
    let graph = state.manager.read_graph()?;
    to_json(&graph)
}

pub fn do_search_nodes(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: SearchNodesTool = parse_args(args)?;

    let mut query = SearchQuery::new(tool_args.query);
    if let Some(limit) = tool_args.limit {
        query = query.with_limit(limit);
    }

    let results = state.manager.search_nodes(&query)?;
    to_json(&results)
}

/// Opening marks entities as accessed, so this one writes
pub fn do_open_nodes(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: OpenNodesTool = parse_args(args)?;
    let graph = state.manager.open_nodes(tool_args.names)?;
    to_json(&graph)
}

pub fn do_read_profile(state: &mut ServerState, _args: &Value) -> ToolResult {
    let profile = state.manager.profile()?;
    to_json(&profile)
}
