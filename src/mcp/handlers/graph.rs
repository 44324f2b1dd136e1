//! Mutation tools: create, extend and delete graph content

use serde_json::Value;

use super::{parse_args, to_json, ToolResult};
use crate::mcp::state::ServerState;
use crate::mcp::tools::*;

pub fn do_create_entities(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: CreateEntitiesTool = parse_args(args)?;
    let created = state.manager.create_entities(tool_args.entities)?;
    to_json(&created)
}

pub fn do_create_relations(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: CreateRelationsTool = parse_args(args)?;
    let created = state.manager.create_relations(tool_args.relations)?;
    to_json(&created)
}

pub fn do_add_observations(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: AddObservationsTool = parse_args(args)?;
    let results = state.manager.add_observations(tool_args.observations)?;
    to_json(&results)
}

pub fn do_delete_entities(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: DeleteEntitiesTool = parse_args(args)?;
    let report = state.manager.delete_entities(tool_args.entity_names)?;
    to_json(&report)
}

pub fn do_delete_observations(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: DeleteObservationsTool = parse_args(args)?;
    state.manager.delete_observations(tool_args.deletions)?;
    Ok("Observations deleted successfully".to_string())
}

pub fn do_delete_relations(state: &mut ServerState, args: &Value) -> ToolResult {
    let tool_args: DeleteRelationsTool = parse_args(args)?;
    state.manager.delete_relations(tool_args.relations)?;
    Ok("Relations deleted successfully".to_string())
}
