//! MCP Server implementation for the resonance graph
//!
//! Implements the Model Context Protocol (JSON-RPC 2.0) server directly
//! without external SDK dependencies. One request per line on stdin, one
//! response per line on stdout; logs go to stderr.

use std::io::{BufRead, BufReader, Write};

use serde_json::{json, Value};

use super::handlers::dispatch_tool;
use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RpcFailure, ToolCallResult};
use super::state::ServerState;
use super::tools::tool_definitions;
use crate::core::manager::GraphManager;

const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP Server handler
pub struct McpServer {
    state: ServerState,
}

impl McpServer {
    pub fn new(manager: GraphManager) -> Self {
        Self {
            state: ServerState::new(manager),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    /// Handle a JSON-RPC request
    pub fn handle_request(&mut self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        // Notifications (no id) don't get responses
        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" => {
                    self.state.initialized = true;
                    tracing::info!("MCP client initialized");
                }
                "notifications/cancelled" => {
                    tracing::debug!("MCP request cancelled");
                }
                other => {
                    tracing::debug!(method = %other, "Ignoring unknown notification");
                }
            }
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_call_tool(&request.params),
            "ping" => Ok(json!({})),
            other => Err(RpcFailure::method_not_found(other)),
        };

        Some(JsonRpcResponse::reply(id, outcome))
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": "resonance",
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "resonance is a persistent knowledge graph memory. Store what you learn about the user with create_entities and add_observations; recall it with search_nodes or open_nodes. Preferences and accessibility needs are weighted higher in search and decay more slowly."
        })
    }

    fn handle_call_tool(&mut self, params: &Value) -> Result<Value, RpcFailure> {
        let name = params["name"]
            .as_str()
            .ok_or_else(|| RpcFailure::invalid_params("Missing tool name"))?;
        let arguments = &params["arguments"];

        tracing::debug!(tool = %name, "Tool call");

        let outcome = dispatch_tool(&mut self.state, name, arguments);
        if let Err(e) = &outcome {
            tracing::warn!(tool = %name, error = %e, "Tool call failed");
        }
        Ok(ToolCallResult::from(outcome).into_value())
    }

    /// Serve newline-delimited requests until the reader is exhausted
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, writer: &mut W) -> anyhow::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            tracing::trace!(request = %preview(&line), "Received");

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(&request),
                Err(e) => Some(JsonRpcResponse::unparseable(&e)),
            };

            if let Some(response) = response {
                let json = serde_json::to_string(&response)?;
                tracing::trace!(response = %preview(&json), "Sending");
                writeln!(writer, "{}", json)?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

/// Run the MCP server with STDIO transport
pub fn run_mcp_server(manager: GraphManager) -> anyhow::Result<()> {
    tracing::info!(store = %manager.storage().path().display(), "resonance MCP server starting");

    let mut server = McpServer::new(manager);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    server.serve(BufReader::new(stdin.lock()), &mut stdout)?;

    tracing::info!("resonance MCP server stopping");
    Ok(())
}
