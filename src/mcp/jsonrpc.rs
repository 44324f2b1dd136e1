//! JSON-RPC 2.0 framing for the MCP stdio transport
//!
//! Protocol failures (`-32xxx`) end up in the response `error` member.
//! Tool failures are not protocol failures: they travel as a successful
//! `tools/call` result flagged with `isError`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::handlers::ToolResult;

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

const VERSION: &str = "2.0";

/// One incoming line
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Error member of a response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
}

impl RpcFailure {
    pub fn parse_error(err: &serde_json::Error) -> Self {
        Self {
            code: PARSE_ERROR,
            message: format!("Parse error: {}", err),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Result(Value),
    Error(RpcFailure),
}

/// One outgoing line: exactly one of `result` or `error`
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(flatten)]
    outcome: Outcome,
}

impl JsonRpcResponse {
    pub fn reply(id: Value, outcome: Result<Value, RpcFailure>) -> Self {
        Self {
            jsonrpc: VERSION,
            id,
            outcome: match outcome {
                Ok(value) => Outcome::Result(value),
                Err(failure) => Outcome::Error(failure),
            },
        }
    }

    /// A line that could not be read as a request has no id to answer to
    pub fn unparseable(err: &serde_json::Error) -> Self {
        Self::reply(Value::Null, Err(RpcFailure::parse_error(err)))
    }
}

#[derive(Debug, Serialize)]
struct TextContent {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

/// Result of `tools/call`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    content: Vec<TextContent>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

impl ToolCallResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent { kind: "text", text }],
            is_error,
        }
    }

    pub fn into_value(self) -> Value {
        json!(self)
    }
}

impl From<ToolResult> for ToolCallResult {
    fn from(result: ToolResult) -> Self {
        match result {
            Ok(text) => Self::text(text, false),
            Err(err) => Self::text(err.to_string(), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MemoryError;
    use crate::mcp::handlers::ToolError;

    #[test]
    fn test_reply_carries_one_member() {
        let ok = serde_json::to_value(JsonRpcResponse::reply(json!(1), Ok(json!({})))).unwrap();
        assert_eq!(ok["jsonrpc"], "2.0");
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(JsonRpcResponse::reply(
            json!("a"),
            Err(RpcFailure::method_not_found("fly")),
        ))
        .unwrap();
        assert!(failed.get("result").is_none());
        assert_eq!(failed["id"], "a");
        assert_eq!(failed["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(failed["error"]["message"], "Method not found: fly");
    }

    #[test]
    fn test_unparseable_line_answers_null() {
        let err = serde_json::from_str::<JsonRpcRequest>("{").unwrap_err();
        let response = serde_json::to_value(JsonRpcResponse::unparseable(&err)).unwrap();
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert!(response["error"]["message"].as_str().unwrap().starts_with("Parse error:"));
    }

    #[test]
    fn test_notification_has_no_id() {
        let note: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(note.is_notification());
        assert_eq!(note.params, Value::Null);
    }

    #[test]
    fn test_tool_result_flags_only_failures() {
        let done: ToolResult = Ok("done".to_string());
        let ok = ToolCallResult::from(done).into_value();
        assert_eq!(ok["content"][0]["type"], "text");
        assert_eq!(ok["content"][0]["text"], "done");
        assert!(ok.get("isError").is_none());

        let failed = ToolCallResult::from(Err(ToolError::Memory(MemoryError::EntityNotFound(
            "Ghost".to_string(),
        ))))
        .into_value();
        assert_eq!(failed["isError"], true);
        assert!(failed["content"][0]["text"]
            .as_str()
            .unwrap()
            .ends_with("Entity with name Ghost not found"));
    }
}
