//! JSON-RPC 2.0 types for the stdio transport.
//!
//! The surface is small: initialize, commands/list, commands/execute.

use crate::host::{EditorOptions, HostCommand, Selection};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── JSON-RPC 2.0 ───────────────────────────────────────────────────────────

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Deserialize, Debug)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }

    /// Serialize `result` into a success response.
    pub fn from_result<T: Serialize>(id: Option<Value>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Serialization failed: {e}")),
        }
    }
}

// ─── Server methods ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub server_info: ServerInfo,
    pub capabilities: ServerCapabilities,
}

#[derive(Serialize)]
pub struct ServerCapabilities {
    pub commands: Vec<String>,
}

#[derive(Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct CommandDefinition {
    pub name: String,
    pub title: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct CommandsListResult {
    pub commands: Vec<CommandDefinition>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DocumentParams {
    pub text: String,
    pub language_id: String,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Deserialize, Debug)]
pub struct ExecuteParams {
    pub command: String,
    pub document: DocumentParams,
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub options: Option<EditorOptions>,
    #[serde(default)]
    pub clipboard: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResult {
    pub text: String,
    pub changed: bool,
    pub host_commands: Vec<HostCommand>,
}
