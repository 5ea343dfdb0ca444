//! JSON-RPC 2.0 message types for the server connection.
//!
//! Beyond the client-initiated request/notification/response triple, the
//! YAML server initiates its own requests (schema lookup, content fetch),
//! so the codec also models incoming server requests and the replies the
//! client sends back. Server request ids are kept as raw JSON values and
//! echoed verbatim; the protocol allows both numeric and string ids.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC error code for an unknown method.
pub(crate) const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC error code for malformed request parameters.
pub(crate) const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC error code for handler failures.
pub(crate) const INTERNAL_ERROR: i64 = -32603;

/// Thread-safe request ID generator.
static REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Generates a unique request ID.
///
/// IDs are monotonically increasing and thread-safe.
#[must_use]
pub fn next_request_id() -> i64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// A client-initiated JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Unique request identifier.
    pub id: i64,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a new request with an auto-generated ID.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_request_id(),
            method: method.into(),
            params,
        }
    }
}

/// A client-initiated JSON-RPC 2.0 notification (no response expected).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a new notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// A response to a client-initiated request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    pub jsonrpc: String,
    /// Request identifier this response corresponds to.
    pub id: Option<i64>,
    /// The result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A server-initiated request the client must answer.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerRequest {
    /// Request identifier, echoed verbatim in the reply.
    pub id: Value,
    /// The method the server invokes on the client.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A server-initiated notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerNotification {
    /// The notification method.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// The client's reply to a server-initiated request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcReply {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Identifier of the request being answered.
    pub id: Value,
    /// The result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcReply {
    /// Builds a success reply.
    #[must_use]
    pub const fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error reply.
    #[must_use]
    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// A decoded incoming message, classified by direction.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// Response to a request this client sent.
    Response(JsonRpcResponse),
    /// Request initiated by the server.
    ServerRequest(JsonRpcServerRequest),
    /// Notification initiated by the server.
    Notification(JsonRpcServerNotification),
}

impl JsonRpcMessage {
    /// Decodes and classifies a raw message.
    ///
    /// Messages carrying a `method` are server-initiated (requests when an
    /// `id` is present, notifications otherwise); anything else is a
    /// response.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] for unparseable bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        if value.get("method").is_some() {
            if value.get("id").is_some() {
                return Ok(Self::ServerRequest(serde_json::from_value(value)?));
            }
            return Ok(Self::Notification(serde_json::from_value(value)?));
        }
        Ok(Self::Response(serde_json::from_value(value)?))
    }
}
