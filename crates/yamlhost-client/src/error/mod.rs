//! Error types for the client connection.

use std::io;

use thiserror::Error;

use crate::jsonrpc::JsonRpcError;

/// Errors raised while managing the analysis server connection.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server binary was not found.
    #[error("analysis server binary not found: {command}")]
    BinaryNotFound {
        /// The command that was not found.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to spawn the server process.
    #[error("failed to spawn analysis server process: {message}")]
    SpawnFailed {
        /// Description of the spawn failure.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Transport-level I/O error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON serialization/deserialization error.
    #[error("JSON codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server returned an error response.
    #[error("server returned error: {message} (code: {code})")]
    ServerError {
        /// The JSON-RPC error code.
        code: i64,
        /// The error message from the server.
        message: String,
    },

    /// Initialization handshake failed.
    #[error("initialization failed: {message}")]
    InitializationFailed {
        /// Description of the initialization failure.
        message: String,
    },

    /// Process exited unexpectedly or was never started.
    #[error("analysis server process is not running")]
    ProcessExited,

    /// No matching response arrived within the bounded message window.
    #[error("no response for request {request_id} within the message window")]
    MaxResponseIterations {
        /// The request still waiting for its response.
        request_id: i64,
    },
}

impl ClientError {
    /// Creates a server error from a JSON-RPC error object.
    #[must_use]
    pub fn from_jsonrpc(error: JsonRpcError) -> Self {
        Self::ServerError {
            code: error.code,
            message: error.message,
        }
    }
}

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing Content-Length header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// Invalid header format.
    #[error("invalid header format")]
    InvalidHeader,
}
