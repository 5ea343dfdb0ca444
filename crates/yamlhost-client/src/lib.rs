//! Client connection to the external YAML analysis server.
//!
//! The crate spawns the `yaml-language-server` process, speaks JSON-RPC
//! 2.0 over LSP header-framed stdio, and layers the custom vocabulary the
//! YAML server understands on top of the standard protocol: the
//! `json/schemaAssociations` notification, the registration notifications
//! for custom schema and content support, and the server-initiated schema
//! lookup and remote content fetch requests.
//!
//! The client is an owned value: activation code constructs it, starts it,
//! and threads it to whatever needs it. There is no process-wide handle.

mod api;
mod client;
mod config;
mod dispatch;
mod error;
mod fetch;
mod jsonrpc;
mod protocol;
#[cfg(test)]
mod tests;
mod transport;

pub use api::{ApiError, SchemaContributor, SchemaContributorRegistry};
pub use client::YamlLanguageClient;
pub use config::ServerConfig;
pub use dispatch::{ActivationHandlers, RequestError, RequestHandler};
pub use error::{ClientError, TransportError};
pub use fetch::{ContentFetcher, FetchError, HttpContentFetcher};
pub use jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcReply, JsonRpcRequest,
    JsonRpcResponse, JsonRpcServerNotification, JsonRpcServerRequest,
};
pub use protocol::{
    CUSTOM_CONTENT_REQUEST, CUSTOM_SCHEMA_REQUEST, EDITOR_CONTENT_REQUEST,
    REGISTER_CONTENT_NOTIFICATION, REGISTER_CUSTOM_SCHEMA_NOTIFICATION,
    SCHEMA_ASSOCIATIONS_NOTIFICATION,
};
pub use transport::{FrameReader, FrameWriter, StdioReader, StdioWriter};
