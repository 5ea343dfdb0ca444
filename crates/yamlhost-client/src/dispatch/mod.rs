//! Dispatch of server-initiated requests.
//!
//! After activation the server may call back into the client for custom
//! schema lookups (`custom/schema/request`, `custom/schema/content`) and
//! for remote content it cannot fetch itself (`vscode/content`).
//! [`ActivationHandlers`] answers those three; everything else gets a
//! MethodNotFound error so the server can degrade gracefully.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::api::SchemaContributorRegistry;
use crate::fetch::{ContentFetcher, FetchError};
use crate::jsonrpc::{self, JsonRpcReply, JsonRpcServerRequest};
use crate::protocol::{CUSTOM_CONTENT_REQUEST, CUSTOM_SCHEMA_REQUEST, EDITOR_CONTENT_REQUEST};

/// Log target for request dispatch.
const DISPATCH_TARGET: &str = "yamlhost_client::dispatch";

/// Answers server-initiated requests.
pub trait RequestHandler {
    /// Computes the result for one request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] when the method is unknown, the parameters
    /// are malformed, or the handler itself fails.
    fn handle(&self, method: &str, params: Option<&Value>) -> Result<Value, RequestError>;

    /// Builds the JSON-RPC reply for one request.
    fn reply_to(&self, request: &JsonRpcServerRequest) -> JsonRpcReply {
        match self.handle(&request.method, request.params.as_ref()) {
            Ok(result) => JsonRpcReply::success(request.id.clone(), result),
            Err(error) => {
                debug!(
                    target: DISPATCH_TARGET,
                    method = %request.method,
                    error = %error,
                    "request handler failed"
                );
                JsonRpcReply::failure(request.id.clone(), error.code(), error.to_string())
            }
        }
    }
}

/// Errors surfaced to the server as JSON-RPC error replies.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The client does not implement the requested method.
    #[error("method '{method}' is not supported")]
    MethodNotFound {
        /// The unsupported method name.
        method: String,
    },

    /// The request parameters do not match the expected shape.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of the mismatch.
        message: String,
    },

    /// A remote content fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl RequestError {
    /// JSON-RPC error code for this failure.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::MethodNotFound { .. } => jsonrpc::METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => jsonrpc::INVALID_PARAMS,
            Self::Fetch(_) => jsonrpc::INTERNAL_ERROR,
        }
    }
}

/// The handler set installed at activation.
pub struct ActivationHandlers {
    registry: SchemaContributorRegistry,
    fetcher: Box<dyn ContentFetcher>,
}

impl ActivationHandlers {
    /// Creates the handler set from a contributor registry and a fetcher.
    #[must_use]
    pub fn new(registry: SchemaContributorRegistry, fetcher: Box<dyn ContentFetcher>) -> Self {
        Self { registry, fetcher }
    }

    /// The contributor registry, for registrations before serving starts.
    #[must_use]
    pub const fn registry_mut(&mut self) -> &mut SchemaContributorRegistry {
        &mut self.registry
    }
}

/// Extracts the single string parameter these requests carry.
fn string_param(params: Option<&Value>) -> Result<&str, RequestError> {
    params
        .and_then(Value::as_str)
        .ok_or_else(|| RequestError::InvalidParams {
            message: "expected a single string parameter".to_owned(),
        })
}

impl RequestHandler for ActivationHandlers {
    fn handle(&self, method: &str, params: Option<&Value>) -> Result<Value, RequestError> {
        match method {
            CUSTOM_SCHEMA_REQUEST => {
                let resource = string_param(params)?;
                // No contribution is a valid answer, not an error.
                Ok(self
                    .registry
                    .schema_for_resource(resource)
                    .map_or(Value::Null, Value::String))
            }
            CUSTOM_CONTENT_REQUEST => {
                let uri = string_param(params)?;
                Ok(self
                    .registry
                    .schema_content(uri)
                    .map_or(Value::Null, Value::String))
            }
            EDITOR_CONTENT_REQUEST => {
                let uri = string_param(params)?;
                let body = self.fetcher.fetch(uri)?;
                Ok(Value::String(body))
            }
            other => Err(RequestError::MethodNotFound {
                method: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Debug for ActivationHandlers {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ActivationHandlers")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests;
