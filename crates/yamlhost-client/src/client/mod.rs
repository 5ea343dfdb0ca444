//! The connection to a spawned YAML analysis server.
//!
//! [`YamlLanguageClient`] owns the server process: it spawns the
//! executable, runs the LSP initialization handshake, and exposes typed
//! helpers for the notifications the shim forwards (schema associations,
//! settings, watched-file events, capability registrations). Incoming
//! traffic is drained through [`YamlLanguageClient::next_server_request`],
//! which surfaces server-initiated requests for the caller to answer.
//!
//! The inbound and outbound halves of the connection are locked
//! separately, so notifications can be sent while another thread is
//! blocked waiting for the next server request.

use std::io;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use lsp_types::{
    ClientCapabilities, DidChangeConfigurationParams, DidChangeWatchedFilesParams, FileEvent,
    InitializeParams, InitializeResult, InitializedParams,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use yamlhost_config::SettingsPayload;
use yamlhost_schema::SchemaAssociations;

use crate::config::ServerConfig;
use crate::error::{ClientError, TransportError};
use crate::jsonrpc::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcReply, JsonRpcRequest, JsonRpcResponse,
    JsonRpcServerRequest,
};
use crate::protocol::{
    REGISTER_CONTENT_NOTIFICATION, REGISTER_CUSTOM_SCHEMA_NOTIFICATION,
    SCHEMA_ASSOCIATIONS_NOTIFICATION,
};
use crate::transport::{StdioReader, StdioWriter, from_child_io};

/// Log target for client operations.
const CLIENT_TARGET: &str = "yamlhost_client::client";

/// Maximum number of messages to drain while waiting for a matching
/// response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// Client connection to the external YAML analysis server.
pub struct YamlLanguageClient {
    config: ServerConfig,
    child: Mutex<Option<Child>>,
    reader: Mutex<Option<StdioReader>>,
    writer: Mutex<Option<StdioWriter>>,
}

/// Locks a mutex, recovering the guard when a panic poisoned it.
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl YamlLanguageClient {
    /// Creates a client for the given launch configuration.
    ///
    /// The server is not spawned until [`YamlLanguageClient::start`].
    #[must_use]
    pub const fn new(config: ServerConfig) -> Self {
        Self {
            config,
            child: Mutex::new(None),
            reader: Mutex::new(None),
            writer: Mutex::new(None),
        }
    }

    /// Spawns the server and runs the initialization handshake.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BinaryNotFound`] when the server command is
    /// missing, [`ClientError::SpawnFailed`] for other spawn failures, and
    /// [`ClientError::InitializationFailed`] when the handshake fails.
    pub fn start(&self) -> Result<(), ClientError> {
        self.spawn_process()?;

        let params = InitializeParams {
            process_id: Some(std::process::id()),
            capabilities: ClientCapabilities::default(),
            ..Default::default()
        };

        let result: InitializeResult = self.send_request("initialize", params)?;
        self.send_notification("initialized", InitializedParams {})?;

        debug!(
            target: CLIENT_TARGET,
            server = ?result.server_info.map(|info| info.name),
            "analysis server initialized"
        );
        Ok(())
    }

    /// Sends the schema association payload to the server.
    ///
    /// Called once after startup and again whenever the host's extension
    /// set changes; the payload always replaces the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the notification cannot be sent.
    pub fn send_schema_associations(
        &self,
        associations: &SchemaAssociations,
    ) -> Result<(), ClientError> {
        debug!(
            target: CLIENT_TARGET,
            count = associations.len(),
            "sending schema associations"
        );
        self.send_notification(SCHEMA_ASSOCIATIONS_NOTIFICATION, associations)
    }

    /// Tells the server the client answers custom schema requests.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the notification cannot be sent.
    pub fn register_custom_schema_support(&self) -> Result<(), ClientError> {
        self.send_notification(REGISTER_CUSTOM_SCHEMA_NOTIFICATION, serde_json::json!({}))
    }

    /// Tells the server the client answers remote content requests.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the notification cannot be sent.
    pub fn register_content_support(&self) -> Result<(), ClientError> {
        self.send_notification(REGISTER_CONTENT_NOTIFICATION, serde_json::json!({}))
    }

    /// Forwards the editor configuration sections the server synchronises.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the notification cannot be sent.
    pub fn send_settings(&self, settings: &SettingsPayload) -> Result<(), ClientError> {
        let params = DidChangeConfigurationParams {
            settings: serde_json::to_value(settings)?,
        };
        self.send_notification("workspace/didChangeConfiguration", params)
    }

    /// Forwards watched-file change events from the host's file watcher.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the notification cannot be sent.
    pub fn notify_watched_files(&self, changes: Vec<FileEvent>) -> Result<(), ClientError> {
        self.send_notification(
            "workspace/didChangeWatchedFiles",
            DidChangeWatchedFilesParams { changes },
        )
    }

    /// Blocks until the server initiates a request, draining interleaved
    /// notifications and stray responses.
    ///
    /// Returns `Ok(None)` when the server closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or codec failures.
    pub fn next_server_request(&self) -> Result<Option<JsonRpcServerRequest>, ClientError> {
        loop {
            let bytes = match self.receive_message() {
                Ok(bytes) => bytes,
                Err(ClientError::Transport(TransportError::Io(error)))
                    if error.kind() == io::ErrorKind::UnexpectedEof =>
                {
                    debug!(target: CLIENT_TARGET, "server closed the connection");
                    return Ok(None);
                }
                Err(error) => return Err(error),
            };

            match JsonRpcMessage::from_bytes(&bytes)? {
                JsonRpcMessage::ServerRequest(request) => {
                    debug!(
                        target: CLIENT_TARGET,
                        method = %request.method,
                        "received server request"
                    );
                    return Ok(Some(request));
                }
                JsonRpcMessage::Notification(notification) => {
                    debug!(
                        target: CLIENT_TARGET,
                        method = %notification.method,
                        "skipping server notification"
                    );
                }
                JsonRpcMessage::Response(response) => {
                    debug!(
                        target: CLIENT_TARGET,
                        id = ?response.id,
                        "discarding response nobody is waiting for"
                    );
                }
            }
        }
    }

    /// Sends the reply to a server-initiated request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the reply cannot be sent.
    pub fn respond(&self, reply: &JsonRpcReply) -> Result<(), ClientError> {
        let payload = serde_json::to_vec(reply)?;
        self.send_payload(&payload)
    }

    /// Performs graceful shutdown of the server.
    ///
    /// Sends a `shutdown` request followed by an `exit` notification
    /// without waiting for a reply (a reader thread blocked in
    /// [`YamlLanguageClient::next_server_request`] drains it), then waits
    /// for the process to terminate, killing it after a grace period.
    pub fn shutdown(&self) {
        debug!(target: CLIENT_TARGET, "initiating graceful shutdown");

        if let Err(error) = self.send_shutdown_messages() {
            debug!(
                target: CLIENT_TARGET,
                error = ?error,
                "shutdown handshake failed"
            );
        }
        *lock_or_recover(&self.writer) = None;

        if let Some(mut child) = lock_or_recover(&self.child).take() {
            terminate_child(&mut child);
        }
    }

    /// Sends the `shutdown` request and `exit` notification.
    fn send_shutdown_messages(&self) -> Result<(), ClientError> {
        let request = JsonRpcRequest::new("shutdown", None);
        self.send_payload(&serde_json::to_vec(&request)?)?;
        let exit = JsonRpcNotification::new("exit", None);
        self.send_payload(&serde_json::to_vec(&exit)?)
    }

    /// Spawns the server process and captures its stdio.
    fn spawn_process(&self) -> Result<(), ClientError> {
        debug!(
            target: CLIENT_TARGET,
            command = %self.config.command.display(),
            args = ?self.config.args,
            "spawning analysis server process"
        );

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                ClientError::BinaryNotFound {
                    command: self.config.command.display().to_string(),
                    source: error,
                }
            } else {
                ClientError::SpawnFailed {
                    message: format!("failed to start {}", self.config.command.display()),
                    source: error,
                }
            }
        })?;

        let stdin = child.stdin.take().ok_or_else(|| ClientError::SpawnFailed {
            message: "failed to capture stdin".to_owned(),
            source: io::Error::other("no stdin"),
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClientError::SpawnFailed {
                message: "failed to capture stdout".to_owned(),
                source: io::Error::other("no stdout"),
            })?;

        let (reader, writer) = from_child_io(stdout, stdin);

        debug!(
            target: CLIENT_TARGET,
            pid = child.id(),
            "analysis server process spawned"
        );

        *lock_or_recover(&self.child) = Some(child);
        *lock_or_recover(&self.reader) = Some(reader);
        *lock_or_recover(&self.writer) = Some(writer);
        Ok(())
    }

    /// Sends one already-encoded message over the outbound half.
    fn send_payload(&self, payload: &[u8]) -> Result<(), ClientError> {
        let mut guard = lock_or_recover(&self.writer);
        let writer = guard.as_mut().ok_or(ClientError::ProcessExited)?;
        writer.send(payload)?;
        Ok(())
    }

    /// Receives one message from the inbound half, blocking until it
    /// arrives.
    fn receive_message(&self) -> Result<Vec<u8>, ClientError> {
        let mut guard = lock_or_recover(&self.reader);
        let reader = guard.as_mut().ok_or(ClientError::ProcessExited)?;
        Ok(reader.receive()?)
    }

    /// Sends a request and waits for its typed response.
    ///
    /// Only used during the initialization handshake, before any other
    /// thread reads from the connection.
    fn send_request<P, R>(&self, method: &str, params: P) -> Result<R, ClientError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params_value = serde_json::to_value(params)?;
        let request = JsonRpcRequest::new(method, Some(params_value));
        let request_id = request.id;

        debug!(
            target: CLIENT_TARGET,
            method,
            id = request_id,
            "sending request"
        );

        self.send_payload(&serde_json::to_vec(&request)?)?;

        let mut guard = lock_or_recover(&self.reader);
        let reader = guard.as_mut().ok_or(ClientError::ProcessExited)?;
        let response = receive_response_for_request(reader, request_id)?;
        drop(guard);

        if let Some(error) = response.error {
            return Err(ClientError::from_jsonrpc(error));
        }

        let result = response
            .result
            .ok_or_else(|| ClientError::InitializationFailed {
                message: "empty result in response".to_owned(),
            })?;
        serde_json::from_value(result).map_err(ClientError::from)
    }

    /// Sends a notification (no response expected).
    fn send_notification<P>(&self, method: &str, params: P) -> Result<(), ClientError>
    where
        P: Serialize,
    {
        let params_value = serde_json::to_value(params)?;
        let notification = JsonRpcNotification::new(method, Some(params_value));

        debug!(target: CLIENT_TARGET, method, "sending notification");

        self.send_payload(&serde_json::to_vec(&notification)?)
    }
}

/// Drains messages until the response matching `request_id` arrives.
///
/// Server requests and notifications that interleave with the awaited
/// response are skipped with a log line; a bounded iteration count keeps a
/// misbehaving server from wedging the client.
fn receive_response_for_request(
    reader: &mut StdioReader,
    request_id: i64,
) -> Result<JsonRpcResponse, ClientError> {
    let mut iteration_count = 0;
    loop {
        if iteration_count >= MAX_RESPONSE_ITERATIONS {
            warn!(
                target: CLIENT_TARGET,
                request_id,
                max_iterations = MAX_RESPONSE_ITERATIONS,
                "giving up on response after reaching maximum iterations"
            );
            return Err(ClientError::MaxResponseIterations { request_id });
        }
        iteration_count += 1;

        let message_bytes = reader.receive()?;

        match JsonRpcMessage::from_bytes(&message_bytes)? {
            JsonRpcMessage::Response(response) => {
                if response.id == Some(request_id) {
                    return Ok(response);
                }
                warn!(
                    target: CLIENT_TARGET,
                    expected = request_id,
                    received = ?response.id,
                    "skipping response with non-matching ID"
                );
            }
            JsonRpcMessage::ServerRequest(request) => {
                warn!(
                    target: CLIENT_TARGET,
                    method = %request.method,
                    "deferring server request received mid-handshake"
                );
            }
            JsonRpcMessage::Notification(notification) => {
                debug!(
                    target: CLIENT_TARGET,
                    method = %notification.method,
                    "skipping server notification"
                );
            }
        }
    }
}

/// Waits for the child to exit, killing it after a short grace period.
fn terminate_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(target: CLIENT_TARGET, ?status, "analysis server exited");
        }
        Ok(None) => {
            debug!(
                target: CLIENT_TARGET,
                "analysis server still running, waiting before killing"
            );
            wait_then_kill(child);
        }
        Err(error) => {
            warn!(
                target: CLIENT_TARGET,
                error = %error,
                "failed to check process status, waiting before killing"
            );
            wait_then_kill(child);
        }
    }
}

/// Grace period before a forced kill.
fn wait_then_kill(child: &mut Child) {
    thread::sleep(Duration::from_millis(200));
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(
                target: CLIENT_TARGET,
                ?status,
                "analysis server exited during grace period"
            );
        }
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for YamlLanguageClient {
    fn drop(&mut self) {
        if let Some(mut child) = lock_or_recover(&self.child).take() {
            if let Err(error) = child.kill() {
                warn!(
                    target: CLIENT_TARGET,
                    error = %error,
                    "failed to kill analysis server process on drop"
                );
            } else {
                let _ = child.wait();
            }
        }
    }
}

impl std::fmt::Debug for YamlLanguageClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock_or_recover(&self.child)
            .as_ref()
            .map_or_else(|| "stopped".to_owned(), |child| {
                format!("running (pid: {})", child.id())
            });

        formatter
            .debug_struct("YamlLanguageClient")
            .field("command", &self.config.command)
            .field("state", &state)
            .finish()
    }
}
