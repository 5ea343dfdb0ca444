//! Daemon activation orchestration.
//!
//! Activation mirrors what an editor extension host does when a YAML
//! buffer first opens: start the analysis server, announce the callback
//! capabilities, push the settings payload, and send the schema
//! associations collected from installed extensions. Afterwards the
//! daemon serves the server's callback requests until the connection
//! closes or a termination signal arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, info};

use yamlhost_client::{
    ActivationHandlers, ClientError, HttpContentFetcher, RequestHandler,
    SchemaContributorRegistry, ServerConfig, YamlLanguageClient,
};
use yamlhost_config::{Config, ConfigError};
use yamlhost_schema::{
    DiscoveryError, SchemaAssociations, collect_schema_associations, discover_extensions,
};

use crate::signals::{self, SignalError};
use crate::telemetry::{self, TelemetryError};

/// Log target for activation events.
const BOOTSTRAP_TARGET: &str = "yamlhostd::bootstrap";

/// Errors surfaced during activation and serving.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying configuration error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The analysis server could not be started or spoken to.
    #[error("analysis server failure: {source}")]
    Server {
        /// Underlying client error.
        #[source]
        source: ClientError,
    },
    /// The extensions directory could not be scanned.
    #[error("failed to scan extensions: {source}")]
    Discovery {
        /// Underlying discovery error.
        #[source]
        source: DiscoveryError,
    },
    /// Signal handlers could not be installed.
    #[error("failed to install signal handlers: {source}")]
    Signals {
        /// Underlying signal error.
        #[source]
        source: SignalError,
    },
}

/// A started activation: the running server plus the configuration that
/// shaped it.
#[derive(Debug)]
pub struct Activation {
    config: Config,
    client: YamlLanguageClient,
    shutting_down: AtomicBool,
}

impl Activation {
    /// Starts the analysis server and performs the activation handshake.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when the server cannot be started, the
    /// handshake fails, or the initial extension scan fails.
    pub fn start(config: Config) -> Result<Self, BootstrapError> {
        let server_error = |source| BootstrapError::Server { source };

        let client = YamlLanguageClient::new(ServerConfig::from_config(&config));
        client.start().map_err(server_error)?;
        client.register_custom_schema_support().map_err(server_error)?;
        client.register_content_support().map_err(server_error)?;
        client.send_settings(config.settings()).map_err(server_error)?;

        let activation = Self {
            config,
            client,
            shutting_down: AtomicBool::new(false),
        };
        let count = activation.refresh_associations()?;
        info!(
            target: BOOTSTRAP_TARGET,
            associations = count,
            "activation complete"
        );
        Ok(activation)
    }

    /// Rescans the extensions directory and pushes the collected
    /// associations to the server, replacing the previous set.
    ///
    /// Returns the number of associations sent.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Discovery`] when the scan fails and
    /// [`BootstrapError::Server`] when the payload cannot be sent.
    pub fn refresh_associations(&self) -> Result<usize, BootstrapError> {
        let extensions = discover_extensions(self.config.extensions_dir())
            .map_err(|source| BootstrapError::Discovery { source })?;
        let associations = collect_schema_associations(&extensions);
        let count = associations.len();

        self.client
            .send_schema_associations(&SchemaAssociations::from(associations))
            .map_err(|source| BootstrapError::Server { source })?;

        info!(
            target: BOOTSTRAP_TARGET,
            extensions = extensions.len(),
            associations = count,
            "schema associations sent"
        );
        Ok(count)
    }

    /// Builds the handler set answering the server's callback requests.
    #[must_use]
    pub fn handlers(&self) -> ActivationHandlers {
        ActivationHandlers::new(
            SchemaContributorRegistry::new(),
            Box::new(HttpContentFetcher::with_proxy(&self.config.settings().http)),
        )
    }

    /// Serves the server's callback requests until the connection closes.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Server`] for connection failures outside
    /// of shutdown.
    pub fn serve(&self, handlers: &dyn RequestHandler) -> Result<(), BootstrapError> {
        loop {
            let request = match self.client.next_server_request() {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(error) if self.shutting_down.load(Ordering::SeqCst) => {
                    debug!(
                        target: BOOTSTRAP_TARGET,
                        error = %error,
                        "ignoring receive failure during shutdown"
                    );
                    break;
                }
                Err(source) => return Err(BootstrapError::Server { source }),
            };

            let reply = handlers.reply_to(&request);
            if let Err(error) = self.client.respond(&reply) {
                if self.shutting_down.load(Ordering::SeqCst) {
                    break;
                }
                return Err(BootstrapError::Server { source: error });
            }
        }

        info!(target: BOOTSTRAP_TARGET, "server connection closed");
        Ok(())
    }

    /// Shuts the analysis server down gracefully.
    ///
    /// Safe to call from the signal thread while [`Activation::serve`]
    /// blocks on the connection; the serve loop unblocks when the server
    /// process exits.
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.client.shutdown();
    }
}

/// Runs the daemon: load configuration, install telemetry and signal
/// handlers, activate, and serve until shutdown.
///
/// # Errors
///
/// Returns [`BootstrapError`] for any failure along the way.
pub fn run() -> Result<(), BootstrapError> {
    let config = Config::load().map_err(|source| BootstrapError::Configuration { source })?;
    telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let activation = Arc::new(Activation::start(config)?);
    signals::install(Arc::clone(&activation))
        .map_err(|source| BootstrapError::Signals { source })?;

    let handlers = activation.handlers();
    activation.serve(&handlers)
}
