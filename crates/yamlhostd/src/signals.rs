//! Signal-driven lifecycle control.
//!
//! `SIGHUP` rescans the extensions directory and resends the schema
//! associations; `SIGTERM` and `SIGINT` start a graceful shutdown of the
//! analysis server.

use std::io;
use std::sync::Arc;
use std::thread;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::{info, warn};

use crate::bootstrap::Activation;

/// Log target for signal handling.
const SIGNALS_TARGET: &str = "yamlhostd::signals";

/// Errors reported while installing signal handling.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Installing the signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Spawning the signal listener thread failed.
    #[error("failed to spawn signal listener thread: {source}")]
    Spawn {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Installs the signal listener thread for the given activation.
///
/// # Errors
///
/// Returns [`SignalError`] when the handlers cannot be installed or the
/// listener thread cannot be spawned.
pub fn install(activation: Arc<Activation>) -> Result<(), SignalError> {
    let mut listener = Signals::new([SIGHUP, SIGINT, SIGTERM])
        .map_err(|source| SignalError::Install { source })?;

    thread::Builder::new()
        .name("yamlhostd-signals".to_owned())
        .spawn(move || {
            for signal in listener.forever() {
                match signal {
                    SIGHUP => {
                        info!(
                            target: SIGNALS_TARGET,
                            "reload signal received, rescanning extensions"
                        );
                        if let Err(error) = activation.refresh_associations() {
                            warn!(
                                target: SIGNALS_TARGET,
                                error = %error,
                                "extension rescan failed"
                            );
                        }
                    }
                    SIGINT | SIGTERM => {
                        info!(
                            target: SIGNALS_TARGET,
                            signal,
                            "shutdown signal received"
                        );
                        activation.begin_shutdown();
                        break;
                    }
                    other => {
                        warn!(
                            target: SIGNALS_TARGET,
                            signal = other,
                            "ignoring unexpected signal"
                        );
                    }
                }
            }
        })
        .map_err(|source| SignalError::Spawn { source })?;

    Ok(())
}
