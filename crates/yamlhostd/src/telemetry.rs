//! Structured telemetry initialisation for the daemon.
//!
//! Logs go to stderr; stdout stays free for anything the embedding host
//! pipes through the daemon. The format and filter come from the resolved
//! [`Config`], and the global subscriber is installed at most once per
//! process.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use yamlhost_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression did not parse.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// The filter expression that was rejected.
        filter: String,
        /// Parse failure reported by the filter parser.
        message: String,
    },
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {source}")]
    Subscriber {
        /// Underlying installation error.
        #[source]
        source: SetGlobalDefaultError,
    },
}

/// Configures the global tracing subscriber when invoked for the first
/// time.
///
/// Repeated calls are idempotent: the first invocation installs the global
/// subscriber, and later ones return a fresh [`TelemetryHandle`] without
/// touching the global state again.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter expression is invalid or the
/// subscriber cannot be installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let base = fmt::Subscriber::builder()
        .with_env_filter(build_filter(config.log_filter())?)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let installed = match config.log_format() {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(base.json().flatten_event(true).finish())
        }
        LogFormat::Compact => tracing::subscriber::set_global_default(base.compact().finish()),
    };
    installed.map_err(|source| TelemetryError::Subscriber { source })
}

/// Parses the configured filter expression into an [`EnvFilter`].
fn build_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        filter: expression.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn repeated_initialisation_is_idempotent() {
        let config = Config::default();

        let first = initialise(&config).expect("first initialisation failed");
        let second = initialise(&config).expect("second initialisation failed");

        drop(first);
        drop(second);
    }

    #[rstest]
    fn unparseable_filter_is_rejected_with_the_expression() {
        let error = build_filter("not a valid filter").expect_err("expected failure");

        let TelemetryError::Filter { filter, .. } = error else {
            panic!("expected a filter error, got {error:?}");
        };
        assert_eq!(filter, "not a valid filter");
    }
}
