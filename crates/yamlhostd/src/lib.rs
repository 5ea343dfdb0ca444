//! The YAML language server activation daemon.
//!
//! `yamlhostd` spawns the external `yaml-language-server` process, feeds
//! it the schema associations contributed by installed extensions,
//! forwards the configuration sections the server synchronises, and
//! answers the server's callback requests for custom schemas and remote
//! content. `SIGHUP` triggers a rescan of the extensions directory;
//! `SIGTERM` and `SIGINT` shut the server down gracefully.

mod bootstrap;
mod signals;
mod telemetry;

pub use bootstrap::{Activation, BootstrapError, run};
pub use signals::SignalError;
pub use telemetry::{TelemetryError, TelemetryHandle};
