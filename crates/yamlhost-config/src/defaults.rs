//! Default values shared by the daemon and its configuration surface.

use std::env;
use std::path::PathBuf;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Command used to launch the external YAML analysis server.
pub const DEFAULT_SERVER_COMMAND: &str = "yaml-language-server";

/// Glob the host file watcher uses for YAML documents.
///
/// Covers `.yml`, `.yaml`, `.eyml`, and `.eyaml` extensions.
pub const YAML_WATCH_GLOB: &str = "**/*.?(e)y?(a)ml";

/// Glob the host file watcher uses for JSON schema files.
pub const JSON_WATCH_GLOB: &str = "**/*.json";

/// Default log filter expression used by the daemon.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Default server launch command.
#[must_use]
pub fn default_server_command() -> PathBuf {
    PathBuf::from(DEFAULT_SERVER_COMMAND)
}

/// Default arguments passed to the server command.
#[must_use]
pub fn default_server_args() -> Vec<String> {
    vec!["--stdio".to_owned()]
}

/// Default directory scanned for installed extensions.
///
/// Falls back to a temp-dir location when no per-user configuration
/// directory can be resolved.
#[must_use]
pub fn default_extensions_dir() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_else(env::temp_dir);
    dir.push("yamlhost");
    dir.push("extensions");
    dir
}

/// Default editor tab size forwarded to the server.
#[must_use]
pub const fn default_tab_size() -> u32 {
    2
}

/// Serde helper for fields that default to `true`.
#[must_use]
pub(crate) const fn default_true() -> bool {
    true
}
