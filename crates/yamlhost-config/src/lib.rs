//! Configuration for the yamlhost daemon.
//!
//! Configuration resolves in two layers: an optional JSON config file
//! (`$YAMLHOST_CONFIG`, falling back to `yamlhost/config.json` under the
//! per-user configuration directory) overridden by `YAMLHOST_*` environment
//! variables. The resolved [`Config`] carries the server launch command,
//! the extensions directory to scan for schema contributions, the logging
//! filter and format, and the [`SettingsPayload`] forwarded to the server.

mod defaults;
mod logging;
mod settings;

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SERVER_COMMAND, JSON_WATCH_GLOB, YAML_WATCH_GLOB,
    default_log_filter,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use settings::{
    EditorSettings, HttpSettings, SchemaStoreSettings, SettingsPayload, YamlSettings,
};

/// Environment variable pointing at an alternative config file.
const CONFIG_PATH_VAR: &str = "YAMLHOST_CONFIG";
/// Environment variable overriding the log filter expression.
const LOG_FILTER_VAR: &str = "YAMLHOST_LOG";
/// Environment variable overriding the log output format.
const LOG_FORMAT_VAR: &str = "YAMLHOST_LOG_FORMAT";
/// Environment variable overriding the server launch command.
const SERVER_COMMAND_VAR: &str = "YAMLHOST_SERVER";
/// Environment variable overriding the extensions directory.
const EXTENSIONS_DIR_VAR: &str = "YAMLHOST_EXTENSIONS_DIR";

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    server_command: PathBuf,
    server_args: Vec<String>,
    extensions_dir: PathBuf,
    log_filter: String,
    log_format: LogFormat,
    settings: SettingsPayload,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_command: defaults::default_server_command(),
            server_args: defaults::default_server_args(),
            extensions_dir: defaults::default_extensions_dir(),
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            settings: SettingsPayload::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file and process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the config file exists but cannot be
    /// read or parsed, or when an environment override is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        let raw = read_optional(&path)?;
        Self::from_sources(raw.as_deref(), |key| env::var(key).ok())
    }

    /// Resolves configuration from explicit sources.
    ///
    /// `file` is the raw JSON config file content, when one exists; `env`
    /// supplies environment overrides by variable name. Split out from
    /// [`Config::load`] so tests can resolve configuration without touching
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for unparseable file content and
    /// [`ConfigError::InvalidLogFormat`] for an unrecognised
    /// `YAMLHOST_LOG_FORMAT` value.
    pub fn from_sources<E>(file: Option<&str>, env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some(raw) => serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })?,
            None => Self::default(),
        };

        if let Some(filter) = env(LOG_FILTER_VAR) {
            config.log_filter = filter;
        }
        if let Some(format) = env(LOG_FORMAT_VAR) {
            config.log_format = format
                .parse()
                .map_err(|source| ConfigError::InvalidLogFormat {
                    value: format,
                    source,
                })?;
        }
        if let Some(command) = env(SERVER_COMMAND_VAR) {
            config.server_command = PathBuf::from(command);
        }
        if let Some(dir) = env(EXTENSIONS_DIR_VAR) {
            config.extensions_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Command used to launch the analysis server.
    #[must_use]
    pub fn server_command(&self) -> &Path {
        &self.server_command
    }

    /// Arguments passed to the server command.
    #[must_use]
    pub fn server_args(&self) -> &[String] {
        &self.server_args
    }

    /// Directory scanned for installed extensions.
    #[must_use]
    pub fn extensions_dir(&self) -> &Path {
        &self.extensions_dir
    }

    /// Log filter expression for the tracing subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Settings payload forwarded to the server.
    #[must_use]
    pub const fn settings(&self) -> &SettingsPayload {
        &self.settings
    }
}

/// Location of the config file, honouring the override variable.
fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_VAR) {
        return PathBuf::from(path);
    }
    let mut dir = dirs::config_dir().unwrap_or_else(env::temp_dir);
    dir.push("yamlhost");
    dir.push("config.json");
    dir
}

/// Reads a file that is allowed to be absent.
fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path of the file that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The config file content is not valid JSON for the expected shape.
    #[error("failed to parse config file: {source}")]
    Parse {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The log format override is not a recognised format name.
    #[error("invalid log format '{value}': {source}")]
    InvalidLogFormat {
        /// Value that failed to parse.
        value: String,
        /// Underlying parse error.
        #[source]
        source: LogFormatParseError,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[rstest]
    fn defaults_apply_without_sources() {
        let config = Config::from_sources(None, no_env).expect("resolution failed");

        assert_eq!(config.server_command(), Path::new("yaml-language-server"));
        assert_eq!(config.server_args(), ["--stdio"]);
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[rstest]
    fn file_values_override_defaults() {
        let raw = r#"{
            "server_command": "/opt/yaml-ls",
            "log_filter": "debug",
            "log_format": "compact"
        }"#;

        let config = Config::from_sources(Some(raw), no_env).expect("resolution failed");

        assert_eq!(config.server_command(), Path::new("/opt/yaml-ls"));
        assert_eq!(config.log_filter(), "debug");
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[rstest]
    fn environment_overrides_file_values() {
        let raw = r#"{"log_filter": "debug"}"#;
        let mut env = HashMap::new();
        env.insert("YAMLHOST_LOG", "trace");
        env.insert("YAMLHOST_SERVER", "/usr/local/bin/yaml-ls");
        env.insert("YAMLHOST_EXTENSIONS_DIR", "/srv/extensions");

        let config = Config::from_sources(Some(raw), |key| {
            env.get(key).map(|v| (*v).to_owned())
        })
        .expect("resolution failed");

        assert_eq!(config.log_filter(), "trace");
        assert_eq!(config.server_command(), Path::new("/usr/local/bin/yaml-ls"));
        assert_eq!(config.extensions_dir(), Path::new("/srv/extensions"));
    }

    #[rstest]
    fn unparseable_file_surfaces_parse_error() {
        let result = Config::from_sources(Some("{not json"), no_env);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[rstest]
    fn invalid_log_format_override_is_rejected() {
        let result = Config::from_sources(None, |key| {
            (key == "YAMLHOST_LOG_FORMAT").then(|| "verbose".to_owned())
        });

        assert!(matches!(result, Err(ConfigError::InvalidLogFormat { .. })));
    }

    #[rstest]
    fn settings_payload_loads_from_file() {
        let raw = r#"{"settings": {"yaml": {"validate": false}}}"#;

        let config = Config::from_sources(Some(raw), no_env).expect("resolution failed");

        assert!(!config.settings().yaml.validate);
    }
}
