//! Configuration for spawning the analysis server process.

use std::path::PathBuf;

use yamlhost_config::Config;

/// Configuration for launching the external YAML analysis server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The executable path or command name.
    pub command: PathBuf,
    /// Arguments to pass to the server.
    pub args: Vec<String>,
    /// Working directory for the spawned process.
    pub working_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Default configuration: `yaml-language-server --stdio` from PATH.
    #[must_use]
    pub fn yaml_language_server() -> Self {
        Self {
            command: PathBuf::from(yamlhost_config::DEFAULT_SERVER_COMMAND),
            args: vec!["--stdio".to_owned()],
            working_dir: None,
        }
    }

    /// Builds the launch configuration from resolved daemon configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            command: config.server_command().to_path_buf(),
            args: config.server_args().to_vec(),
            working_dir: None,
        }
    }

    /// Sets a custom working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::yaml_language_server()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_launches_yaml_language_server_over_stdio() {
        let config = ServerConfig::yaml_language_server();

        assert_eq!(config.command, PathBuf::from("yaml-language-server"));
        assert_eq!(config.args, vec!["--stdio"]);
        assert!(config.working_dir.is_none());
    }

    #[rstest]
    fn from_config_honours_command_override() {
        let resolved = Config::from_sources(
            Some(r#"{"server_command": "/opt/yaml-ls", "server_args": ["--stdio", "--node-ipc"]}"#),
            |_| None,
        )
        .expect("config resolution failed");

        let config = ServerConfig::from_config(&resolved);

        assert_eq!(config.command, PathBuf::from("/opt/yaml-ls"));
        assert_eq!(config.args, vec!["--stdio", "--node-ipc"]);
    }

    #[rstest]
    fn builder_sets_working_dir() {
        let config = ServerConfig::yaml_language_server().with_working_dir("/workspace");

        assert_eq!(config.working_dir, Some(PathBuf::from("/workspace")));
    }
}
