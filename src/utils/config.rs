use clap::Args;
use std::path::PathBuf;

use crate::command::Command;

/// API server configuration: the bind address plus everything a run needs
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// The host address the API is available on
    #[arg(long, env = "HOST", default_value = "localhost")]
    pub host: String,

    /// The port the API is available on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[command(flatten)]
    pub missions: Config,
}

/// Mission run configuration, read from flags or the environment
#[derive(Debug, Clone, Args)]
pub struct Config {
    #[command(flatten)]
    pub target: TargetConfig,

    /// Command template used to verify a mission
    #[arg(long, env = "VERIFY_COMMAND", default_value = Command::Test.default_template())]
    pub verify_command: String,

    /// Command template used to list a mission's requirements
    #[arg(long, env = "LIST_COMMAND", default_value = Command::List.default_template())]
    pub list_command: String,

    /// Directory the test engine runs in
    #[arg(long, env = "SUITE_DIR")]
    pub suite_dir: Option<PathBuf>,
}

/// The application under test
#[derive(Debug, Clone, Args)]
pub struct TargetConfig {
    #[arg(
        id = "target_protocol",
        long = "target-protocol",
        env = "TARGET_PROTOCOL",
        default_value = "http"
    )]
    pub protocol: String,

    #[arg(
        id = "target_host",
        long = "target-host",
        env = "TARGET_HOST",
        default_value = "localhost"
    )]
    pub host: String,

    #[arg(id = "target_port", long = "target-port", env = "TARGET_PORT")]
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            missions: Config::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            verify_command: Command::Test.default_template().to_string(),
            list_command: Command::List.default_template().to_string(),
            suite_dir: None,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    pub fn template(&self, command: Command) -> &str {
        match command {
            Command::Test => &self.verify_command,
            Command::List => &self.list_command,
        }
    }
}

impl TargetConfig {
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.protocol, self.host, port),
            None => format!("{}://{}", self.protocol, self.host),
        }
    }

    /// Environment handed to the test engine
    pub fn child_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            ("BASE_URL".to_string(), self.base_url()),
            ("TARGET_PROTOCOL".to_string(), self.protocol.clone()),
            ("TARGET_HOST".to_string(), self.host.clone()),
        ];
        if let Some(port) = self.port {
            env.push(("TARGET_PORT".to_string(), port.to_string()));
        }
        env
    }
}
