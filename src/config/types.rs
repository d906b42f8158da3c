//! Root configuration struct.

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use serde::{Deserialize, Serialize};

/// Complete relay configuration, merged from defaults, config.json and
/// environment overrides.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// TCP listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
