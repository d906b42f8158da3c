//! Configuration module for the relay.
//!
//! Supports JSON configuration files, environment variable overrides and
//! compiled-in defaults:
//!
//! - [`types`]: root `Config` struct
//! - [`server`]: per-connection limits
//! - [`logging`]: logging configuration
//! - [`loader`]: configuration loading and merging
//! - [`validation`]: startup validation

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod server;
pub mod types;
pub mod validation;

pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use server::ServerConfig;
pub use types::Config;
pub use validation::validate_config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 4444);
        assert_eq!(config.server.max_message_size, 1024 * 1024);
        assert_eq!(config.server.max_handshake_bytes, 8 * 1024);
        assert_eq!(config.server.outbound_queue_capacity, 64);

        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "relay.log");
        assert_eq!(config.logging.rotation, "daily");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(
            config.server.max_message_size,
            deserialized.server.max_message_size
        );
        assert_eq!(config.logging.dir, deserialized.logging.dir);
    }

    #[test]
    fn partial_json_falls_back_to_field_defaults() {
        let config: Config = serde_json::from_str(r#"{"port": 9001}"#).unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.server.outbound_queue_capacity, 64);
    }

    #[test]
    fn test_log_level_parsing() {
        let level: LogLevel = serde_json::from_str(r#""WARNING""#).unwrap();
        assert_eq!(level, LogLevel::Warn);
        assert_eq!(level.as_str(), "warn");
        assert!(serde_json::from_str::<LogLevel>(r#""loud""#).is_err());
    }
}
