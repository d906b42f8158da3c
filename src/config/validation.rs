//! Configuration validation functions.

use super::Config;

/// Validate limits that would otherwise fail in confusing ways at runtime.
/// Used by `--validate-config` and at startup.
pub fn validate_config(config: &Config) -> Result<(), String> {
    let mut errors = Vec::new();

    // Control frames alone may carry up to 125 payload bytes.
    if config.server.max_message_size < 125 {
        errors.push("server.max_message_size must be at least 125 bytes".to_string());
    }

    if config.server.max_handshake_bytes < 256 {
        errors.push("server.max_handshake_bytes must be at least 256 bytes".to_string());
    }

    if config.server.outbound_queue_capacity == 0 {
        errors.push("server.outbound_queue_capacity must be greater than zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn zero_queue_capacity_is_rejected() {
        let mut config = Config::default();
        config.server.outbound_queue_capacity = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("outbound_queue_capacity"));
    }

    #[test]
    fn tiny_message_size_is_rejected() {
        let mut config = Config::default();
        config.server.max_message_size = 64;
        assert!(validate_config(&config).is_err());
    }
}
