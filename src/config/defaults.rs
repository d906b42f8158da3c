//! Default value functions referenced by serde `default` attributes.

use super::logging::LogFormat;

pub(super) fn default_port() -> u16 {
    4444
}

pub(super) fn default_max_message_size() -> usize {
    1024 * 1024 // 1 MiB
}

pub(super) fn default_max_handshake_bytes() -> usize {
    8 * 1024
}

pub(super) fn default_outbound_queue_capacity() -> usize {
    64
}

pub(super) fn default_log_dir() -> String {
    "logs".to_string()
}

pub(super) fn default_log_filename() -> String {
    "relay.log".to_string()
}

pub(super) fn default_rotation() -> String {
    "daily".to_string()
}

pub(super) fn default_enable_file_logging() -> bool {
    false
}

pub(super) fn default_log_format() -> LogFormat {
    LogFormat::Text
}
