//! Relay behavior configuration types.

use super::defaults::{
    default_max_handshake_bytes, default_max_message_size, default_outbound_queue_capacity,
};
use serde::{Deserialize, Serialize};

/// Limits applied to each connection.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Largest accepted inbound frame payload (bytes). A connection whose
    /// buffered frame grows past this is closed.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Largest accepted HTTP request head during the upgrade handshake.
    #[serde(default = "default_max_handshake_bytes")]
    pub max_handshake_bytes: usize,
    /// Capacity of each connection's outbound frame queue. Broadcast frames
    /// to a full queue are dropped so one stalled peer cannot stall a room.
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            max_handshake_bytes: default_max_handshake_bytes(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
        }
    }
}
