//! Dispatch of decoded text payloads.
//!
//! The router itself is stateless; all state lives in the registries. Each
//! payload is parsed as JSON, classified by its `type` field, and either
//! mutates room membership, answers a ping, or is relayed verbatim.

use crate::protocol::messages::{self, ControlMessage, InboundMessage, RelayReply};

use super::{ConnectionId, RelayServer};

impl RelayServer {
    /// Handle one inbound text payload from `id`.
    pub async fn handle_client_message(&self, id: &ConnectionId, text: &str) {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(connection_id = %id, error = %err, "Dropping malformed JSON message");
                return;
            }
        };

        match messages::classify(&value) {
            InboundMessage::Control(control) => self.handle_control(id, control).await,
            InboundMessage::InvalidControl { error } => {
                tracing::warn!(connection_id = %id, %error, "Dropping control message with invalid fields");
            }
            InboundMessage::Relay => self.broadcast_from(id, text).await,
        }
    }

    async fn handle_control(&self, id: &ConnectionId, control: ControlMessage) {
        match control {
            ControlMessage::Join { room } | ControlMessage::Room { room } => {
                self.join_room(id, &room).await;
            }
            ControlMessage::Subscribe { topics } => {
                // Only the first topic is honored; the known client never
                // subscribes to more than one room at a time.
                match topics.first() {
                    Some(topic) => self.join_room(id, topic).await,
                    None => {
                        tracing::warn!(connection_id = %id, "Subscribe with empty topics ignored");
                    }
                }
            }
            ControlMessage::Leave => self.leave_room(id).await,
            ControlMessage::Ping => {
                let reply = match serde_json::to_string(&RelayReply::Pong) {
                    Ok(reply) => reply,
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to serialize pong reply");
                        return;
                    }
                };
                self.send_direct(id, &reply).await;
            }
        }
    }
}
