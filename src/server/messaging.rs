//! Frame delivery to registry-held connections.
//!
//! Recipients are snapshotted under the registry lock, then frames are
//! pushed without holding it. Each connection has a bounded outbound queue;
//! a peer whose queue is closed or full is skipped so one stalled client
//! cannot stall the rest of the room.

use crate::protocol::frame;
use tokio::sync::mpsc::error::TrySendError;

use super::{ConnectionId, FrameSender, RelayServer};

impl RelayServer {
    /// Relay `text` to every member of the sender's current room except the
    /// sender itself. No room means nothing to do.
    pub async fn broadcast_from(&self, sender_id: &ConnectionId, text: &str) {
        let recipients: Vec<(ConnectionId, FrameSender)> = {
            let registry = self.registry.lock().await;
            let Some(room) = registry
                .clients
                .get(sender_id)
                .and_then(|entry| entry.room.as_deref())
            else {
                tracing::debug!(connection_id = %sender_id, "Broadcast from roomless connection dropped");
                return;
            };

            let Some(members) = registry.rooms.get(room) else {
                tracing::warn!(connection_id = %sender_id, room, "Broadcast targeted an unknown room");
                return;
            };

            members
                .iter()
                .filter(|id| *id != sender_id)
                .filter_map(|id| {
                    registry
                        .clients
                        .get(id)
                        .map(|entry| (*id, entry.sender.clone()))
                })
                .collect()
        };

        if recipients.is_empty() {
            return;
        }

        let wire = frame::encode_text(text);
        for (id, sender) in recipients {
            match sender.try_send(wire.clone()) {
                Ok(()) => {}
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %id, "Skipped broadcast to closed connection");
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(connection_id = %id, "Outbound queue full, dropping broadcast frame");
                }
            }
        }
    }

    /// Encode and queue `text` for exactly one connection.
    pub async fn send_direct(&self, id: &ConnectionId, text: &str) {
        let sender = {
            let registry = self.registry.lock().await;
            registry.clients.get(id).map(|entry| entry.sender.clone())
        };

        let Some(sender) = sender else {
            tracing::debug!(connection_id = %id, "Direct send to unknown connection dropped");
            return;
        };

        if sender.try_send(frame::encode_text(text)).is_err() {
            tracing::debug!(connection_id = %id, "Failed to queue direct frame");
        }
    }
}
