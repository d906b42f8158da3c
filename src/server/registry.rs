//! Connection and room registry operations.
//!
//! Each operation takes the registry lock once and leaves both maps
//! consistent before releasing it.

use uuid::Uuid;

use super::{ClientEntry, ConnectionId, FrameSender, Registry, RelayServer};

impl RelayServer {
    /// Register a freshly upgraded connection. The returned id is the
    /// connection's identity for its whole lifetime.
    pub async fn register(&self, sender: FrameSender) -> ConnectionId {
        let id = Uuid::new_v4();
        let mut registry = self.registry.lock().await;
        registry.clients.insert(id, ClientEntry { sender, room: None });
        tracing::debug!(connection_id = %id, "Connection registered");
        id
    }

    /// Remove a connection on transport close or error. Room membership is
    /// cleared first so the room never lists a dead connection.
    pub async fn unregister(&self, id: &ConnectionId) {
        let mut registry = self.registry.lock().await;
        registry.leave_room(id);
        if registry.clients.remove(id).is_some() {
            tracing::debug!(connection_id = %id, "Connection unregistered");
        }
    }

    /// Move a connection into `room`, leaving its current room first.
    /// The room is created lazily on first join.
    pub async fn join_room(&self, id: &ConnectionId, room: &str) {
        let mut registry = self.registry.lock().await;
        if !registry.clients.contains_key(id) {
            tracing::warn!(connection_id = %id, room, "Join for unknown connection ignored");
            return;
        }

        registry.leave_room(id);
        registry.rooms.entry(room.to_string()).or_default().insert(*id);
        if let Some(entry) = registry.clients.get_mut(id) {
            entry.room = Some(room.to_string());
        }
        tracing::info!(connection_id = %id, room, "Connection joined room");
    }

    /// Remove a connection from its current room, if any. Deletes the room
    /// when its member set becomes empty.
    pub async fn leave_room(&self, id: &ConnectionId) {
        let mut registry = self.registry.lock().await;
        if let Some(room) = registry.leave_room(id) {
            tracing::info!(connection_id = %id, room, "Connection left room");
        }
    }

    /// The room a connection currently occupies.
    pub async fn room_of(&self, id: &ConnectionId) -> Option<String> {
        let registry = self.registry.lock().await;
        registry.clients.get(id).and_then(|entry| entry.room.clone())
    }

    /// Member ids of a room. Empty if the room does not exist.
    pub async fn members_of(&self, room: &str) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        registry
            .rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the room is present in internal storage at all.
    pub async fn room_exists(&self, room: &str) -> bool {
        self.registry.lock().await.rooms.contains_key(room)
    }
}

impl Registry {
    /// Remove `id` from its room and clear its room field, returning the
    /// room name that was left. Deletes the room if it is now empty.
    /// No-op for roomless or unknown connections.
    pub(super) fn leave_room(&mut self, id: &ConnectionId) -> Option<String> {
        let room = self.clients.get_mut(id)?.room.take()?;

        if let Some(members) = self.rooms.get_mut(&room) {
            members.remove(id);
            if members.is_empty() {
                self.rooms.remove(&room);
                tracing::debug!(room, "Room emptied and removed");
            }
        } else {
            tracing::warn!(connection_id = %id, room, "Leave referenced a room that no longer exists");
        }

        Some(room)
    }
}
