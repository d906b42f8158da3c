//! Room coordinator: owns the connection and room registries and hosts the
//! routing and broadcast logic.
//!
//! The two registries are the only shared mutable state in the process. They
//! live behind a single mutex so every membership mutation updates both
//! sides in one atomic step, matching the single-writer guarantee the relay
//! relies on: a connection's `room` field and the room's member set never
//! disagree.

use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::config::ServerConfig;

mod message_router;
mod messaging;
mod registry;
#[cfg(test)]
mod registry_tests;

/// Opaque identity of one upgraded connection, unique among live connections.
pub type ConnectionId = Uuid;

/// Outbound queue handle for one connection. Frames pushed here are already
/// encoded wire bytes; the connection's writer task drains them in order.
pub type FrameSender = mpsc::Sender<Bytes>;

/// Registry state guarded by a single lock.
#[derive(Default)]
struct Registry {
    /// Live connections and their room assignment.
    clients: HashMap<ConnectionId, ClientEntry>,
    /// Room name -> member set. A room exists only while it has members.
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

struct ClientEntry {
    sender: FrameSender,
    /// Current room, if any. A connection is in at most one room.
    room: Option<String>,
}

/// The relay coordinator, shared across all connection tasks.
pub struct RelayServer {
    config: ServerConfig,
    registry: Mutex<Registry>,
}

impl RelayServer {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Mutex::new(Registry::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Number of live connections, used for shutdown reporting.
    pub async fn connection_count(&self) -> usize {
        self.registry.lock().await.clients.len()
    }

    /// Number of rooms that currently have members.
    pub async fn room_count(&self) -> usize {
        self.registry.lock().await.rooms.len()
    }
}
