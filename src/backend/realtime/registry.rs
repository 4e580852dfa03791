/**
 * Connection Registry
 *
 * Tracks which live WebSocket connections are attached to which board. Each
 * connection owns the receiving half of a bounded queue; the registry keeps
 * the sending half so the dispatcher can enqueue frames without touching the
 * socket.
 *
 * # Invariants
 *
 * - A connection appears under at most one board.
 * - A board entry exists only while it has at least one connection; the
 *   last disconnect removes it.
 * - `disconnect` is idempotent, so the session task and the dispatcher can
 *   both call it for the same connection.
 */

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

pub type ConnectionId = Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The outgoing queue is at capacity; the peer is not keeping up
    #[error("outgoing queue full")]
    Full,
    /// The session task has gone away
    #[error("connection closed")]
    Closed,
}

/// Sending side of one live connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub user_id: Uuid,
    sender: mpsc::Sender<Utf8Bytes>,
}

impl ConnectionHandle {
    pub fn new(user_id: Uuid, sender: mpsc::Sender<Utf8Bytes>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            sender,
        }
    }

    /// Enqueue a frame without waiting
    pub fn try_deliver(&self, frame: Utf8Bytes) -> Result<(), DeliveryError> {
        self.sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// Board id to live connections
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    boards: Arc<DashMap<Uuid, HashMap<ConnectionId, ConnectionHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection to a board. Returns false if the id was already
    /// registered there.
    pub fn connect(&self, board_id: Uuid, handle: ConnectionHandle) -> bool {
        let connection_id = handle.id;
        let user_id = handle.user_id;
        let fresh = self
            .boards
            .entry(board_id)
            .or_default()
            .insert(connection_id, handle)
            .is_none();
        tracing::debug!(%board_id, %connection_id, %user_id, "[Realtime] Connection registered");
        fresh
    }

    /// Detach a connection. Returns whether it was still registered.
    pub fn disconnect(&self, board_id: Uuid, connection_id: ConnectionId) -> bool {
        let removed = match self.boards.get_mut(&board_id) {
            Some(mut connections) => connections.remove(&connection_id).is_some(),
            None => false,
        };
        // The shard guard above must be released before remove_if locks it again.
        self.boards.remove_if(&board_id, |_, connections| connections.is_empty());
        if removed {
            tracing::debug!(%board_id, %connection_id, "[Realtime] Connection removed");
        }
        removed
    }

    /// Copy of the board's connections at this instant
    pub fn snapshot(&self, board_id: Uuid) -> Vec<ConnectionHandle> {
        self.boards
            .get(&board_id)
            .map(|connections| connections.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_connected(&self, board_id: Uuid, connection_id: ConnectionId) -> bool {
        self.boards
            .get(&board_id)
            .is_some_and(|connections| connections.contains_key(&connection_id))
    }

    pub fn connection_count(&self, board_id: Uuid) -> usize {
        self.boards.get(&board_id).map_or(0, |connections| connections.len())
    }

    /// Number of boards with at least one live connection
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }
}
