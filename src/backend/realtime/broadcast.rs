/**
 * Broadcast Dispatcher
 *
 * Fans a committed board mutation out to every connection registered on
 * that board.
 *
 * # Delivery
 *
 * The event is serialized once and the same frame is enqueued on each
 * connection's bounded queue with `try_send`. Delivery never waits on a
 * slow peer: a connection whose queue is full or closed is pruned from the
 * registry (dropping its sender, which ends its writer task) and delivery
 * carries on with the rest.
 *
 * # Ordering
 *
 * Handlers take the board's [`BoardLane`] before the mutation and hold it
 * until after the broadcast, so two mutations on the same board are both
 * committed and delivered in one order. Mutations on different boards never
 * contend.
 */

use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::backend::realtime::registry::ConnectionRegistry;
use crate::shared::BoardEvent;

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub pruned: usize,
}

/// Serializes mutation-and-broadcast per board
#[derive(Debug)]
pub struct BoardLane {
    board_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
    lanes: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BoardLane {
    pub fn board_id(&self) -> Uuid {
        self.board_id
    }
}

impl Drop for BoardLane {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still holds the lock: nobody is waiting, forget the lane.
        self.lanes
            .remove_if(&self.board_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: ConnectionRegistry,
    lanes: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            registry,
            lanes: Arc::new(DashMap::new()),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Wait for exclusive use of a board's lane
    pub async fn lane(&self, board_id: Uuid) -> BoardLane {
        let lock = self.lanes.entry(board_id).or_default().clone();
        let guard = lock.lock_owned().await;
        BoardLane {
            board_id,
            guard: Some(guard),
            lanes: self.lanes.clone(),
        }
    }

    /// Number of boards with a lane held or awaited
    pub fn active_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Deliver an event to every connection on the board
    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub fn broadcast(&self, board_id: Uuid, event: &BoardEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let connections = self.registry.snapshot(board_id);
        if connections.is_empty() {
            tracing::debug!("[Realtime] No connections on board");
            return report;
        }

        let frame = match event.to_json() {
            Ok(json) => Utf8Bytes::from(json),
            Err(e) => {
                tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                return report;
            }
        };

        for connection in connections {
            match connection.try_deliver(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(reason) => {
                    tracing::warn!(
                        connection_id = %connection.id,
                        user_id = %connection.user_id,
                        %reason,
                        "[Realtime] Pruning connection"
                    );
                    self.registry.disconnect(board_id, connection.id);
                    report.pruned += 1;
                }
            }
        }

        tracing::info!(
            delivered = report.delivered,
            pruned = report.pruned,
            "[Realtime] Event broadcast"
        );
        report
    }
}
