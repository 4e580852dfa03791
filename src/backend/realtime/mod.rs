//! Real-time Module
//!
//! Per-board WebSocket push. Clients open one socket per board they are
//! viewing and receive a JSON envelope for every committed mutation on that
//! board:
//!
//! ```json
//! {"type": "card.updated", "payload": {"board_id": "...", "actor_id": "...", ...}}
//! ```
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── registry.rs  - ConnectionRegistry (board -> live connections)
//! ├── broadcast.rs - Dispatcher, BoardLane, DeliveryReport
//! └── session.rs   - WebSocket handshake and per-connection tasks
//! ```
//!
//! # Backpressure
//!
//! Each connection has a bounded outgoing queue (`WS_OUTGOING_BUFFER`
//! frames). The dispatcher never blocks on it; a full queue gets the
//! connection dropped and the client is expected to reconnect and refetch.

/// Board to connection bookkeeping
pub mod registry;

/// Event fan-out and per-board ordering
pub mod broadcast;

/// WebSocket endpoint
pub mod session;

pub use broadcast::{BoardLane, DeliveryReport, Dispatcher};
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry, DeliveryError};
pub use session::board_socket;
