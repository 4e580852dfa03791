//! Route Configuration Module
//!
//! HTTP and WebSocket routes, grouped by concern.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Router assembly, layers, fallback
//! ├── api_routes.rs      - Registration, login, current user
//! ├── board_routes.rs    - Boards, members, lists, cards
//! └── realtime_routes.rs - Board WebSocket
//! ```

/// Main router creation
pub mod router;

/// Account endpoints
pub mod api_routes;

/// Board content endpoints
pub mod board_routes;

/// WebSocket endpoint
pub mod realtime_routes;

pub use router::create_router;
