//! Backend Module
//!
//! All server-side code: the Axum application, persistence, authentication,
//! authorization and real-time delivery. Only compiled with the `ssr`
//! feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs       - Module exports and documentation
//! ├── server/      - AppState, store selection, create_app
//! ├── routes/      - Router assembly
//! ├── middleware/  - Bearer-token authentication
//! ├── auth/        - Users, password hashing, tokens, auth handlers
//! ├── access/      - Authorization guard
//! ├── boards/      - Board and board member handlers
//! ├── lists/       - List handlers
//! ├── cards/       - Card and card member handlers
//! ├── realtime/    - Connection registry, dispatcher, WebSocket session
//! ├── store/       - BoardStore trait, Postgres and in-memory stores
//! └── error/       - BackendError and its HTTP rendering
//! ```
//!
//! # Request Flow
//!
//! ```text
//! REST mutation -> auth middleware -> dispatch lane -> AccessGuard
//!               -> BoardStore (commit) -> Dispatcher -> registry snapshot
//!               -> per-connection queue -> WebSocket writer task
//! ```
//!
//! A failed guard or store call returns before anything is broadcast.

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Request middleware
pub mod middleware;

/// Authentication
pub mod auth;

/// Authorization guard
pub mod access;

/// Board handlers
pub mod boards;

/// List handlers
pub mod lists;

/// Card handlers
pub mod cards;

/// Real-time delivery
pub mod realtime;

/// Persistence
pub mod store;

/// Error types
pub mod error;
