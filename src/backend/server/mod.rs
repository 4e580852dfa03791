//! Server Module
//!
//! Startup wiring for the Axum server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Store selection from AppConfig
//! └── init.rs   - create_app
//! ```
//!
//! # Initialization Flow
//!
//! 1. `AppConfig::from_env` (in `main`)
//! 2. `load_store` picks Postgres or the in-memory store
//! 3. `AppState::new` builds the token service and dispatcher
//! 4. `create_router` mounts REST, WebSocket and middleware

/// Application state management
pub mod state;

/// Store selection
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
