//! Kanban - Main Library
//!
//! A multi-user Kanban board service: boards hold lists, lists hold cards,
//! boards are shared with members, and cards can be assigned to members.
//! Every committed change is pushed to the board's live WebSocket clients.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, events, configuration and shared errors
//! - **`backend`** - Axum server, persistence, authorization and real-time
//!   fan-out (only compiled with the `ssr` feature)
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use kanban::backend::server::create_app;
//! use kanban::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! let app = create_app(config).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The connection registry and the per-board dispatch lanes live in
//! `DashMap`s sharded by board id, so traffic on one board never blocks
//! another. Everything else shared between requests is immutable or behind
//! the store.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
