//! Shared Module
//!
//! Types that cross the process boundary: the board domain model returned by
//! the REST API, the real-time event envelope pushed over WebSockets, shared
//! validation errors and application configuration.
//!
//! Nothing in here depends on axum, so the wire types can be reused by a
//! client crate without pulling in the server stack.

/// Boards, lists, cards, memberships and their request bodies
pub mod board;

/// Real-time event envelope and vocabulary
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use board::{
    BackgroundKind, Board, BoardChanges, BoardList, Card, CardChanges, ListChanges, MemberByEmail,
    MemberProfile, MemberRole, Membership, NewBoard, NewCard, NewList, UserProfile, MAX_POSITION,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{BoardEvent, EventType};
