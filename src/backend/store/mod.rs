//! Persistence Module
//!
//! Durable state for users, boards, lists, cards, memberships and card
//! assignments behind a single trait, so handlers never see which backend is
//! in use.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - BoardStore trait and StoreError
//! ├── postgres.rs - PgStore (sqlx, runs migrations at startup)
//! └── memory.rs   - MemoryStore (tests and database-less development)
//! ```
//!
//! # Guarantees every implementation provides
//!
//! - Board creation inserts the owner membership in the same transaction.
//! - Board deletion removes assignments, cards, lists, memberships and the
//!   board all-or-nothing.
//! - List and card creation assign `max(position) + 1` (0 when empty) inside
//!   the write, and fail with [`StoreError::Invalid`] rather than pass
//!   `MAX_POSITION`.
//! - Reads return lists and cards sorted by `(position, created_at, id)`.
//! - Duplicate memberships, assignments, emails and usernames surface as
//!   [`StoreError::Conflict`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::shared::{
    Board, BoardChanges, BoardList, Card, CardChanges, ListChanges, MemberProfile, MemberRole,
    Membership, NewBoard, NewCard, NewList, SharedError, UserProfile,
};

/// Postgres-backed store
pub mod postgres;

/// In-memory store
pub mod memory;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// A write the data itself rules out, such as appending past the last position
    #[error(transparent)]
    Invalid(#[from] SharedError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// Storage operations used by the HTTP and WebSocket layers
#[async_trait]
pub trait BoardStore: Send + Sync {
    // Users

    /// Insert a user; duplicate email or username is a conflict
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Lookup by normalized email
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    // Boards

    /// Create a board and its owner membership atomically
    async fn create_board(&self, owner_id: Uuid, new_board: &NewBoard) -> Result<Board, StoreError>;
    /// Boards the user holds any membership on, oldest first
    async fn boards_for_user(&self, user_id: Uuid) -> Result<Vec<Board>, StoreError>;
    async fn board(&self, id: Uuid) -> Result<Option<Board>, StoreError>;
    async fn update_board(&self, id: Uuid, changes: &BoardChanges) -> Result<Board, StoreError>;
    /// Delete a board and everything under it atomically
    async fn delete_board(&self, id: Uuid) -> Result<(), StoreError>;

    // Memberships

    async fn membership(&self, board_id: Uuid, user_id: Uuid) -> Result<Option<Membership>, StoreError>;
    async fn add_membership(
        &self,
        board_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Membership, StoreError>;
    /// Returns whether a membership row was removed
    async fn remove_membership(&self, board_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    /// Owner first, then members in join order
    async fn board_members(&self, board_id: Uuid) -> Result<Vec<MemberProfile>, StoreError>;

    // Lists

    async fn create_list(&self, board_id: Uuid, new_list: &NewList) -> Result<BoardList, StoreError>;
    async fn lists_for_board(&self, board_id: Uuid) -> Result<Vec<BoardList>, StoreError>;
    async fn list(&self, id: Uuid) -> Result<Option<BoardList>, StoreError>;
    async fn update_list(&self, id: Uuid, changes: &ListChanges) -> Result<BoardList, StoreError>;
    /// Delete a list with its cards and their assignments
    async fn delete_list(&self, id: Uuid) -> Result<(), StoreError>;

    // Cards

    async fn create_card(
        &self,
        list_id: Uuid,
        creator_id: Uuid,
        new_card: &NewCard,
    ) -> Result<Card, StoreError>;
    async fn cards_for_list(&self, list_id: Uuid) -> Result<Vec<Card>, StoreError>;
    async fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError>;
    /// Apply changes; a new `list_id` moves the card, appending it to the
    /// target list unless a position is given
    async fn update_card(&self, id: Uuid, changes: &CardChanges) -> Result<Card, StoreError>;
    async fn delete_card(&self, id: Uuid) -> Result<(), StoreError>;

    // Card assignments

    async fn add_card_member(&self, card_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
    /// Returns whether an assignment was removed
    async fn remove_card_member(&self, card_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    /// Assignees in assignment order
    async fn card_members(&self, card_id: Uuid) -> Result<Vec<UserProfile>, StoreError>;
}
