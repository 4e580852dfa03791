//! Authorization Guard
//!
//! Every board-scoped operation, REST or WebSocket, funnels through this
//! module to decide whether the caller may act. Decisions are made against
//! the store so a membership removed a moment ago is already gone.
//!
//! # Rules
//!
//! | Operation                                 | Requirement           |
//! |-------------------------------------------|-----------------------|
//! | read board, lists, cards, members         | board member          |
//! | create/update lists and cards             | board member          |
//! | update board                              | board member          |
//! | delete board, add or remove board members | board owner           |
//! | assign a user to a card                   | both users are members|
//! | open the board WebSocket                  | board member          |
//!
//! The owner can never be removed from their own board.

/// Membership and ownership checks
pub mod guard;

/// Email to user resolution shared by the invite and assignment paths
pub mod identity;

use thiserror::Error;

use crate::backend::store::StoreError;

pub use guard::{check_membership, check_owner, check_removable, AccessGuard};
pub use identity::resolve_identity;

/// Why a guard refused an operation
#[derive(Debug, Error)]
pub enum AccessError {
    /// The addressed board, list, card or user does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    /// The request names a valid resource but an impossible relation
    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
