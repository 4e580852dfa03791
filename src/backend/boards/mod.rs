//! Board HTTP Handlers
//!
//! Board CRUD and board membership administration.
//!
//! Every mutation follows the same sequence: take the board's dispatch
//! lane, run the guard, write to the store, broadcast. The lane is released
//! when the handler returns, after the event has been enqueued.

/// Board CRUD
pub mod handlers;

/// Board membership by email
pub mod members;

pub use handlers::{create_board, delete_board, get_board, list_boards, update_board};
pub use members::{add_member, list_members, remove_member};
