//! Card HTTP Handlers
//!
//! Card CRUD, moves between lists of the same board, and card assignment.
//! Cards are addressed directly by id; the owning board is found through
//! the card's list.

/// Card CRUD and moves
pub mod handlers;

/// Card assignment by email
pub mod members;

pub use handlers::{create_card, delete_card, get_card, list_cards, update_card};
pub use members::{add_card_member, list_card_members, remove_card_member};
