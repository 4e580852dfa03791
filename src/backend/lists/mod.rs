//! List HTTP Handlers
//!
//! Lists are ordered columns inside a board. Creation appends at the end;
//! an update may set an explicit position, which is stored as given
//! without shifting siblings.

pub mod handlers;

pub use handlers::{create_list, delete_list, lists_for_board, update_list};
