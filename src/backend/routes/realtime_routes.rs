/**
 * Real-time Routes
 *
 * - `GET /api/ws/boards/{board_id}?token=<jwt>` - Board WebSocket
 *
 * Browsers cannot set headers on a WebSocket handshake, so this route sits
 * outside the auth middleware and authorizes from the query string.
 */

use axum::{routing::get, Router};

use crate::backend::realtime::board_socket;
use crate::backend::server::state::AppState;

pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/ws/boards/{board_id}", get(board_socket))
}
