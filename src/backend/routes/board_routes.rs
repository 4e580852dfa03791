/**
 * Board Content Routes
 *
 * All of these require authentication and are mounted behind the auth
 * middleware by the router.
 *
 * ## Boards
 * - `POST /api/boards`, `GET /api/boards`
 * - `GET | PUT | DELETE /api/boards/{board_id}`
 * - `GET | POST | DELETE /api/boards/{board_id}/members`
 *
 * ## Lists
 * - `POST /api/lists?board_id=`
 * - `GET /api/lists/board/{board_id}`
 * - `PUT | DELETE /api/lists/{list_id}`
 *
 * ## Cards
 * - `POST | GET /api/cards?list_id=`
 * - `GET | PUT | DELETE /api/cards/{card_id}`
 * - `GET | POST | DELETE /api/cards/{card_id}/members`
 */

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::backend::boards::{
    add_member, create_board, delete_board, get_board, list_boards, list_members, remove_member,
    update_board,
};
use crate::backend::cards::{
    add_card_member, create_card, delete_card, get_card, list_card_members, list_cards,
    remove_card_member, update_card,
};
use crate::backend::lists::{create_list, delete_list, lists_for_board, update_list};
use crate::backend::server::state::AppState;

pub fn configure_board_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Boards
        .route("/api/boards", post(create_board).get(list_boards))
        .route(
            "/api/boards/{board_id}",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route(
            "/api/boards/{board_id}/members",
            get(list_members).post(add_member).delete(remove_member),
        )
        // Lists
        .route("/api/lists", post(create_list))
        .route("/api/lists/board/{board_id}", get(lists_for_board))
        .route("/api/lists/{list_id}", put(update_list).delete(delete_list))
        // Cards
        .route("/api/cards", post(create_card).get(list_cards))
        .route(
            "/api/cards/{card_id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route(
            "/api/cards/{card_id}/members",
            get(list_card_members)
                .post(add_card_member)
                .delete(remove_card_member),
        )
}
