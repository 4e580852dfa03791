//! Board CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{Board, BoardChanges, BoardEvent, NewBoard};

/// Create a board owned by the caller (POST /api/boards)
pub async fn create_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewBoard>,
) -> Result<(StatusCode, Json<Board>), BackendError> {
    request.validate()?;

    let board = state.store.create_board(user.user_id, &request).await?;
    tracing::info!(board_id = %board.id, owner_id = %user.user_id, "Board created");

    let _lane = state.dispatcher.lane(board.id).await;
    state
        .dispatcher
        .broadcast(board.id, &BoardEvent::board_created(&board, user.user_id));

    Ok((StatusCode::CREATED, Json(board)))
}

/// Boards the caller is a member of (GET /api/boards)
pub async fn list_boards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Board>>, BackendError> {
    let boards = state.store.boards_for_user(user.user_id).await?;
    Ok(Json(boards))
}

/// GET /api/boards/{board_id}
pub async fn get_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Board>, BackendError> {
    let board = state.guard().require_member(board_id, user.user_id).await?;
    Ok(Json(board))
}

/// Partial update; any member may edit (PUT /api/boards/{board_id})
pub async fn update_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    Json(changes): Json<BoardChanges>,
) -> Result<Json<Board>, BackendError> {
    let _lane = state.dispatcher.lane(board_id).await;
    state.guard().require_member(board_id, user.user_id).await?;
    changes.validate()?;

    let board = state.store.update_board(board_id, &changes).await?;
    tracing::info!(%board_id, actor_id = %user.user_id, "Board updated");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::board_updated(&board, user.user_id));
    Ok(Json(board))
}

/// Owner-only; removes lists, cards, memberships and assignments
/// (DELETE /api/boards/{board_id})
pub async fn delete_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let _lane = state.dispatcher.lane(board_id).await;
    let board = state.guard().require_owner(board_id, user.user_id).await?;

    state.store.delete_board(board_id).await?;
    tracing::info!(%board_id, actor_id = %user.user_id, "Board deleted");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::board_deleted(&board, user.user_id));
    Ok(StatusCode::NO_CONTENT)
}
