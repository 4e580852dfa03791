use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{BoardEvent, BoardList, ListChanges, NewList};

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub board_id: Uuid,
}

/// POST /api/lists?board_id=
pub async fn create_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<BoardQuery>,
    Json(request): Json<NewList>,
) -> Result<(StatusCode, Json<BoardList>), BackendError> {
    let board_id = query.board_id;
    let _lane = state.dispatcher.lane(board_id).await;
    state.guard().require_member(board_id, user.user_id).await?;
    request.validate()?;

    let list = state.store.create_list(board_id, &request).await?;
    tracing::info!(%board_id, list_id = %list.id, position = list.position, "List created");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::list_created(&list, user.user_id));
    Ok((StatusCode::CREATED, Json(list)))
}

/// Lists of a board in display order (GET /api/lists/board/{board_id})
pub async fn lists_for_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<BoardList>>, BackendError> {
    state.guard().require_member(board_id, user.user_id).await?;
    let lists = state.store.lists_for_board(board_id).await?;
    Ok(Json(lists))
}

/// PUT /api/lists/{list_id}
pub async fn update_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(list_id): Path<Uuid>,
    Json(changes): Json<ListChanges>,
) -> Result<Json<BoardList>, BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_list(list_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    guard.require_list_member(list_id, user.user_id).await?;
    changes.validate()?;

    let list = state.store.update_list(list_id, &changes).await?;
    tracing::info!(%board_id, %list_id, "List updated");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::list_updated(&list, user.user_id));
    Ok(Json(list))
}

/// Deletes the list with its cards (DELETE /api/lists/{list_id})
pub async fn delete_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(list_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_list(list_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    guard.require_list_member(list_id, user.user_id).await?;

    state.store.delete_list(list_id).await?;
    tracing::info!(%board_id, %list_id, "List deleted");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::list_deleted(board_id, list_id, user.user_id));
    Ok(StatusCode::NO_CONTENT)
}
