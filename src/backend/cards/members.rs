//! Card assignment handlers.
//!
//! Any board member may assign or unassign, but only other board members
//! can be assigned.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::access::resolve_identity;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{BoardEvent, MemberByEmail, UserProfile};

/// GET /api/cards/{card_id}/members
pub async fn list_card_members(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    state.guard().require_card_member(card_id, user.user_id).await?;
    let members = state.store.card_members(card_id).await?;
    Ok(Json(members))
}

/// POST /api/cards/{card_id}/members
pub async fn add_card_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
    Json(request): Json<MemberByEmail>,
) -> Result<(StatusCode, Json<UserProfile>), BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_card(card_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    guard.require_card_member(card_id, user.user_id).await?;

    let target = resolve_identity(state.store.as_ref(), &request.email).await?;
    guard.ensure_assignable(board_id, target.id).await?;
    state.store.add_card_member(card_id, target.id).await?;

    let member = target.profile();
    tracing::info!(%board_id, %card_id, user_id = %member.user_id, "Card member added");

    state.dispatcher.broadcast(
        board_id,
        &BoardEvent::card_member_added(board_id, card_id, &member, user.user_id),
    );
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/cards/{card_id}/members
pub async fn remove_card_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
    Json(request): Json<MemberByEmail>,
) -> Result<StatusCode, BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_card(card_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    guard.require_card_member(card_id, user.user_id).await?;

    let target = resolve_identity(state.store.as_ref(), &request.email).await?;
    if !state.store.remove_card_member(card_id, target.id).await? {
        return Err(BackendError::not_found("card member"));
    }
    tracing::info!(%board_id, %card_id, user_id = %target.id, "Card member removed");

    state.dispatcher.broadcast(
        board_id,
        &BoardEvent::card_member_removed(board_id, card_id, target.id, user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
