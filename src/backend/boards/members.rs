//! Board membership handlers.
//!
//! Members are added and removed by email. Only the owner administers
//! membership; any member may list it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::access::{check_removable, resolve_identity};
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{BoardEvent, MemberByEmail, MemberProfile, MemberRole};

/// GET /api/boards/{board_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<MemberProfile>>, BackendError> {
    state.guard().require_member(board_id, user.user_id).await?;
    let members = state.store.board_members(board_id).await?;
    Ok(Json(members))
}

/// POST /api/boards/{board_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    Json(request): Json<MemberByEmail>,
) -> Result<(StatusCode, Json<MemberProfile>), BackendError> {
    let _lane = state.dispatcher.lane(board_id).await;
    state.guard().require_owner(board_id, user.user_id).await?;

    let target = resolve_identity(state.store.as_ref(), &request.email).await?;
    let membership = state
        .store
        .add_membership(board_id, target.id, MemberRole::Member)
        .await
        .map_err(|e| {
            tracing::warn!(%board_id, user_id = %target.id, "Member add rejected: {}", e);
            e
        })?;

    let member = MemberProfile {
        user_id: target.id,
        email: target.email,
        username: target.username,
        role: membership.role,
    };
    tracing::info!(%board_id, user_id = %member.user_id, "Board member added");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::board_member_added(board_id, &member, user.user_id));
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/boards/{board_id}/members
///
/// The owner can never be removed; card assignments of the removed member
/// are left in place.
pub async fn remove_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    Json(request): Json<MemberByEmail>,
) -> Result<StatusCode, BackendError> {
    let _lane = state.dispatcher.lane(board_id).await;
    state.guard().require_owner(board_id, user.user_id).await?;

    let target = resolve_identity(state.store.as_ref(), &request.email).await?;
    let membership = state.store.membership(board_id, target.id).await?;
    check_removable(membership.as_ref())?;

    if !state.store.remove_membership(board_id, target.id).await? {
        return Err(BackendError::not_found("member"));
    }
    tracing::info!(%board_id, user_id = %target.id, "Board member removed");

    state.dispatcher.broadcast(
        board_id,
        &BoardEvent::board_member_removed(board_id, &target.profile(), user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
