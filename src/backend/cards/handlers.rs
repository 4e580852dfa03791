use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::access::AccessError;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{BoardEvent, Card, CardChanges, NewCard};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub list_id: Uuid,
}

/// Append a card to a list (POST /api/cards?list_id=)
pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
    Json(request): Json<NewCard>,
) -> Result<(StatusCode, Json<Card>), BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_list(query.list_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    guard.require_list_member(query.list_id, user.user_id).await?;
    request.validate()?;

    let card = state
        .store
        .create_card(query.list_id, user.user_id, &request)
        .await?;
    tracing::info!(%board_id, card_id = %card.id, list_id = %card.list_id, "Card created");

    state
        .dispatcher
        .broadcast(board_id, &BoardEvent::card_created(board_id, &card, user.user_id));
    Ok((StatusCode::CREATED, Json(card)))
}

/// Cards of a list in display order (GET /api/cards?list_id=)
pub async fn list_cards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Card>>, BackendError> {
    state.guard().require_list_member(query.list_id, user.user_id).await?;
    let cards = state.store.cards_for_list(query.list_id).await?;
    Ok(Json(cards))
}

/// GET /api/cards/{card_id}
pub async fn get_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Card>, BackendError> {
    let (card, _, _) = state.guard().require_card_member(card_id, user.user_id).await?;
    Ok(Json(card))
}

/// Update or move a card (PUT /api/cards/{card_id})
///
/// A `list_id` naming another list moves the card there; the target must
/// be on the same board.
pub async fn update_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
    Json(changes): Json<CardChanges>,
) -> Result<Json<Card>, BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_card(card_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    let (current, _, board) = guard.require_card_member(card_id, user.user_id).await?;
    changes.validate()?;

    if let Some(target_id) = changes.list_id.filter(|id| *id != current.list_id) {
        let target = state
            .store
            .list(target_id)
            .await?
            .ok_or(AccessError::NotFound("list"))?;
        if target.board_id != board.id {
            return Err(AccessError::Invalid {
                field: "list_id",
                message: "target list belongs to another board",
            }
            .into());
        }
    }

    let card = state.store.update_card(card_id, &changes).await?;
    tracing::info!(
        %board_id,
        %card_id,
        from_list_id = %current.list_id,
        list_id = %card.list_id,
        "Card updated"
    );

    state.dispatcher.broadcast(
        board_id,
        &BoardEvent::card_updated(board_id, &card, current.list_id, user.user_id),
    );
    Ok(Json(card))
}

/// DELETE /api/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let guard = state.guard();
    let board_id = guard.board_of_card(card_id).await?;
    let _lane = state.dispatcher.lane(board_id).await;
    let (card, _, _) = guard.require_card_member(card_id, user.user_id).await?;

    state.store.delete_card(card_id).await?;
    tracing::info!(%board_id, %card_id, "Card deleted");

    state.dispatcher.broadcast(
        board_id,
        &BoardEvent::card_deleted(board_id, card.id, card.list_id, user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
