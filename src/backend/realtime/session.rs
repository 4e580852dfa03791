/**
 * Board WebSocket Session
 *
 * GET /api/ws/boards/{board_id}?token=<jwt>
 *
 * # Lifecycle
 *
 * 1. Upgrade, then authorize: the token must be valid, name an existing
 *    user, and that user must be a member of an existing board. Any
 *    failure sends a close frame with code 1008 and the connection is never
 *    registered.
 * 2. Enqueue the `ws.connected` acknowledgement, then register the
 *    connection, so the acknowledgement is always the first frame.
 * 3. A writer task drains the outgoing queue into the socket; a reader
 *    task discards inbound frames until the peer closes.
 * 4. When either task ends the other is aborted and the connection is
 *    removed from the registry.
 *
 * The socket is push-only: inbound frames are never interpreted.
 */

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::realtime::registry::ConnectionHandle;
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;
use crate::shared::BoardEvent;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// Why a handshake was refused, sent as the close reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    MissingToken,
    InvalidToken,
    UnknownUser,
    UnknownBoard,
    NotMember,
    Unavailable,
}

impl Refusal {
    pub fn reason(self) -> &'static str {
        match self {
            Refusal::MissingToken => "missing token",
            Refusal::InvalidToken => "invalid token",
            Refusal::UnknownUser => "unknown user",
            Refusal::UnknownBoard => "board not found",
            Refusal::NotMember => "not a board member",
            Refusal::Unavailable => "authorization unavailable",
        }
    }

    pub fn close_code(self) -> u16 {
        match self {
            Refusal::Unavailable => close_code::ERROR,
            _ => close_code::POLICY,
        }
    }
}

pub async fn board_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Query(params): Query<WsParams>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, board_id, params.token))
}

/// Resolve the handshake to a user id, or the reason to refuse it
pub async fn authorize(state: &AppState, board_id: Uuid, token: Option<&str>) -> Result<Uuid, Refusal> {
    let token = token.filter(|t| !t.is_empty()).ok_or(Refusal::MissingToken)?;
    let user_id = state
        .tokens
        .user_id_from_token(token)
        .map_err(|_| Refusal::InvalidToken)?;

    let unavailable = |e: StoreError| {
        tracing::error!("[Realtime] Store error during handshake: {:?}", e);
        Refusal::Unavailable
    };

    state
        .store
        .user_by_id(user_id)
        .await
        .map_err(unavailable)?
        .ok_or(Refusal::UnknownUser)?;
    state
        .store
        .board(board_id)
        .await
        .map_err(unavailable)?
        .ok_or(Refusal::UnknownBoard)?;
    state
        .store
        .membership(board_id, user_id)
        .await
        .map_err(unavailable)?
        .ok_or(Refusal::NotMember)?;

    Ok(user_id)
}

#[tracing::instrument(skip(socket, state, token))]
async fn handle_socket(mut socket: WebSocket, state: AppState, board_id: Uuid, token: Option<String>) {
    let user_id = match authorize(&state, board_id, token.as_deref()).await {
        Ok(user_id) => user_id,
        Err(refusal) => {
            tracing::warn!(reason = refusal.reason(), "[Realtime] Handshake refused");
            let frame = CloseFrame {
                code: refusal.close_code(),
                reason: Utf8Bytes::from_static(refusal.reason()),
            };
            let _ = socket.send(Message::Close(Some(frame))).await;
            return;
        }
    };

    let (tx, mut rx) = mpsc::channel::<Utf8Bytes>(state.config.ws_outgoing_buffer);
    let handle = ConnectionHandle::new(user_id, tx);
    let connection_id = handle.id;

    let ack = match BoardEvent::connected(board_id, user_id).to_json() {
        Ok(json) => Utf8Bytes::from(json),
        Err(e) => {
            tracing::error!("[Realtime] Failed to serialize acknowledgement: {:?}", e);
            return;
        }
    };
    if handle.try_deliver(ack).is_err() {
        return;
    }

    let registry = state.registry().clone();
    registry.connect(board_id, handle);
    tracing::info!(%user_id, %connection_id, "[Realtime] Client connected");

    let (mut sink, mut stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
        // Sender dropped: either the peer left or the dispatcher pruned us.
        let _ = sink.close().await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    registry.disconnect(board_id, connection_id);
    tracing::info!(%user_id, %connection_id, "[Realtime] Client disconnected");
}
