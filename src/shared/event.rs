/**
 * Board Event System
 *
 * Events pushed to every live WebSocket connection of a board after a
 * mutation commits. The wire shape is fixed:
 *
 * ```json
 * {"type": "list.created", "payload": {"board_id": "...", "actor_id": "...", "list": {...}}}
 * ```
 *
 * Every payload names the board it belongs to and the user whose request
 * produced it. Delete events carry identifiers captured before the row was
 * removed, since nothing can be read back afterwards.
 */
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::shared::board::{Board, BoardList, Card, MemberProfile, UserProfile};

/// Type of board event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Handshake acknowledgment sent once per accepted connection
    #[serde(rename = "ws.connected")]
    Connected,
    #[serde(rename = "board.created")]
    BoardCreated,
    #[serde(rename = "board.updated")]
    BoardUpdated,
    #[serde(rename = "board.deleted")]
    BoardDeleted,
    #[serde(rename = "list.created")]
    ListCreated,
    #[serde(rename = "list.updated")]
    ListUpdated,
    #[serde(rename = "list.deleted")]
    ListDeleted,
    #[serde(rename = "card.created")]
    CardCreated,
    #[serde(rename = "card.updated")]
    CardUpdated,
    #[serde(rename = "card.deleted")]
    CardDeleted,
    #[serde(rename = "board.member.added")]
    BoardMemberAdded,
    #[serde(rename = "board.member.removed")]
    BoardMemberRemoved,
    #[serde(rename = "card.member.added")]
    CardMemberAdded,
    #[serde(rename = "card.member.removed")]
    CardMemberRemoved,
}

impl EventType {
    /// The `type` string used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "ws.connected",
            Self::BoardCreated => "board.created",
            Self::BoardUpdated => "board.updated",
            Self::BoardDeleted => "board.deleted",
            Self::ListCreated => "list.created",
            Self::ListUpdated => "list.updated",
            Self::ListDeleted => "list.deleted",
            Self::CardCreated => "card.created",
            Self::CardUpdated => "card.updated",
            Self::CardDeleted => "card.deleted",
            Self::BoardMemberAdded => "board.member.added",
            Self::BoardMemberRemoved => "board.member.removed",
            Self::CardMemberAdded => "card.member.added",
            Self::CardMemberRemoved => "card.member.removed",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event delivered to the live connections of one board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
}

impl BoardEvent {
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self { event_type, payload }
    }

    /// Acknowledgment sent to a connection right after it is accepted
    pub fn connected(board_id: Uuid, user_id: Uuid) -> Self {
        Self::new(
            EventType::Connected,
            json!({ "board_id": board_id, "user_id": user_id }),
        )
    }

    pub fn board_created(board: &Board, actor_id: Uuid) -> Self {
        Self::new(
            EventType::BoardCreated,
            json!({ "board_id": board.id, "actor_id": actor_id, "board": board }),
        )
    }

    pub fn board_updated(board: &Board, actor_id: Uuid) -> Self {
        Self::new(
            EventType::BoardUpdated,
            json!({ "board_id": board.id, "actor_id": actor_id, "board": board }),
        )
    }

    /// Built from the board as it was read before deletion
    pub fn board_deleted(board: &Board, actor_id: Uuid) -> Self {
        Self::new(
            EventType::BoardDeleted,
            json!({ "board_id": board.id, "actor_id": actor_id, "title": board.title }),
        )
    }

    pub fn list_created(list: &BoardList, actor_id: Uuid) -> Self {
        Self::new(
            EventType::ListCreated,
            json!({ "board_id": list.board_id, "actor_id": actor_id, "list": list }),
        )
    }

    pub fn list_updated(list: &BoardList, actor_id: Uuid) -> Self {
        Self::new(
            EventType::ListUpdated,
            json!({ "board_id": list.board_id, "actor_id": actor_id, "list": list }),
        )
    }

    pub fn list_deleted(board_id: Uuid, list_id: Uuid, actor_id: Uuid) -> Self {
        Self::new(
            EventType::ListDeleted,
            json!({ "board_id": board_id, "actor_id": actor_id, "list_id": list_id }),
        )
    }

    pub fn card_created(board_id: Uuid, card: &Card, actor_id: Uuid) -> Self {
        Self::new(
            EventType::CardCreated,
            json!({ "board_id": board_id, "actor_id": actor_id, "card": card }),
        )
    }

    /// `from_list_id` differs from `card.list_id` when the update moved the card
    pub fn card_updated(board_id: Uuid, card: &Card, from_list_id: Uuid, actor_id: Uuid) -> Self {
        Self::new(
            EventType::CardUpdated,
            json!({
                "board_id": board_id,
                "actor_id": actor_id,
                "card": card,
                "from_list_id": from_list_id,
            }),
        )
    }

    pub fn card_deleted(board_id: Uuid, card_id: Uuid, list_id: Uuid, actor_id: Uuid) -> Self {
        Self::new(
            EventType::CardDeleted,
            json!({
                "board_id": board_id,
                "actor_id": actor_id,
                "card_id": card_id,
                "list_id": list_id,
            }),
        )
    }

    pub fn board_member_added(board_id: Uuid, member: &MemberProfile, actor_id: Uuid) -> Self {
        Self::new(
            EventType::BoardMemberAdded,
            json!({ "board_id": board_id, "actor_id": actor_id, "member": member }),
        )
    }

    pub fn board_member_removed(board_id: Uuid, user: &UserProfile, actor_id: Uuid) -> Self {
        Self::new(
            EventType::BoardMemberRemoved,
            json!({
                "board_id": board_id,
                "actor_id": actor_id,
                "user_id": user.user_id,
                "email": user.email,
            }),
        )
    }

    pub fn card_member_added(board_id: Uuid, card_id: Uuid, member: &UserProfile, actor_id: Uuid) -> Self {
        Self::new(
            EventType::CardMemberAdded,
            json!({
                "board_id": board_id,
                "actor_id": actor_id,
                "card_id": card_id,
                "member": member,
            }),
        )
    }

    pub fn card_member_removed(board_id: Uuid, card_id: Uuid, user_id: Uuid, actor_id: Uuid) -> Self {
        Self::new(
            EventType::CardMemberRemoved,
            json!({
                "board_id": board_id,
                "actor_id": actor_id,
                "card_id": card_id,
                "user_id": user_id,
            }),
        )
    }

    /// Board id carried in the payload
    pub fn board_id(&self) -> Option<Uuid> {
        self.payload
            .get("board_id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    /// Encode to the JSON text frame sent over the socket
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
