/**
 * Board Domain Types
 *
 * Boards, lists, cards and the membership relations between them, plus the
 * request bodies that create or change them. These types are what the
 * persistence layer stores, what the REST API returns and what real-time
 * events embed in their payloads.
 *
 * # Ordering
 *
 * Lists and cards carry an integer `position`. Positions are never
 * renormalized, so siblings may share a position; readers sort by
 * `(position, created_at, id)` via [`sort_by_position`].
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Longest accepted title for boards, lists and cards
pub const MAX_TITLE_LEN: usize = 200;

/// Highest position a list or card may hold
pub const MAX_POSITION: i32 = 1_000_000;

/// Role a user holds on a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member,
}

/// How a board background is rendered by clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "background_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Gradient,
    Unsplash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub background_kind: BackgroundKind,
    pub background_value: Option<String>,
    pub background_thumb_url: Option<String>,
}

/// A column within a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardList {
    pub id: Uuid,
    pub title: String,
    pub position: i32,
    pub board_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub list_id: Uuid,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub label_ids: Vec<i32>,
}

/// One row of the board membership relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn is_owner(&self) -> bool {
        self.role == MemberRole::Owner
    }
}

/// Board member as listed by the members endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberProfile {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub role: MemberRole,
}

/// User assigned to a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
}

/// Request body for `POST /api/boards`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
    #[serde(default)]
    pub background_kind: BackgroundKind,
    #[serde(default)]
    pub background_value: Option<String>,
    #[serde(default)]
    pub background_thumb_url: Option<String>,
}

impl NewBoard {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_title(&self.title)
    }
}

/// Partial update for a board; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardChanges {
    pub title: Option<String>,
    pub background_kind: Option<BackgroundKind>,
    pub background_value: Option<String>,
    pub background_thumb_url: Option<String>,
}

impl BoardChanges {
    pub fn validate(&self) -> Result<(), SharedError> {
        self.title.as_deref().map_or(Ok(()), validate_title)
    }

    /// Apply the present fields to `board`
    pub fn apply_to(&self, board: &mut Board) {
        if let Some(title) = &self.title {
            board.title = title.trim().to_string();
        }
        if let Some(kind) = self.background_kind {
            board.background_kind = kind;
        }
        if let Some(value) = &self.background_value {
            board.background_value = Some(value.clone());
        }
        if let Some(url) = &self.background_thumb_url {
            board.background_thumb_url = Some(url.clone());
        }
    }
}

/// Request body for `POST /api/lists`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewList {
    pub title: String,
}

impl NewList {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_title(&self.title)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListChanges {
    pub title: Option<String>,
    pub position: Option<i32>,
}

impl ListChanges {
    pub fn validate(&self) -> Result<(), SharedError> {
        self.title.as_deref().map_or(Ok(()), validate_title)?;
        validate_position(self.position)
    }

    pub fn apply_to(&self, list: &mut BoardList) {
        if let Some(title) = &self.title {
            list.title = title.trim().to_string();
        }
        if let Some(position) = self.position {
            list.position = position;
        }
    }
}

/// Request body for `POST /api/cards`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCard {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_title(&self.title)
    }
}

/// Partial update for a card. Setting `list_id` moves the card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub list_id: Option<Uuid>,
    pub label_ids: Option<Vec<i32>>,
}

impl CardChanges {
    pub fn validate(&self) -> Result<(), SharedError> {
        self.title.as_deref().map_or(Ok(()), validate_title)?;
        validate_position(self.position)
    }

    /// Apply every present field except `list_id`, which the store resolves
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(title) = &self.title {
            card.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            card.description = Some(description.clone());
        }
        if let Some(position) = self.position {
            card.position = position;
        }
        if let Some(label_ids) = &self.label_ids {
            card.label_ids = label_ids.clone();
        }
    }
}

/// Identity lookup body used by both member endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberByEmail {
    pub email: String,
}

fn validate_title(title: &str) -> Result<(), SharedError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("title", "title must not be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(SharedError::validation(
            "title",
            format!("title must be at most {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(())
}

fn validate_position(position: Option<i32>) -> Result<(), SharedError> {
    match position {
        Some(p) if p < 0 => Err(SharedError::validation("position", "position must not be negative")),
        Some(p) if p > MAX_POSITION => Err(SharedError::validation(
            "position",
            format!("position must be at most {}", MAX_POSITION),
        )),
        _ => Ok(()),
    }
}

/// Anything ordered by a loose integer position
pub trait Positioned {
    fn position(&self) -> i32;
    fn created_at(&self) -> DateTime<Utc>;
    fn id(&self) -> Uuid;
}

impl Positioned for BoardList {
    fn position(&self) -> i32 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Positioned for Card {
    fn position(&self) -> i32 {
        self.position
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Stable sort by position, ties broken by creation time then id
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.position()
            .cmp(&b.position())
            .then_with(|| a.created_at().cmp(&b.created_at()))
            .then_with(|| a.id().cmp(&b.id()))
    });
}

/// Position for a new child appended after `positions`
///
/// Fails once the parent already holds a child at [`MAX_POSITION`].
pub fn next_position(positions: impl IntoIterator<Item = i32>) -> Result<i32, SharedError> {
    match positions.into_iter().max() {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .filter(|next| *next <= MAX_POSITION)
            .ok_or_else(|| SharedError::validation("position", "no position left to append at")),
    }
}
