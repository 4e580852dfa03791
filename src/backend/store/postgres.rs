/**
 * Postgres Store
 *
 * `BoardStore` over a sqlx `PgPool`. Multi-statement writes run inside a
 * transaction; partial updates lock the row (`FOR UPDATE`), apply the
 * changes in Rust and write the full row back, so the merge rules live in
 * one place for both store implementations.
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{BoardStore, StoreError};
use crate::backend::auth::users::{NewUser, User};
use crate::shared::board::next_position;
use crate::shared::{
    Board, BoardChanges, BoardList, Card, CardChanges, ListChanges, MemberProfile, MemberRole,
    Membership, NewBoard, NewCard, NewList, UserProfile,
};

pub(crate) type Tx<'a> = Transaction<'a, Postgres>;

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const BOARD_COLUMNS: &str =
    "id, title, owner_id, created_at, background_kind, background_value, background_thumb_url";
const LIST_COLUMNS: &str = "id, title, position, board_id, created_at";
const CARD_COLUMNS: &str =
    "id, title, description, position, list_id, creator_id, created_at, label_ids";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and bring the schema up to date
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    async fn next_list_position(tx: &mut Tx<'_>, board_id: Uuid) -> Result<i32, StoreError> {
        let max: Option<i32> = sqlx::query_scalar("SELECT MAX(position) FROM lists WHERE board_id = $1")
            .bind(board_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(next_position(max)?)
    }

    async fn next_card_position(tx: &mut Tx<'_>, list_id: Uuid) -> Result<i32, StoreError> {
        let max: Option<i32> = sqlx::query_scalar("SELECT MAX(position) FROM cards WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(next_position(max)?)
    }
}

/// Translate constraint violations into the store's conflict/not-found classes
fn map_write_error(err: sqlx::Error, conflict: &str, missing: &'static str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::conflict(conflict);
        }
        if db.is_foreign_key_violation() {
            return StoreError::NotFound(missing);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl BoardStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            let constraint = match &err {
                sqlx::Error::Database(db) => db.constraint().map(str::to_owned),
                _ => None,
            };
            match constraint.as_deref() {
                Some("users_username_key") => map_write_error(err, "Username already taken", "user"),
                _ => map_write_error(err, "Email already registered", "user"),
            }
        })
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_board(&self, owner_id: Uuid, new_board: &NewBoard) -> Result<Board, StoreError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let board = sqlx::query_as::<_, Board>(&format!(
            "INSERT INTO boards (id, title, owner_id, created_at, background_kind, background_value, background_thumb_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {BOARD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new_board.title.trim())
        .bind(owner_id)
        .bind(now)
        .bind(new_board.background_kind)
        .bind(&new_board.background_value)
        .bind(&new_board.background_thumb_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Board already exists", "user"))?;

        sqlx::query(
            "INSERT INTO board_members (board_id, user_id, role, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(board.id)
        .bind(owner_id)
        .bind(MemberRole::Owner)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(board)
    }

    async fn boards_for_user(&self, user_id: Uuid) -> Result<Vec<Board>, StoreError> {
        let boards = sqlx::query_as::<_, Board>(
            "SELECT b.id, b.title, b.owner_id, b.created_at, b.background_kind, b.background_value, b.background_thumb_url
             FROM boards b
             JOIN board_members bm ON bm.board_id = b.id
             WHERE bm.user_id = $1
             ORDER BY b.created_at, b.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(boards)
    }

    async fn board(&self, id: Uuid) -> Result<Option<Board>, StoreError> {
        let board = sqlx::query_as::<_, Board>(&format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(board)
    }

    async fn update_board(&self, id: Uuid, changes: &BoardChanges) -> Result<Board, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut board = sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("board"))?;

        changes.apply_to(&mut board);

        let board = sqlx::query_as::<_, Board>(&format!(
            "UPDATE boards
             SET title = $2, background_kind = $3, background_value = $4, background_thumb_url = $5
             WHERE id = $1
             RETURNING {BOARD_COLUMNS}"
        ))
        .bind(id)
        .bind(&board.title)
        .bind(board.background_kind)
        .bind(&board.background_value)
        .bind(&board.background_thumb_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(board)
    }

    async fn delete_board(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Children first; the schema cascades too, but the order is explicit here.
        sqlx::query(
            "DELETE FROM card_members WHERE card_id IN (
                 SELECT c.id FROM cards c JOIN lists l ON l.id = c.list_id WHERE l.board_id = $1
             )",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM cards WHERE list_id IN (SELECT id FROM lists WHERE board_id = $1)")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM lists WHERE board_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM board_members WHERE board_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("board"));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn membership(&self, board_id: Uuid, user_id: Uuid) -> Result<Option<Membership>, StoreError> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT board_id, user_id, role, created_at
             FROM board_members
             WHERE board_id = $1 AND user_id = $2",
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    async fn add_membership(
        &self,
        board_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Membership, StoreError> {
        sqlx::query_as::<_, Membership>(
            "INSERT INTO board_members (board_id, user_id, role, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING board_id, user_id, role, created_at",
        )
        .bind(board_id)
        .bind(user_id)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User is already a board member", "board"))
    }

    async fn remove_membership(&self, board_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM board_members WHERE board_id = $1 AND user_id = $2")
            .bind(board_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn board_members(&self, board_id: Uuid) -> Result<Vec<MemberProfile>, StoreError> {
        let members = sqlx::query_as::<_, MemberProfile>(
            "SELECT u.id AS user_id, u.email, u.username, bm.role
             FROM board_members bm
             JOIN users u ON u.id = bm.user_id
             WHERE bm.board_id = $1
             ORDER BY (bm.role = 'owner') DESC, bm.created_at, u.id",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    async fn create_list(&self, board_id: Uuid, new_list: &NewList) -> Result<BoardList, StoreError> {
        let mut tx = self.pool.begin().await?;
        let position = Self::next_list_position(&mut tx, board_id).await?;
        let list = sqlx::query_as::<_, BoardList>(&format!(
            "INSERT INTO lists (id, title, position, board_id, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {LIST_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new_list.title.trim())
        .bind(position)
        .bind(board_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "List already exists", "board"))?;
        tx.commit().await?;
        Ok(list)
    }

    async fn lists_for_board(&self, board_id: Uuid) -> Result<Vec<BoardList>, StoreError> {
        let lists = sqlx::query_as::<_, BoardList>(&format!(
            "SELECT {LIST_COLUMNS} FROM lists WHERE board_id = $1 ORDER BY position, created_at, id"
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn list(&self, id: Uuid) -> Result<Option<BoardList>, StoreError> {
        let list = sqlx::query_as::<_, BoardList>(&format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(list)
    }

    async fn update_list(&self, id: Uuid, changes: &ListChanges) -> Result<BoardList, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut list = sqlx::query_as::<_, BoardList>(&format!(
            "SELECT {LIST_COLUMNS} FROM lists WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("list"))?;

        changes.apply_to(&mut list);

        let list = sqlx::query_as::<_, BoardList>(&format!(
            "UPDATE lists SET title = $2, position = $3 WHERE id = $1 RETURNING {LIST_COLUMNS}"
        ))
        .bind(id)
        .bind(&list.title)
        .bind(list.position)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(list)
    }

    async fn delete_list(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM card_members WHERE card_id IN (SELECT id FROM cards WHERE list_id = $1)")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM cards WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("list"));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_card(
        &self,
        list_id: Uuid,
        creator_id: Uuid,
        new_card: &NewCard,
    ) -> Result<Card, StoreError> {
        let mut tx = self.pool.begin().await?;
        let position = Self::next_card_position(&mut tx, list_id).await?;
        let card = sqlx::query_as::<_, Card>(&format!(
            "INSERT INTO cards (id, title, description, position, list_id, creator_id, created_at, label_ids)
             VALUES ($1, $2, $3, $4, $5, $6, $7, '{{}}')
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new_card.title.trim())
        .bind(&new_card.description)
        .bind(position)
        .bind(list_id)
        .bind(creator_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Card already exists", "list"))?;
        tx.commit().await?;
        Ok(card)
    }

    async fn cards_for_list(&self, list_id: Uuid) -> Result<Vec<Card>, StoreError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE list_id = $1 ORDER BY position, created_at, id"
        ))
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    async fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        let card = sqlx::query_as::<_, Card>(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(card)
    }

    async fn update_card(&self, id: Uuid, changes: &CardChanges) -> Result<Card, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("card"))?;

        let moved_to = changes.list_id.filter(|target| *target != card.list_id);
        changes.apply_to(&mut card);
        if let Some(target) = moved_to {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM lists WHERE id = $1)")
                .bind(target)
                .fetch_one(&mut *tx)
                .await?;
            if !exists {
                tx.rollback().await?;
                return Err(StoreError::NotFound("list"));
            }
            if changes.position.is_none() {
                card.position = Self::next_card_position(&mut tx, target).await?;
            }
            card.list_id = target;
        }

        let card = sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards
             SET title = $2, description = $3, position = $4, list_id = $5, label_ids = $6
             WHERE id = $1
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(card.position)
        .bind(card.list_id)
        .bind(&card.label_ids)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    async fn delete_card(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM card_members WHERE card_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("card"));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn add_card_member(&self, card_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO card_members (card_id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(card_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "User is already assigned to this card", "card"))?;
        Ok(())
    }

    async fn remove_card_member(&self, card_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM card_members WHERE card_id = $1 AND user_id = $2")
            .bind(card_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn card_members(&self, card_id: Uuid) -> Result<Vec<UserProfile>, StoreError> {
        let members = sqlx::query_as::<_, UserProfile>(
            "SELECT u.id AS user_id, u.email, u.username
             FROM card_members cm
             JOIN users u ON u.id = cm.user_id
             WHERE cm.card_id = $1
             ORDER BY cm.created_at, u.id",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}
