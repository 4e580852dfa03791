/**
 * In-Memory Store
 *
 * `BoardStore` over plain maps behind one `RwLock`. Each mutation runs under
 * a single write guard, which makes multi-row operations (board creation
 * with its owner membership, cascading deletes) all-or-nothing the same way
 * a database transaction would.
 *
 * Used by the test suite and when the server starts without `DATABASE_URL`.
 * Nothing survives a restart.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BoardStore, StoreError};
use crate::backend::auth::users::{NewUser, User};
use crate::shared::board::{next_position, sort_by_position};
use crate::shared::{
    Board, BoardChanges, BoardList, Card, CardChanges, ListChanges, MemberProfile, MemberRole,
    Membership, NewBoard, NewCard, NewList, UserProfile,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    boards: HashMap<Uuid, Board>,
    memberships: HashMap<(Uuid, Uuid), Membership>,
    lists: HashMap<Uuid, BoardList>,
    cards: HashMap<Uuid, Card>,
    /// (card, user) -> assigned at
    card_members: HashMap<(Uuid, Uuid), DateTime<Utc>>,
}

impl Tables {
    fn profile(&self, user_id: Uuid) -> Option<UserProfile> {
        self.users.get(&user_id).map(User::profile)
    }

    fn remove_cards(&mut self, card_ids: &[Uuid]) {
        for card_id in card_ids {
            self.cards.remove(card_id);
        }
        self.card_members.retain(|(card_id, _), _| !card_ids.contains(card_id));
    }

    fn card_ids_in_lists(&self, list_ids: &[Uuid]) -> Vec<Uuid> {
        self.cards
            .values()
            .filter(|card| list_ids.contains(&card.list_id))
            .map(|card| card.id)
            .collect()
    }

    fn next_card_position(&self, list_id: Uuid) -> Result<i32, StoreError> {
        Ok(next_position(
            self.cards
                .values()
                .filter(|card| card.list_id == list_id)
                .map(|card| card.position),
        )?)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::conflict("Email already registered"));
        }
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::conflict("Username already taken"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_board(&self, owner_id: Uuid, new_board: &NewBoard) -> Result<Board, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(StoreError::NotFound("user"));
        }

        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4(),
            title: new_board.title.trim().to_string(),
            owner_id,
            created_at: now,
            background_kind: new_board.background_kind,
            background_value: new_board.background_value.clone(),
            background_thumb_url: new_board.background_thumb_url.clone(),
        };
        tables.boards.insert(board.id, board.clone());
        tables.memberships.insert(
            (board.id, owner_id),
            Membership {
                board_id: board.id,
                user_id: owner_id,
                role: MemberRole::Owner,
                created_at: now,
            },
        );
        Ok(board)
    }

    async fn boards_for_user(&self, user_id: Uuid) -> Result<Vec<Board>, StoreError> {
        let tables = self.tables.read().await;
        let mut boards: Vec<Board> = tables
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| tables.boards.get(&m.board_id).cloned())
            .collect();
        boards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(boards)
    }

    async fn board(&self, id: Uuid) -> Result<Option<Board>, StoreError> {
        Ok(self.tables.read().await.boards.get(&id).cloned())
    }

    async fn update_board(&self, id: Uuid, changes: &BoardChanges) -> Result<Board, StoreError> {
        let mut tables = self.tables.write().await;
        let board = tables.boards.get_mut(&id).ok_or(StoreError::NotFound("board"))?;
        changes.apply_to(board);
        Ok(board.clone())
    }

    async fn delete_board(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.boards.remove(&id).is_none() {
            return Err(StoreError::NotFound("board"));
        }

        let list_ids: Vec<Uuid> = tables
            .lists
            .values()
            .filter(|list| list.board_id == id)
            .map(|list| list.id)
            .collect();
        let card_ids = tables.card_ids_in_lists(&list_ids);
        tables.remove_cards(&card_ids);
        tables.lists.retain(|_, list| list.board_id != id);
        tables.memberships.retain(|(board_id, _), _| *board_id != id);
        Ok(())
    }

    async fn membership(&self, board_id: Uuid, user_id: Uuid) -> Result<Option<Membership>, StoreError> {
        Ok(self.tables.read().await.memberships.get(&(board_id, user_id)).cloned())
    }

    async fn add_membership(
        &self,
        board_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Membership, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&board_id) {
            return Err(StoreError::NotFound("board"));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if tables.memberships.contains_key(&(board_id, user_id)) {
            return Err(StoreError::conflict("User is already a board member"));
        }

        let membership = Membership {
            board_id,
            user_id,
            role,
            created_at: Utc::now(),
        };
        tables.memberships.insert((board_id, user_id), membership.clone());
        Ok(membership)
    }

    async fn remove_membership(&self, board_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.memberships.remove(&(board_id, user_id)).is_some())
    }

    async fn board_members(&self, board_id: Uuid) -> Result<Vec<MemberProfile>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Membership> = tables
            .memberships
            .values()
            .filter(|m| m.board_id == board_id)
            .collect();
        rows.sort_by(|a, b| {
            b.is_owner()
                .cmp(&a.is_owner())
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        Ok(rows
            .into_iter()
            .filter_map(|m| {
                tables.profile(m.user_id).map(|p| MemberProfile {
                    user_id: p.user_id,
                    email: p.email,
                    username: p.username,
                    role: m.role,
                })
            })
            .collect())
    }

    async fn create_list(&self, board_id: Uuid, new_list: &NewList) -> Result<BoardList, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.contains_key(&board_id) {
            return Err(StoreError::NotFound("board"));
        }

        let position = next_position(
            tables
                .lists
                .values()
                .filter(|list| list.board_id == board_id)
                .map(|list| list.position),
        )?;
        let list = BoardList {
            id: Uuid::new_v4(),
            title: new_list.title.trim().to_string(),
            position,
            board_id,
            created_at: Utc::now(),
        };
        tables.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn lists_for_board(&self, board_id: Uuid) -> Result<Vec<BoardList>, StoreError> {
        let tables = self.tables.read().await;
        let mut lists: Vec<BoardList> = tables
            .lists
            .values()
            .filter(|list| list.board_id == board_id)
            .cloned()
            .collect();
        sort_by_position(&mut lists);
        Ok(lists)
    }

    async fn list(&self, id: Uuid) -> Result<Option<BoardList>, StoreError> {
        Ok(self.tables.read().await.lists.get(&id).cloned())
    }

    async fn update_list(&self, id: Uuid, changes: &ListChanges) -> Result<BoardList, StoreError> {
        let mut tables = self.tables.write().await;
        let list = tables.lists.get_mut(&id).ok_or(StoreError::NotFound("list"))?;
        changes.apply_to(list);
        Ok(list.clone())
    }

    async fn delete_list(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.lists.remove(&id).is_none() {
            return Err(StoreError::NotFound("list"));
        }
        let card_ids = tables.card_ids_in_lists(&[id]);
        tables.remove_cards(&card_ids);
        Ok(())
    }

    async fn create_card(
        &self,
        list_id: Uuid,
        creator_id: Uuid,
        new_card: &NewCard,
    ) -> Result<Card, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.lists.contains_key(&list_id) {
            return Err(StoreError::NotFound("list"));
        }

        let card = Card {
            id: Uuid::new_v4(),
            title: new_card.title.trim().to_string(),
            description: new_card.description.clone(),
            position: tables.next_card_position(list_id)?,
            list_id,
            creator_id,
            created_at: Utc::now(),
            label_ids: Vec::new(),
        };
        tables.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn cards_for_list(&self, list_id: Uuid) -> Result<Vec<Card>, StoreError> {
        let tables = self.tables.read().await;
        let mut cards: Vec<Card> = tables
            .cards
            .values()
            .filter(|card| card.list_id == list_id)
            .cloned()
            .collect();
        sort_by_position(&mut cards);
        Ok(cards)
    }

    async fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        Ok(self.tables.read().await.cards.get(&id).cloned())
    }

    async fn update_card(&self, id: Uuid, changes: &CardChanges) -> Result<Card, StoreError> {
        let mut tables = self.tables.write().await;
        let current_list = tables.cards.get(&id).ok_or(StoreError::NotFound("card"))?.list_id;

        let moved_to = changes.list_id.filter(|target| *target != current_list);
        let appended_position = match moved_to {
            Some(target) => {
                if !tables.lists.contains_key(&target) {
                    return Err(StoreError::NotFound("list"));
                }
                match changes.position {
                    Some(_) => None,
                    None => Some(tables.next_card_position(target)?),
                }
            }
            None => None,
        };

        let card = tables.cards.get_mut(&id).ok_or(StoreError::NotFound("card"))?;
        changes.apply_to(card);
        if let Some(target) = moved_to {
            card.list_id = target;
            if let Some(position) = appended_position {
                card.position = position;
            }
        }
        Ok(card.clone())
    }

    async fn delete_card(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.cards.contains_key(&id) {
            return Err(StoreError::NotFound("card"));
        }
        tables.remove_cards(&[id]);
        Ok(())
    }

    async fn add_card_member(&self, card_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.cards.contains_key(&card_id) {
            return Err(StoreError::NotFound("card"));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if tables.card_members.contains_key(&(card_id, user_id)) {
            return Err(StoreError::conflict("User is already assigned to this card"));
        }
        tables.card_members.insert((card_id, user_id), Utc::now());
        Ok(())
    }

    async fn remove_card_member(&self, card_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.card_members.remove(&(card_id, user_id)).is_some())
    }

    async fn card_members(&self, card_id: Uuid) -> Result<Vec<UserProfile>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(Uuid, DateTime<Utc>)> = tables
            .card_members
            .iter()
            .filter(|((card, _), _)| *card == card_id)
            .map(|((_, user), at)| (*user, *at))
            .collect();
        rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        Ok(rows
            .into_iter()
            .filter_map(|(user_id, _)| tables.profile(user_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::MAX_POSITION;

    async fn user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn board(title: &str) -> NewBoard {
        NewBoard {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn list(title: &str) -> NewList {
        NewList { title: title.to_string() }
    }

    fn card(title: &str) -> NewCard {
        NewCard {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        user(&store, "alice").await;
        let err = store
            .create_user(NewUser {
                username: "other".into(),
                email: "alice@example.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_board_adds_owner_membership() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let created = store.create_board(alice.id, &board("Sprint Board")).await.unwrap();

        let membership = store.membership(created.id, alice.id).await.unwrap().unwrap();
        assert_eq!(membership.role, MemberRole::Owner);
        assert_eq!(store.boards_for_user(alice.id).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_list_positions_append() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let b = store.create_board(alice.id, &board("b")).await.unwrap();

        for title in ["To Do", "In Progress", "Done", "Later"] {
            store.create_list(b.id, &list(title)).await.unwrap();
        }
        let positions: Vec<i32> = store
            .lists_for_board(b.id)
            .await
            .unwrap()
            .iter()
            .map(|l| l.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_full_list_rejects_append_but_accepts_explicit_position() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let b = store.create_board(alice.id, &board("b")).await.unwrap();
        let todo = store.create_list(b.id, &list("todo")).await.unwrap();
        let done = store.create_list(b.id, &list("done")).await.unwrap();
        let last = store.create_card(done.id, alice.id, &card("last")).await.unwrap();
        let moving = store.create_card(todo.id, alice.id, &card("moving")).await.unwrap();
        let at_limit = CardChanges {
            position: Some(MAX_POSITION),
            ..Default::default()
        };
        store.update_card(last.id, &at_limit).await.unwrap();

        let err = store.create_card(done.id, alice.id, &card("overflow")).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));

        let append = CardChanges {
            list_id: Some(done.id),
            ..Default::default()
        };
        let err = store.update_card(moving.id, &append).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert_eq!(store.card(moving.id).await.unwrap().unwrap().list_id, todo.id);

        let placed = CardChanges {
            list_id: Some(done.id),
            position: Some(0),
            ..Default::default()
        };
        let moved = store.update_card(moving.id, &placed).await.unwrap();
        assert_eq!((moved.list_id, moved.position), (done.id, 0));
    }

    #[tokio::test]
    async fn test_move_card_appends_to_target() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let b = store.create_board(alice.id, &board("b")).await.unwrap();
        let todo = store.create_list(b.id, &list("todo")).await.unwrap();
        let done = store.create_list(b.id, &list("done")).await.unwrap();
        store.create_card(done.id, alice.id, &card("existing")).await.unwrap();
        let moving = store.create_card(todo.id, alice.id, &card("moving")).await.unwrap();

        let moved = store
            .update_card(
                moving.id,
                &CardChanges {
                    list_id: Some(done.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(moved.list_id, done.id);
        assert_eq!(moved.position, 1);
        assert!(store.cards_for_list(todo.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_board_cascades_only_that_board() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let doomed = store.create_board(alice.id, &board("doomed")).await.unwrap();
        let kept = store.create_board(alice.id, &board("kept")).await.unwrap();

        let doomed_list = store.create_list(doomed.id, &list("l")).await.unwrap();
        let doomed_card = store.create_card(doomed_list.id, alice.id, &card("c")).await.unwrap();
        store.add_membership(doomed.id, bob.id, MemberRole::Member).await.unwrap();
        store.add_card_member(doomed_card.id, bob.id).await.unwrap();

        let kept_list = store.create_list(kept.id, &list("l")).await.unwrap();
        let kept_card = store.create_card(kept_list.id, alice.id, &card("c")).await.unwrap();

        store.delete_board(doomed.id).await.unwrap();

        assert!(store.board(doomed.id).await.unwrap().is_none());
        assert!(store.list(doomed_list.id).await.unwrap().is_none());
        assert!(store.card(doomed_card.id).await.unwrap().is_none());
        assert!(store.membership(doomed.id, bob.id).await.unwrap().is_none());
        assert!(store.card_members(doomed_card.id).await.unwrap().is_empty());

        assert_eq!(store.lists_for_board(kept.id).await.unwrap(), vec![kept_list.clone()]);
        assert_eq!(store.cards_for_list(kept_list.id).await.unwrap().len(), 1);
        assert_eq!(store.card(kept_card.id).await.unwrap(), Some(kept_card));
    }

    #[tokio::test]
    async fn test_board_members_owner_first() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let b = store.create_board(alice.id, &board("b")).await.unwrap();
        store.add_membership(b.id, bob.id, MemberRole::Member).await.unwrap();

        let members = store.board_members(b.id).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].user_id, alice.id);
        assert_eq!(members[0].role, MemberRole::Owner);
        assert_eq!(members[1].user_id, bob.id);

        let err = store.add_membership(b.id, bob.id, MemberRole::Member).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_assignment_leaves_one_row() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let b = store.create_board(alice.id, &board("b")).await.unwrap();
        let l = store.create_list(b.id, &list("l")).await.unwrap();
        let c = store.create_card(l.id, alice.id, &card("c")).await.unwrap();

        store.add_card_member(c.id, alice.id).await.unwrap();
        assert!(matches!(
            store.add_card_member(c.id, alice.id).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.card_members(c.id).await.unwrap().len(), 1);
    }
}
