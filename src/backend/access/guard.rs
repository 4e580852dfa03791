/**
 * Access Guard
 *
 * Pure decision functions over a loaded [`Membership`], plus
 * [`AccessGuard`], which loads the records a decision needs and returns the
 * entities it resolved so handlers never read them twice.
 */

use uuid::Uuid;

use crate::backend::access::AccessError;
use crate::backend::store::BoardStore;
use crate::shared::{Board, BoardList, Card, Membership};

pub const NOT_A_MEMBER: &str = "not a board member";
pub const NOT_THE_OWNER: &str = "only the board owner can do this";
pub const TARGET_NOT_A_MEMBER: &str = "target is not a board member";
pub const CANNOT_REMOVE_OWNER: &str = "cannot remove the board owner";

/// Any membership grants member-level access
pub fn check_membership(membership: Option<&Membership>) -> Result<(), AccessError> {
    match membership {
        Some(_) => Ok(()),
        None => Err(AccessError::Forbidden(NOT_A_MEMBER)),
    }
}

pub fn check_owner(membership: Option<&Membership>) -> Result<(), AccessError> {
    match membership {
        Some(m) if m.is_owner() => Ok(()),
        Some(_) => Err(AccessError::Forbidden(NOT_THE_OWNER)),
        None => Err(AccessError::Forbidden(NOT_A_MEMBER)),
    }
}

/// Decide whether `target` may be removed from the board
pub fn check_removable(target: Option<&Membership>) -> Result<(), AccessError> {
    match target {
        Some(m) if m.is_owner() => Err(AccessError::Conflict(CANNOT_REMOVE_OWNER)),
        Some(_) => Ok(()),
        None => Err(AccessError::NotFound("member")),
    }
}

/// Store-backed authorization checks for one request
#[derive(Clone, Copy)]
pub struct AccessGuard<'a> {
    store: &'a dyn BoardStore,
}

impl<'a> AccessGuard<'a> {
    pub fn new(store: &'a dyn BoardStore) -> Self {
        Self { store }
    }

    pub async fn is_board_member(&self, board_id: Uuid, user_id: Uuid) -> Result<bool, AccessError> {
        Ok(self.store.membership(board_id, user_id).await?.is_some())
    }

    pub async fn is_board_owner(&self, board_id: Uuid, user_id: Uuid) -> Result<bool, AccessError> {
        Ok(self
            .store
            .membership(board_id, user_id)
            .await?
            .is_some_and(|m| m.is_owner()))
    }

    async fn load_board(&self, board_id: Uuid) -> Result<Board, AccessError> {
        self.store
            .board(board_id)
            .await?
            .ok_or(AccessError::NotFound("board"))
    }

    /// Board must exist and the user must hold a membership on it
    pub async fn require_member(&self, board_id: Uuid, user_id: Uuid) -> Result<Board, AccessError> {
        let board = self.load_board(board_id).await?;
        let membership = self.store.membership(board_id, user_id).await?;
        check_membership(membership.as_ref())?;
        Ok(board)
    }

    pub async fn require_owner(&self, board_id: Uuid, user_id: Uuid) -> Result<Board, AccessError> {
        let board = self.load_board(board_id).await?;
        let membership = self.store.membership(board_id, user_id).await?;
        check_owner(membership.as_ref())?;
        Ok(board)
    }

    /// Resolve a list to its board and require membership there
    pub async fn require_list_member(
        &self,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<(BoardList, Board), AccessError> {
        let list = self
            .store
            .list(list_id)
            .await?
            .ok_or(AccessError::NotFound("list"))?;
        let board = self.require_member(list.board_id, user_id).await?;
        Ok((list, board))
    }

    /// Resolve a card through its list to the owning board
    pub async fn resolve_card_board(&self, card_id: Uuid) -> Result<(Card, BoardList), AccessError> {
        let card = self
            .store
            .card(card_id)
            .await?
            .ok_or(AccessError::NotFound("card"))?;
        let list = self
            .store
            .list(card.list_id)
            .await?
            .ok_or(AccessError::NotFound("list"))?;
        Ok((card, list))
    }

    /// Board id owning a list, used to pick the dispatch lane before the
    /// guarded mutation runs
    pub async fn board_of_list(&self, list_id: Uuid) -> Result<Uuid, AccessError> {
        self.store
            .list(list_id)
            .await?
            .map(|list| list.board_id)
            .ok_or(AccessError::NotFound("list"))
    }

    pub async fn board_of_card(&self, card_id: Uuid) -> Result<Uuid, AccessError> {
        let (_, list) = self.resolve_card_board(card_id).await?;
        Ok(list.board_id)
    }

    pub async fn require_card_member(
        &self,
        card_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Card, BoardList, Board), AccessError> {
        let (card, list) = self.resolve_card_board(card_id).await?;
        let board = self.require_member(list.board_id, user_id).await?;
        Ok((card, list, board))
    }

    /// A card can only be assigned to someone who is on the board
    pub async fn ensure_assignable(&self, board_id: Uuid, target_id: Uuid) -> Result<(), AccessError> {
        if self.is_board_member(board_id, target_id).await? {
            Ok(())
        } else {
            Err(AccessError::Forbidden(TARGET_NOT_A_MEMBER))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::NewUser;
    use crate::backend::store::MemoryStore;
    use crate::shared::{MemberRole, NewBoard, NewCard, NewList};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn membership(role: MemberRole) -> Membership {
        Membership {
            board_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pure_checks() {
        let owner = membership(MemberRole::Owner);
        let member = membership(MemberRole::Member);

        assert!(check_membership(Some(&owner)).is_ok());
        assert!(check_membership(Some(&member)).is_ok());
        assert_matches!(check_membership(None), Err(AccessError::Forbidden(NOT_A_MEMBER)));

        assert!(check_owner(Some(&owner)).is_ok());
        assert_matches!(check_owner(Some(&member)), Err(AccessError::Forbidden(NOT_THE_OWNER)));
        assert_matches!(check_owner(None), Err(AccessError::Forbidden(_)));

        assert_matches!(check_removable(Some(&owner)), Err(AccessError::Conflict(_)));
        assert!(check_removable(Some(&member)).is_ok());
        assert_matches!(check_removable(None), Err(AccessError::NotFound("member")));
    }

    async fn user(store: &MemoryStore, name: &str) -> Uuid {
        store
            .create_user(NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_guard_resolves_through_card_and_list() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let board = store
            .create_board(alice, &NewBoard { title: "Roadmap".into(), ..Default::default() })
            .await
            .unwrap();
        let list = store.create_list(board.id, &NewList { title: "Todo".into() }).await.unwrap();
        let card = store
            .create_card(list.id, alice, &NewCard { title: "Ship".into(), description: None })
            .await
            .unwrap();

        let guard = AccessGuard::new(&store);
        assert!(guard.is_board_owner(board.id, alice).await.unwrap());
        assert!(!guard.is_board_member(board.id, bob).await.unwrap());

        let (found, found_list, found_board) = guard.require_card_member(card.id, alice).await.unwrap();
        assert_eq!(found.id, card.id);
        assert_eq!(found_list.id, list.id);
        assert_eq!(found_board.id, board.id);
        assert_eq!(guard.board_of_card(card.id).await.unwrap(), board.id);
        assert_eq!(guard.board_of_list(list.id).await.unwrap(), board.id);
        assert_matches!(guard.board_of_list(Uuid::new_v4()).await, Err(AccessError::NotFound("list")));

        assert_matches!(
            guard.require_card_member(card.id, bob).await,
            Err(AccessError::Forbidden(NOT_A_MEMBER))
        );
        assert_matches!(
            guard.require_member(Uuid::new_v4(), alice).await,
            Err(AccessError::NotFound("board"))
        );
        assert_matches!(
            guard.ensure_assignable(board.id, bob).await,
            Err(AccessError::Forbidden(TARGET_NOT_A_MEMBER))
        );

        store.add_membership(board.id, bob, MemberRole::Member).await.unwrap();
        assert!(guard.ensure_assignable(board.id, bob).await.is_ok());
        assert_matches!(
            guard.require_owner(board.id, bob).await,
            Err(AccessError::Forbidden(NOT_THE_OWNER))
        );
    }
}
