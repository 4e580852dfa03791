//! End-to-end scenarios spanning several boards and users

#[macro_use]
mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{id_of, register_user, TestApp};

#[tokio::test]
async fn test_deleting_one_board_leaves_the_other_intact() {
    let app = TestApp::new();
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let mut boards = Vec::new();
    for title in ["Keep", "Drop"] {
        let board = assert_status!(
            app.post("/api/boards", &alice.token, json!({ "title": title })).await,
            StatusCode::CREATED
        );
        let board_id = id_of(&board, "id");
        app.post(
            &format!("/api/boards/{}/members", board_id),
            &alice.token,
            json!({ "email": bob.email }),
        )
        .await;

        let list = app
            .post(&format!("/api/lists?board_id={}", board_id), &alice.token, json!({ "title": "Todo" }))
            .await
            .1;
        let list_id = id_of(&list, "id");
        for card in ["one", "two"] {
            let created = app
                .post(&format!("/api/cards?list_id={}", list_id), &alice.token, json!({ "title": card }))
                .await
                .1;
            app.post(
                &format!("/api/cards/{}/members", id_of(&created, "id")),
                &alice.token,
                json!({ "email": bob.email }),
            )
            .await;
        }
        boards.push((board_id, list_id));
    }
    let (keep, keep_list) = boards[0];
    let (drop, drop_list) = boards[1];

    assert_status!(
        app.delete(&format!("/api/boards/{}", drop), &alice.token).await,
        StatusCode::NO_CONTENT
    );

    // The deleted board and everything under it is gone
    let (status, _) = app.get(&format!("/api/boards/{}", drop), &alice.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/api/cards?list_id={}", drop_list), &alice.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The other board is untouched
    let lists = assert_status!(
        app.get(&format!("/api/lists/board/{}", keep), &alice.token).await,
        StatusCode::OK
    );
    assert_eq!(lists.as_array().unwrap().len(), 1);
    let cards = assert_status!(
        app.get(&format!("/api/cards?list_id={}", keep_list), &bob.token).await,
        StatusCode::OK
    );
    let cards = cards.as_array().unwrap();
    assert_eq!(cards.len(), 2);
    for card in cards {
        let assignees = app
            .get(&format!("/api/cards/{}/members", id_of(card, "id")), &bob.token)
            .await
            .1;
        assert_eq!(assignees.as_array().unwrap().len(), 1);
    }

    let members = app.get(&format!("/api/boards/{}/members", keep), &bob.token).await.1;
    assert_eq!(members.as_array().unwrap().len(), 2);

    let visible = app.get("/api/boards", &bob.token).await.1;
    assert_eq!(visible.as_array().unwrap().len(), 1);
    assert_eq!(visible[0]["id"], keep.to_string());
}
