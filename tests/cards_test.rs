//! Card and card assignment integration tests

#[macro_use]
mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use kanban::shared::MAX_POSITION;

use common::{id_of, register_user, TestApp, TestUser};

struct Fixture {
    app: TestApp,
    owner: TestUser,
    board_id: Uuid,
    todo: Uuid,
    done: Uuid,
}

async fn fixture() -> Fixture {
    let app = TestApp::new();
    let owner = register_user(&app, "owner").await;
    let board = app.post("/api/boards", &owner.token, json!({ "title": "Cards" })).await.1;
    let board_id = id_of(&board, "id");
    let mut lists = Vec::new();
    for title in ["Todo", "Done"] {
        let list = app
            .post(&format!("/api/lists?board_id={}", board_id), &owner.token, json!({ "title": title }))
            .await
            .1;
        lists.push(id_of(&list, "id"));
    }
    Fixture {
        app,
        owner,
        board_id,
        todo: lists[0],
        done: lists[1],
    }
}

async fn create_card(fx: &Fixture, list_id: Uuid, title: &str) -> Value {
    assert_status!(
        fx.app
            .post(&format!("/api/cards?list_id={}", list_id), &fx.owner.token, json!({ "title": title }))
            .await,
        StatusCode::CREATED
    )
}

#[tokio::test]
async fn test_card_crud() {
    let fx = fixture().await;

    let first = create_card(&fx, fx.todo, "Write docs").await;
    let second = create_card(&fx, fx.todo, "Ship").await;
    assert_eq!(first["position"], 0);
    assert_eq!(second["position"], 1);
    assert_eq!(first["creator_id"], fx.owner.id.to_string());
    assert_eq!(first["label_ids"], json!([]));

    let card_uri = format!("/api/cards/{}", id_of(&first, "id"));
    let updated = assert_status!(
        fx.app
            .put(
                &card_uri,
                &fx.owner.token,
                json!({ "description": "in the README", "label_ids": [1, 3] }),
            )
            .await,
        StatusCode::OK
    );
    assert_eq!(updated["title"], "Write docs");
    assert_eq!(updated["description"], "in the README");
    assert_eq!(updated["label_ids"], json!([1, 3]));

    let fetched = assert_status!(fx.app.get(&card_uri, &fx.owner.token).await, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, _) = fx.app.delete(&card_uri, &fx.owner.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = fx.app.get(&card_uri, &fx.owner.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = fx
        .app
        .get(&format!("/api/cards?list_id={}", fx.todo), &fx.owner.token)
        .await
        .1;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_move_appends_to_target_list() {
    let fx = fixture().await;
    create_card(&fx, fx.done, "Already done").await;
    let card = create_card(&fx, fx.todo, "Moving").await;

    let moved = assert_status!(
        fx.app
            .put(
                &format!("/api/cards/{}", id_of(&card, "id")),
                &fx.owner.token,
                json!({ "list_id": fx.done }),
            )
            .await,
        StatusCode::OK
    );
    assert_eq!(moved["list_id"], fx.done.to_string());
    assert_eq!(moved["position"], 1);

    let done = fx
        .app
        .get(&format!("/api/cards?list_id={}", fx.done), &fx.owner.token)
        .await
        .1;
    let titles: Vec<&str> = done.as_array().unwrap().iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Already done", "Moving"]);
}

#[tokio::test]
async fn test_move_target_must_exist_on_same_board() {
    let fx = fixture().await;
    let card = create_card(&fx, fx.todo, "Stay").await;
    let card_uri = format!("/api/cards/{}", id_of(&card, "id"));

    let (status, _) = fx
        .app
        .put(&card_uri, &fx.owner.token, json!({ "list_id": Uuid::new_v4() }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let other = fx.app.post("/api/boards", &fx.owner.token, json!({ "title": "Other" })).await.1;
    let foreign_list = fx
        .app
        .post(
            &format!("/api/lists?board_id={}", id_of(&other, "id")),
            &fx.owner.token,
            json!({ "title": "Elsewhere" }),
        )
        .await
        .1;
    assert_error!(
        fx.app
            .put(&card_uri, &fx.owner.token, json!({ "list_id": id_of(&foreign_list, "id") }))
            .await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "list_id"
    );

    let unchanged = fx.app.get(&card_uri, &fx.owner.token).await.1;
    assert_eq!(unchanged["list_id"], fx.todo.to_string());
}

#[tokio::test]
async fn test_non_member_cannot_touch_cards() {
    let fx = fixture().await;
    let outsider = register_user(&fx.app, "outsider").await;
    let card = create_card(&fx, fx.todo, "Private").await;
    let card_uri = format!("/api/cards/{}", id_of(&card, "id"));

    let (status, _) = fx.app.get(&card_uri, &outsider.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = fx.app.put(&card_uri, &outsider.token, json!({ "title": "Mine" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = fx
        .app
        .post(&format!("/api/cards?list_id={}", fx.todo), &outsider.token, json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = fx
        .app
        .post(&format!("/api/cards?list_id={}", Uuid::new_v4()), &outsider.token, json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_card_assignment_rules() {
    let fx = fixture().await;
    let member = register_user(&fx.app, "member").await;
    let outsider = register_user(&fx.app, "outsider").await;
    fx.app
        .post(
            &format!("/api/boards/{}/members", fx.board_id),
            &fx.owner.token,
            json!({ "email": member.email }),
        )
        .await;

    let card = create_card(&fx, fx.todo, "Assign me").await;
    let members_uri = format!("/api/cards/{}/members", id_of(&card, "id"));

    assert_error!(
        fx.app.post(&members_uri, &fx.owner.token, json!({ "email": outsider.email })).await,
        StatusCode::FORBIDDEN,
        "target is not a board member"
    );

    let assigned = assert_status!(
        fx.app.post(&members_uri, &member.token, json!({ "email": member.email })).await,
        StatusCode::CREATED
    );
    assert_eq!(assigned["user_id"], member.id.to_string());

    let (status, _) = fx.app.post(&members_uri, &fx.owner.token, json!({ "email": member.email })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let listed = fx.app.get(&members_uri, &fx.owner.token).await.1;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = fx
        .app
        .delete_with(&members_uri, &fx.owner.token, json!({ "email": member.email }))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = fx
        .app
        .delete_with(&members_uri, &fx.owner.token, json!({ "email": member.email }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assignment_survives_member_removal() {
    let fx = fixture().await;
    let member = register_user(&fx.app, "member").await;
    let board_members = format!("/api/boards/{}/members", fx.board_id);
    fx.app.post(&board_members, &fx.owner.token, json!({ "email": member.email })).await;

    let card = create_card(&fx, fx.todo, "Sticky").await;
    let members_uri = format!("/api/cards/{}/members", id_of(&card, "id"));
    fx.app.post(&members_uri, &fx.owner.token, json!({ "email": member.email })).await;

    fx.app
        .delete_with(&board_members, &fx.owner.token, json!({ "email": member.email }))
        .await;

    let listed = assert_status!(fx.app.get(&members_uri, &fx.owner.token).await, StatusCode::OK);
    assert_eq!(listed[0]["user_id"], member.id.to_string());
}

#[tokio::test]
async fn test_card_positions_stay_bounded() {
    let fx = fixture().await;
    let last = create_card(&fx, fx.done, "Last").await;
    let moving = create_card(&fx, fx.todo, "Moving").await;
    let last_uri = format!("/api/cards/{}", id_of(&last, "id"));
    let moving_uri = format!("/api/cards/{}", id_of(&moving, "id"));

    assert_error!(
        fx.app.put(&last_uri, &fx.owner.token, json!({ "position": i32::MAX })).await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "position"
    );
    assert_status!(
        fx.app.put(&last_uri, &fx.owner.token, json!({ "position": MAX_POSITION })).await,
        StatusCode::OK
    );

    assert_error!(
        fx.app
            .post(&format!("/api/cards?list_id={}", fx.done), &fx.owner.token, json!({ "title": "Overflow" }))
            .await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "position"
    );
    assert_error!(
        fx.app.put(&moving_uri, &fx.owner.token, json!({ "list_id": fx.done })).await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "position"
    );
    let unmoved = assert_status!(fx.app.get(&moving_uri, &fx.owner.token).await, StatusCode::OK);
    assert_eq!(unmoved["list_id"], fx.todo.to_string());

    let placed = assert_status!(
        fx.app
            .put(&moving_uri, &fx.owner.token, json!({ "list_id": fx.done, "position": 0 }))
            .await,
        StatusCode::OK
    );
    assert_eq!(placed["list_id"], fx.done.to_string());
    assert_eq!(placed["position"], 0);
}
