//! Live WebSocket tests
//!
//! The router is served on an ephemeral port and driven with a real
//! tokio-tungstenite client.

#[macro_use]
mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use common::{id_of, register_user, TestApp};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn serve(app: &TestApp) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn open(addr: SocketAddr, board_id: Uuid, token: Option<&str>) -> Client {
    let url = match token {
        Some(token) => format!("ws://{}/api/ws/boards/{}?token={}", addr, board_id, token),
        None => format!("ws://{}/api/ws/boards/{}", addr, board_id),
    };
    let (client, _) = connect_async(url).await.unwrap();
    client
}

async fn next_message(client: &mut Client) -> Message {
    tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended")
        .expect("websocket error")
}

async fn next_event(client: &mut Client) -> Value {
    match next_message(client).await {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

async fn expect_policy_close(client: &mut Client) {
    match next_message(client).await {
        Message::Close(Some(frame)) => assert_eq!(frame.code, CloseCode::Policy),
        other => panic!("expected a policy close, got {:?}", other),
    }
}

#[tokio::test]
async fn test_member_receives_ack_then_board_events() {
    let app = TestApp::new();
    let alice = register_user(&app, "alice").await;
    let board_id = id_of(&app.post("/api/boards", &alice.token, json!({ "title": "Live" })).await.1, "id");
    let addr = serve(&app).await;

    let mut client = open(addr, board_id, Some(&alice.token)).await;
    let ack = next_event(&mut client).await;
    assert_eq!(
        ack,
        json!({
            "type": "ws.connected",
            "payload": { "board_id": board_id, "user_id": alice.id }
        })
    );
    assert_eq!(app.state.registry().connection_count(board_id), 1);

    let list = assert_status!(
        app.post(&format!("/api/lists?board_id={}", board_id), &alice.token, json!({ "title": "Todo" }))
            .await,
        axum::http::StatusCode::CREATED
    );
    let event = next_event(&mut client).await;
    assert_eq!(event["type"], "list.created");
    assert_eq!(event["payload"]["list"], list);

    client.close(None).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while app.state.registry().connection_count(board_id) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection was not unregistered");
    assert_eq!(app.state.registry().board_count(), 0);
}

#[tokio::test]
async fn test_handshake_refusals_close_with_policy_code() {
    let app = TestApp::new();
    let alice = register_user(&app, "alice").await;
    let mallory = register_user(&app, "mallory").await;
    let board_id = id_of(&app.post("/api/boards", &alice.token, json!({ "title": "Private" })).await.1, "id");
    let addr = serve(&app).await;

    let mut missing = open(addr, board_id, None).await;
    expect_policy_close(&mut missing).await;

    let mut garbage = open(addr, board_id, Some("not-a-token")).await;
    expect_policy_close(&mut garbage).await;

    let mut outsider = open(addr, board_id, Some(&mallory.token)).await;
    expect_policy_close(&mut outsider).await;

    let mut unknown_board = open(addr, Uuid::new_v4(), Some(&alice.token)).await;
    expect_policy_close(&mut unknown_board).await;

    assert_eq!(app.state.registry().board_count(), 0);
}
