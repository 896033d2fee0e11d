//! Integration tests for the move protocol over HTTP.
//!
//! Each test serves the app in-process on an ephemeral port.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chess_core::{Position, Side, STARTING_FEN};
use serde_json::{json, Value};
use server::selector::{MoveSelector, Selection, SelectorError};

const NO_FLAGS: &str = r#"{
    "check": false,
    "checkmate": false,
    "stalemate": false,
    "insufficient_material": false,
    "seventyfive_moves": false,
    "fivefold_repetition": false
}"#;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// POST /move and return the status code with the parsed body.
async fn post_move(server: &common::TestServer, body: Value) -> (u16, Value) {
    let resp = common::client()
        .post(server.url("/move"))
        .json(&body)
        .send()
        .await
        .expect("Failed to send move request");
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.expect("Response was not JSON");
    (status, body)
}

fn no_flags() -> Value {
    serde_json::from_str(NO_FLAGS).unwrap()
}

/// Always replies with the same move.
struct FixedSelector(&'static str);

#[async_trait]
impl MoveSelector for FixedSelector {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn choose(&self, _position: &Position) -> Result<Selection, SelectorError> {
        Ok(Selection::chosen(self.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let server = common::spawn().await;
    let resp = common::client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_new_game() {
    let server = common::spawn().await;
    let resp = common::client()
        .post(server.url("/new"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "fen": STARTING_FEN, "side": "w" }));
}

#[tokio::test]
async fn test_legal_client_move() {
    let server = common::spawn().await;
    let (status, data) = post_move(
        &server,
        json!({ "fen": STARTING_FEN, "side": "w", "client_move": "e2e4" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(data["status"], "ok");
    assert_eq!(data["applied_client_move"], true);
    assert_eq!(data["errors"], json!([]));
    assert_eq!(data["flags"], no_flags());
    assert_eq!(data["game_over"], false);

    // The client move hands the turn to black; the reply hands it back
    let after_client = Position::start().apply("e2e4").unwrap();
    assert_eq!(after_client.fen().split(' ').nth(1), Some("b"));

    let ai_move = data["ai_move"].as_str().expect("ai_move missing");
    assert!(after_client.is_legal(ai_move), "{ai_move}");
    let new_fen = data["new_fen"].as_str().unwrap();
    assert_eq!(new_fen, after_client.apply(ai_move).unwrap().fen());
    assert_eq!(new_fen.split(' ').nth(1), Some("w"));
}

#[tokio::test]
async fn test_illegal_client_move() {
    let server = common::spawn().await;
    let (status, data) = post_move(
        &server,
        json!({ "fen": STARTING_FEN, "side": "w", "client_move": "e2e5" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(data["status"], "error");
    assert_eq!(data["applied_client_move"], false);
    assert_eq!(data["errors"], json!(["illegal_client_move"]));
    assert_eq!(data["ai_move"], Value::Null);
    assert_eq!(data["new_fen"], STARTING_FEN);
    assert_eq!(data["flags"], no_flags());
}

#[tokio::test]
async fn test_invalid_fen() {
    let server = common::spawn().await;
    let (status, data) = post_move(&server, json!({ "fen": "invalid", "side": "w" })).await;

    assert_eq!(status, 200);
    assert_eq!(data["status"], "error");
    assert_eq!(data["errors"], json!(["invalid_fen"]));
    assert_eq!(data["new_fen"], "invalid");
    assert_eq!(data["flags"], no_flags());
}

#[tokio::test]
async fn test_side_to_move_mismatch() {
    let server = common::spawn().await;
    let (status, data) = post_move(&server, json!({ "fen": STARTING_FEN, "side": "b" })).await;

    assert_eq!(status, 200);
    assert_eq!(data["status"], "error");
    assert_eq!(data["errors"], json!(["side_to_move_mismatch"]));
    assert_eq!(data["new_fen"], STARTING_FEN);
    assert_eq!(data["flags"], no_flags());
}

#[tokio::test]
async fn test_client_move_completes_stalemate() {
    let server = common::spawn().await;
    let (status, data) = post_move(
        &server,
        json!({
            "fen": "k7/8/2K5/8/8/8/1Q6/8 w - - 0 1",
            "side": "w",
            "client_move": "b2b6",
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(data["applied_client_move"], true);
    assert_eq!(data["flags"]["stalemate"], true);
    assert_eq!(data["flags"]["check"], false);
    assert_eq!(data["errors"], json!(["no_legal_moves"]));
    assert_eq!(data["ai_move"], Value::Null);
    assert_eq!(data["game_over"], true);
}

#[tokio::test]
async fn test_impossible_position_is_invalid_fen() {
    // Black king on a8 attacked by the queen while white is to move
    let server = common::spawn().await;
    let (_, data) = post_move(
        &server,
        json!({
            "fen": "k7/1Q6/2K5/8/8/8/8/8 w - - 0 1",
            "side": "w",
            "client_move": "b7c7",
        }),
    )
    .await;

    assert_eq!(data["errors"], json!(["invalid_fen"]));
    assert_eq!(data["applied_client_move"], false);
}

#[tokio::test]
async fn test_checkmate_by_reply_sets_flags() {
    let server = common::spawn_with(Arc::new(FixedSelector("d8h4"))).await;
    let fen = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2";
    let (status, data) = post_move(&server, json!({ "fen": fen, "side": "b" })).await;

    assert_eq!(status, 200);
    assert_eq!(data["status"], "ok");
    assert_eq!(data["applied_client_move"], false);
    assert_eq!(data["ai_move"], "d8h4");
    assert_eq!(data["flags"]["check"], true);
    assert_eq!(data["flags"]["checkmate"], true);
    assert_eq!(data["errors"], json!([]));
    assert_eq!(data["game_over"], true);
}

#[tokio::test]
async fn test_game_replays_returned_fen() {
    let server = common::spawn().await;
    let mut fen = STARTING_FEN.to_string();

    // Play the first legal move for white each turn and feed back the FEN
    for _ in 0..10 {
        let position = Position::parse(&fen).unwrap();
        assert_eq!(position.side_to_move(), Side::White);
        let client_move = position.legal_moves()[0].clone();

        let (_, data) = post_move(
            &server,
            json!({ "fen": fen, "side": "w", "client_move": client_move }),
        )
        .await;
        assert_eq!(data["applied_client_move"], true, "{data}");
        if data["game_over"] == true {
            return;
        }
        assert_eq!(data["status"], "ok");
        fen = data["new_fen"].as_str().unwrap().to_string();
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = common::spawn().await;
    let resp = common::client()
        .post(server.url("/move"))
        .header("content-type", "application/json")
        .body("{\"fen\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());

    // Unknown side value
    let (status, body) = post_move(&server, json!({ "fen": STARTING_FEN, "side": "white" })).await;
    assert_eq!(status, 400);
    assert!(body["detail"].is_string());
}
