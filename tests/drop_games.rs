// Integration tests: Blum and Tomarket clients driven by the drop-game loop.

mod common;

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use tapbots::config::{DropGameSettings, Pacing};
use tapbots::drop_game::blum::BlumClient;
use tapbots::drop_game::tomarket::TomarketClient;
use tapbots::drop_game::{self, DropGameApi};
use tapbots::BotError;

#[derive(Clone)]
struct Server {
    passes: Arc<AtomicI64>,
    claims: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
    farming: Arc<AtomicI64>,
}

impl Server {
    fn new(passes: i64) -> Self {
        Self {
            passes: Arc::new(AtomicI64::new(passes)),
            claims: Arc::new(Mutex::new(Vec::new())),
            auth: Arc::new(Mutex::new(Vec::new())),
            farming: Arc::new(AtomicI64::new(0)),
        }
    }

    fn record_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.auth.lock().unwrap().push(auth);
    }

    fn claims(&self) -> Vec<Value> {
        self.claims.lock().unwrap().clone()
    }
}

fn settings(base: &str, farm: bool) -> DropGameSettings {
    let mut settings = DropGameSettings::new(base, "tok").unwrap();
    settings.farm = farm;
    settings.pacing = Pacing::immediate();
    settings
}

// ── Blum ─────────────────────────────────────────────────────────────

async fn blum_balance(State(s): State<Server>, headers: HeaderMap) -> Json<Value> {
    s.record_auth(&headers);
    Json(json!({
        "availableBalance": "1520.5",
        "playPasses": s.passes.load(Ordering::SeqCst),
        "timestamp": 1725278717
    }))
}

async fn blum_play(State(s): State<Server>) -> Json<Value> {
    let left = s.passes.fetch_sub(1, Ordering::SeqCst);
    Json(json!({ "gameId": format!("round-{left}") }))
}

async fn blum_claim(State(s): State<Server>, Json(body): Json<Value>) -> &'static str {
    s.claims.lock().unwrap().push(body);
    "OK"
}

async fn farming_start(State(s): State<Server>) -> Json<Value> {
    s.farming.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "startTime": 1725278717000u64, "endTime": 1725307517000u64 }))
}

async fn mock_blum(passes: i64) -> (String, Server) {
    let server = Server::new(passes);
    let app = Router::new()
        .route("/user/balance", get(blum_balance))
        .route("/game/play", post(blum_play))
        .route("/game/claim", post(blum_claim))
        .route("/farming/start", post(farming_start))
        .with_state(server.clone());
    let addr = common::spawn_server(app).await;
    (format!("http://{addr}"), server)
}

#[tokio::test]
async fn test_blum_plays_every_pass() {
    let (base, server) = mock_blum(2).await;
    let client = BlumClient::new(&base, "tok").unwrap();

    let rounds = drop_game::run(&client, &settings(&base, false)).await.unwrap();
    assert_eq!(rounds, 2);
    assert_eq!(server.farming.load(Ordering::SeqCst), 0);
    assert_eq!(
        server.claims(),
        vec![
            json!({"gameId": "round-2", "points": 280}),
            json!({"gameId": "round-1", "points": 280}),
        ]
    );
    assert!(server
        .auth
        .lock()
        .unwrap()
        .iter()
        .all(|a| a == "Bearer tok"));
}

#[tokio::test]
async fn test_blum_farming_without_passes() {
    let (base, server) = mock_blum(0).await;
    let client = BlumClient::new(&base, "tok").unwrap();

    let rounds = drop_game::run(&client, &settings(&base, true)).await.unwrap();
    assert_eq!(rounds, 0);
    assert_eq!(server.farming.load(Ordering::SeqCst), 1);
    assert!(server.claims().is_empty());
}

#[tokio::test]
async fn test_blum_balance_decodes_string_amount() {
    let (base, _) = mock_blum(3).await;
    let client = BlumClient::new(&base, "tok").unwrap();

    let balance = client.balance().await.unwrap();
    assert_eq!(balance.available_balance, json!("1520.5"));
    assert_eq!(balance.play_passes, 3);
}

#[tokio::test]
async fn test_blum_unknown_route_is_transport_error() {
    let (base, _) = mock_blum(1).await;
    let client = BlumClient::new(&format!("{base}/missing"), "tok").unwrap();

    let err = client.balance().await.unwrap_err();
    assert!(matches!(err, BotError::Transport(_)));
}

// ── Tomarket ─────────────────────────────────────────────────────────

async fn tomarket_balance(State(s): State<Server>, headers: HeaderMap) -> Json<Value> {
    s.record_auth(&headers);
    Json(json!({
        "status": 0,
        "message": "",
        "data": {
            "available_balance": 2200,
            "play_passes": s.passes.load(Ordering::SeqCst),
            "timestamp": 1725278717
        }
    }))
}

async fn tomarket_play(State(s): State<Server>, Json(body): Json<Value>) -> Json<Value> {
    s.claims.lock().unwrap().push(body);
    s.passes.fetch_sub(1, Ordering::SeqCst);
    Json(json!({
        "status": 0,
        "message": "",
        "data": { "round_id": "r-1", "stime": 1725278717, "etime": 1725278747 }
    }))
}

async fn tomarket_claim(State(s): State<Server>, Json(body): Json<Value>) -> String {
    s.claims.lock().unwrap().push(body);
    json!({"status": 0, "message": "", "data": {"points": 600}}).to_string()
}

async fn hidden_tasks() -> Json<Value> {
    Json(json!({
        "status": 0,
        "message": "",
        "data": [
            {"taskId": 1026, "status": 0, "code": "2,2,3,4", "score": 2500, "name": "Mystery"},
            {"taskId": 1027, "status": 3, "code": "1,1,1,1", "score": 500, "name": "Done"},
            {"taskId": 1028, "status": 0, "code": "4,3,2,1", "score": 1000, "name": "Another"}
        ]
    }))
}

async fn claim_task(State(s): State<Server>, Json(body): Json<Value>) -> String {
    s.claims.lock().unwrap().push(body);
    json!({"status": 0, "message": "", "data": "ok"}).to_string()
}

fn tomarket_game_id() -> &'static str {
    tapbots::drop_game::tomarket::DROP_GAME_ID
}

async fn mock_tomarket(passes: i64) -> (String, Server) {
    let server = Server::new(passes);
    let app = Router::new()
        .route("/user/balance", get(tomarket_balance))
        .route("/game/play", post(tomarket_play))
        .route("/game/claim", post(tomarket_claim))
        .route("/farming/start", post(farming_start))
        .route("/tasks/hidden", get(hidden_tasks))
        .route("/tasks/claim", post(claim_task))
        .with_state(server.clone());
    let addr = common::spawn_server(app).await;
    (format!("http://{addr}"), server)
}

#[tokio::test]
async fn test_tomarket_claims_against_game_id() {
    let (base, server) = mock_tomarket(1).await;
    let client = TomarketClient::new(&base, "raw-token").unwrap();

    let rounds = drop_game::run(&client, &settings(&base, true)).await.unwrap();
    assert_eq!(rounds, 1);
    assert_eq!(server.farming.load(Ordering::SeqCst), 1);
    assert_eq!(
        server.claims(),
        vec![
            json!({"game_id": tomarket_game_id()}),
            json!({"game_id": tomarket_game_id(), "points": 600}),
        ]
    );
    assert_eq!(server.auth.lock().unwrap()[0], "raw-token");
}

#[tokio::test]
async fn test_tomarket_claims_only_unfinished_hidden_tasks() {
    let (base, server) = mock_tomarket(0).await;
    let client = TomarketClient::new(&base, "raw-token").unwrap();

    let claimed = client.claim_hidden_tasks().await.unwrap();
    assert_eq!(claimed, 2);
    assert_eq!(
        server.claims(),
        vec![json!({"task_id": 1026}), json!({"task_id": 1028})]
    );
}

#[tokio::test]
async fn test_tomarket_error_status_is_game_error() {
    let app = Router::new().route(
        "/user/balance",
        get(|| async { Json(json!({"status": 401, "message": "token expired", "data": null})) }),
    );
    let addr = common::spawn_server(app).await;
    let client = TomarketClient::new(&format!("http://{addr}"), "raw-token").unwrap();

    let err = client.balance().await.unwrap_err();
    match err {
        BotError::Game(message) => assert_eq!(message, "token expired"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_tomarket_rejected_claim_is_game_error() {
    let server = Server::new(1);
    let app = Router::new()
        .route("/user/balance", get(tomarket_balance))
        .route("/game/play", post(tomarket_play))
        .route(
            "/game/claim",
            post(|| async {
                Json(json!({"status": 400, "message": "game not finished", "data": null}))
            }),
        )
        .with_state(server.clone());
    let addr = common::spawn_server(app).await;
    let base = format!("http://{addr}");
    let client = TomarketClient::new(&base, "raw-token").unwrap();

    let err = drop_game::run(&client, &settings(&base, false))
        .await
        .unwrap_err();
    match err {
        BotError::Game(message) => assert_eq!(message, "game not finished"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_tomarket_rejected_task_claim_stops() {
    let app = Router::new()
        .route("/tasks/hidden", get(hidden_tasks))
        .route(
            "/tasks/claim",
            post(|| async { Json(json!({"status": 500, "message": "invalid code"})) }),
        );
    let addr = common::spawn_server(app).await;
    let client = TomarketClient::new(&format!("http://{addr}"), "raw-token").unwrap();

    let err = client.claim_hidden_tasks().await.unwrap_err();
    assert!(matches!(err, BotError::Game(message) if message == "invalid code"));
}
