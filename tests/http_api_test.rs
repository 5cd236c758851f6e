/// HTTP API tests, driven in-process through the router
///
/// Each test builds its own state, so no server needs to be running.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use escrow_market::{router, AppState, Config, ManualClock};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "adm_integration_secret";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn app() -> Router {
    let config = Config {
        persist: false,
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Config::default()
    };
    let (state, _admin) = AppState::initialize(config, Arc::new(ManualClock::new(1_000)));
    router(Arc::new(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)));
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), None).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

async fn fund(app: &Router, who: &str, amount: u64) {
    let (status, _) = post(app, &format!("/wallets/{}/deposit", who), json!({ "amount": amount })).await;
    assert_eq!(status, StatusCode::OK);
}

async fn create(app: &Router, creator: &str) -> String {
    let (status, body) = post(app, "/markets", json!({ "name": "Will it rain?", "creator": creator })).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    body["market"]["id"].as_str().unwrap().to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Escrow Market - Online"));
}

#[tokio::test]
async fn test_create_market_returns_creator_cap() {
    let app = app();
    let (status, body) = post(&app, "/markets", json!({ "name": "Q", "creator": "0xA" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["market"]["status"], "open");
    assert_eq!(body["market"]["started_at"], 1_000);
    assert_eq!(body["creator_cap"]["market_id"], body["market"]["id"]);

    let (status, body) = post(&app, "/markets", json!({ "name": "Q2", "creator": "0xA" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DuplicateCreator");
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let app = app();
    fund(&app, "0xB", 1_000).await;
    fund(&app, "0xC", 1_000).await;
    let market_id = create(&app, "0xA").await;

    let (status, yes) = post(&app, &format!("/markets/{}/bets", market_id), json!({ "caller": "0xB", "side": true, "amount": 100 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(yes["new_balance"], 900);
    let (_, no) = post(&app, &format!("/markets/{}/bets", market_id), json!({ "caller": "0xC", "side": false, "amount": 50 })).await;

    let (status, details) = get(&app, &format!("/markets/{}/details", market_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["resolved"], false);
    assert_eq!(details["yes_pool"], 100);
    assert_eq!(details["no_pool"], 50);
    assert_eq!(details["resolution"], Value::Null);

    let resolve_uri = format!("/markets/{}/resolve", market_id);
    let (status, body) = send(&app, Method::POST, &resolve_uri, Some(json!({ "outcome": true })), Some(ADMIN_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["resolution"], true);

    let yes_id = yes["position"]["id"].as_str().unwrap();
    let (status, claim) = post(&app, &format!("/positions/{}/claim", yes_id), json!({ "caller": "0xB", "market_id": market_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claim["settlement"]["payout"], 100);
    assert_eq!(claim["new_balance"], 1_000);

    let no_id = no["position"]["id"].as_str().unwrap();
    let (_, claim) = post(&app, &format!("/positions/{}/claim", no_id), json!({ "caller": "0xC", "market_id": market_id })).await;
    assert_eq!(claim["settlement"]["payout"], 0);
    assert_eq!(claim["new_balance"], 950);

    let (status, body) = get(&app, &format!("/positions/{}", yes_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PositionNotFound");
}

#[tokio::test]
async fn test_resolve_without_or_with_wrong_token() {
    let app = app();
    let market_id = create(&app, "0xA").await;
    let uri = format!("/markets/{}/resolve", market_id);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "outcome": false })), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "NotAdmin");

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "outcome": false })), Some("adm_wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, details) = get(&app, &format!("/markets/{}/details", market_id)).await;
    assert_eq!(details["resolved"], false);

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "outcome": false })), Some(ADMIN_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "outcome": true })), Some(ADMIN_TOKEN)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "MarketAlreadyResolved");
}

#[tokio::test]
async fn test_claim_errors_over_http() {
    let app = app();
    fund(&app, "0xB", 200).await;
    let market_id = create(&app, "0xA").await;
    let (_, bet) = post(&app, &format!("/markets/{}/bets", market_id), json!({ "caller": "0xB", "side": true, "amount": 200 })).await;
    let claim_uri = format!("/positions/{}/claim", bet["position"]["id"].as_str().unwrap());

    let (status, body) = post(&app, &claim_uri, json!({ "caller": "0xB", "market_id": market_id })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "MarketNotResolved");

    send(&app, Method::POST, &format!("/markets/{}/resolve", market_id), Some(json!({ "outcome": true })), Some(ADMIN_TOKEN)).await;

    let (status, body) = post(&app, &claim_uri, json!({ "caller": "0xEVE", "market_id": market_id })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NotOwner");

    let (status, _) = post(&app, &claim_uri, json!({ "caller": "0xB", "market_id": market_id })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post(&app, &claim_uri, json!({ "caller": "0xB", "market_id": market_id })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PositionNotFound");
}

#[tokio::test]
async fn test_wallets_and_ledger() {
    let app = app();
    fund(&app, "0xB", 300).await;

    let (status, body) = post(&app, "/wallets/0xB/withdraw", json!({ "amount": 500 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InsufficientBalance");

    let (status, body) = post(&app, "/wallets/0xB/withdraw", json!({ "amount": 100 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 200);

    let (_, wallet) = get(&app, "/wallets/0xB").await;
    assert_eq!(wallet["balance"], 200);
    assert_eq!(wallet["transactions"].as_array().unwrap().len(), 2);

    let market_id = create(&app, "0xA").await;
    post(&app, &format!("/markets/{}/bets", market_id), json!({ "caller": "0xB", "side": false, "amount": 20 })).await;

    let (_, positions) = get(&app, "/owners/0xB/positions").await;
    assert_eq!(positions["count"], 1);

    let (status, ledger) = get(&app, "/ledger?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(ledger["stats"]["bet_volume"], 20);
    assert_eq!(ledger["creators"], json!(["0xA"]));
}

#[tokio::test]
async fn test_unknown_market() {
    let app = app();
    let missing = uuid::Uuid::new_v4();
    let (status, body) = get(&app, &format!("/markets/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "MarketNotFound");

    let (_, markets) = get(&app, "/markets").await;
    assert_eq!(markets["count"], 0);
}
