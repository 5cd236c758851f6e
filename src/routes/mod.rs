// Route table for the escrow market API

pub mod wallets;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::SharedState;
use crate::handlers::*;

pub fn router(state: SharedState) -> Router {
    Router::new()
        // ===== MARKETS =====
        .route("/markets", get(get_markets).post(create_market))
        .route("/markets/:id", get(get_market))
        .route("/markets/:id/details", get(get_market_details))
        .route("/markets/:id/bets", post(place_bet))
        .route("/markets/:id/resolve", post(resolve_market))
        // ===== POSITIONS =====
        .route("/positions/:id", get(get_position))
        .route("/positions/:id/claim", post(claim_winnings))
        .route("/owners/:owner/positions", get(get_owner_positions))
        // ===== WALLETS =====
        .route("/wallets/:address", get(wallets::get_wallet))
        .route("/wallets/:address/deposit", post(wallets::deposit))
        .route("/wallets/:address/withdraw", post(wallets::withdraw))
        // ===== LEDGER =====
        .route("/ledger", get(get_ledger_activity))
        // ===== HEALTH CHECK =====
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
