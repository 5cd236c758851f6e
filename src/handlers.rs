// HTTP request handlers for the escrow market API

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app_state::SharedState;
use crate::auth::AdminCap;
use crate::errors::EscrowError;
use crate::models::*;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(err: EscrowError) -> ApiError {
    tracing::warn!(code = err.code(), "request rejected: {}", err);
    (
        err.status_code(),
        Json(ErrorResponse { success: false, error: err.to_string(), code: err.code() }),
    )
}

/// Admin credential from `Authorization: Bearer <token>`
fn bearer_admin(headers: &HeaderMap) -> Result<AdminCap, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| AdminCap::from_bearer(token.trim()))
        .ok_or_else(|| api_error(EscrowError::NotAdmin))
}

// ===== HEALTH =====

pub async fn health_check() -> &'static str {
    "Escrow Market - Online"
}

// ===== MARKETS =====

/// POST /markets
pub async fn create_market(
    State(state): State<SharedState>,
    Json(request): Json<CreateMarketRequest>,
) -> Result<Json<CreateMarketResponse>, ApiError> {
    let (market, cap) = state.create_market(request.name, &request.creator).map_err(api_error)?;

    Ok(Json(CreateMarketResponse {
        success: true,
        creator_cap: CreatorCapInfo { id: cap.id(), market_id: cap.market_id() },
        market,
    }))
}

/// GET /markets
pub async fn get_markets(State(state): State<SharedState>) -> Json<Value> {
    let markets = state.markets();
    Json(json!({
        "count": markets.len(),
        "markets": markets,
    }))
}

/// GET /markets/:id
pub async fn get_market(
    State(state): State<SharedState>,
    Path(market_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let market = state.market(market_id).map_err(api_error)?;
    Ok(Json(json!(market)))
}

/// GET /markets/:id/details
pub async fn get_market_details(
    State(state): State<SharedState>,
    Path(market_id): Path<Uuid>,
) -> Result<Json<MarketDetailsResponse>, ApiError> {
    let details = state.get_market_details(market_id).map_err(api_error)?;
    Ok(Json(MarketDetailsResponse { market_id, details }))
}

/// POST /markets/:id/bets
pub async fn place_bet(
    State(state): State<SharedState>,
    Path(market_id): Path<Uuid>,
    Json(request): Json<PlaceBetRequest>,
) -> Result<Json<PlaceBetResponse>, ApiError> {
    let position = state
        .place_bet(market_id, request.side, request.amount, &request.caller)
        .map_err(api_error)?;

    Ok(Json(PlaceBetResponse {
        success: true,
        new_balance: state.balance(&request.caller),
        position,
    }))
}

/// POST /markets/:id/resolve
pub async fn resolve_market(
    State(state): State<SharedState>,
    Path(market_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<ResolveMarketRequest>,
) -> Result<Json<ResolveMarketResponse>, ApiError> {
    let admin = bearer_admin(&headers)?;
    let details = state
        .resolve_market(&admin, market_id, request.outcome)
        .map_err(api_error)?;

    Ok(Json(ResolveMarketResponse { success: true, market_id, details }))
}

// ===== POSITIONS =====

/// GET /positions/:id
pub async fn get_position(
    State(state): State<SharedState>,
    Path(position_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let position = state.position(position_id).map_err(api_error)?;
    Ok(Json(json!(position)))
}

/// GET /owners/:owner/positions
pub async fn get_owner_positions(
    State(state): State<SharedState>,
    Path(owner): Path<String>,
) -> Json<Value> {
    let positions = state.positions_of(&owner);
    Json(json!({
        "owner": owner,
        "count": positions.len(),
        "positions": positions,
    }))
}

/// POST /positions/:id/claim
pub async fn claim_winnings(
    State(state): State<SharedState>,
    Path(position_id): Path<Uuid>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let settlement = state
        .claim_winnings(position_id, request.market_id, &request.caller)
        .map_err(api_error)?;

    Ok(Json(ClaimResponse {
        success: true,
        new_balance: state.balance(&request.caller),
        settlement,
    }))
}

// ===== LEDGER =====

/// GET /ledger?limit=N
pub async fn get_ledger_activity(
    State(state): State<SharedState>,
    Query(query): Query<LedgerQuery>,
) -> Json<Value> {
    let transactions = state.recent_transactions(query.limit.unwrap_or(50));
    Json(json!({
        "stats": state.ledger_stats(),
        "creators": state.creators(),
        "transactions": transactions,
    }))
}
