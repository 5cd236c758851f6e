// Wallet routes: the external on/off ramp for value held by the ledger

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::app_state::SharedState;
use crate::handlers::{api_error, ApiError};
use crate::models::{WalletAmountRequest, WalletResponse};

/// POST /wallets/:address/deposit
/// Credits value arriving from outside; creates the wallet on first deposit
pub async fn deposit(
    State(state): State<SharedState>,
    Path(address): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let balance = state.deposit(&address, request.amount).map_err(api_error)?;
    Ok(Json(WalletResponse { success: true, wallet_address: address, balance }))
}

/// POST /wallets/:address/withdraw
pub async fn withdraw(
    State(state): State<SharedState>,
    Path(address): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let balance = state.withdraw(&address, request.amount).map_err(api_error)?;
    Ok(Json(WalletResponse { success: true, wallet_address: address, balance }))
}

/// GET /wallets/:address
pub async fn get_wallet(
    State(state): State<SharedState>,
    Path(address): Path<String>,
) -> Json<Value> {
    let balance = state.balance(&address);
    let transactions = state.transactions_for(&address);
    Json(json!({
        "wallet_address": address,
        "balance": balance,
        "transactions": transactions,
    }))
}
