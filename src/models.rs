// Request/response bodies for the escrow market API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::market_resolve::{MarketDetails, MarketView};
use crate::positions::{Position, Settlement};

#[derive(Debug, Deserialize)]
pub struct CreateMarketRequest {
    pub name: String,
    /// Creator identity (wallet address)
    pub creator: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatorCapInfo {
    pub id: Uuid,
    pub market_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreateMarketResponse {
    pub success: bool,
    pub market: MarketView,
    pub creator_cap: CreatorCapInfo,
}

#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    pub caller: String,
    /// true = YES, false = NO
    pub side: bool,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct PlaceBetResponse {
    pub success: bool,
    pub position: Position,
    pub new_balance: u64,
}

#[derive(Debug, Deserialize)]
pub struct ResolveMarketRequest {
    pub outcome: bool,
}

#[derive(Debug, Serialize)]
pub struct ResolveMarketResponse {
    pub success: bool,
    pub market_id: Uuid,
    pub details: MarketDetails,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub caller: String,
    pub market_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub settlement: Settlement,
    pub new_balance: u64,
}

#[derive(Debug, Serialize)]
pub struct MarketDetailsResponse {
    pub market_id: Uuid,
    #[serde(flatten)]
    pub details: MarketDetails,
}

#[derive(Debug, Deserialize)]
pub struct WalletAmountRequest {
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub success: bool,
    pub wallet_address: String,
    pub balance: u64,
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}
