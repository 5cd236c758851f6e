// Error taxonomy for the escrow market
//
// Every variant is a precondition violation detected before any state is
// touched, so a failed call leaves registry, markets, positions and wallets
// exactly as they were.

use axum::http::StatusCode;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// The identity has already created its one market
    DuplicateCreator(String),
    MarketAlreadyResolved(Uuid),
    MarketNotResolved(Uuid),
    NotOwner { position: Uuid, caller: String },
    NotAdmin,
    InsufficientBalance { available: u64, requested: u64 },
    MarketNotFound(Uuid),
    /// Unknown id, or the position was already claimed and destroyed
    PositionNotFound(Uuid),
    PositionMarketMismatch { position: Uuid, market: Uuid },
    ZeroAmount,
    AccountNotFound(String),
    Overflow,
    Persistence(String),
}

impl EscrowError {
    /// Stable machine-readable code surfaced to API callers
    pub fn code(&self) -> &'static str {
        match self {
            EscrowError::DuplicateCreator(_) => "DuplicateCreator",
            EscrowError::MarketAlreadyResolved(_) => "MarketAlreadyResolved",
            EscrowError::MarketNotResolved(_) => "MarketNotResolved",
            EscrowError::NotOwner { .. } => "NotOwner",
            EscrowError::NotAdmin => "NotAdmin",
            EscrowError::InsufficientBalance { .. } => "InsufficientBalance",
            EscrowError::MarketNotFound(_) => "MarketNotFound",
            EscrowError::PositionNotFound(_) => "PositionNotFound",
            EscrowError::PositionMarketMismatch { .. } => "PositionMarketMismatch",
            EscrowError::ZeroAmount => "ZeroAmount",
            EscrowError::AccountNotFound(_) => "AccountNotFound",
            EscrowError::Overflow => "Overflow",
            EscrowError::Persistence(_) => "Persistence",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EscrowError::NotAdmin => StatusCode::UNAUTHORIZED,
            EscrowError::NotOwner { .. } => StatusCode::FORBIDDEN,
            EscrowError::MarketNotFound(_)
            | EscrowError::PositionNotFound(_)
            | EscrowError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            EscrowError::DuplicateCreator(_)
            | EscrowError::MarketAlreadyResolved(_)
            | EscrowError::MarketNotResolved(_) => StatusCode::CONFLICT,
            EscrowError::InsufficientBalance { .. }
            | EscrowError::PositionMarketMismatch { .. }
            | EscrowError::ZeroAmount
            | EscrowError::Overflow => StatusCode::BAD_REQUEST,
            EscrowError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for EscrowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscrowError::DuplicateCreator(who) => write!(f, "Creator {} already has a market", who),
            EscrowError::MarketAlreadyResolved(id) => write!(f, "Market {} is already resolved", id),
            EscrowError::MarketNotResolved(id) => write!(f, "Market {} is not resolved yet", id),
            EscrowError::NotOwner { position, caller } => {
                write!(f, "{} does not own position {}", caller, position)
            }
            EscrowError::NotAdmin => write!(f, "Caller does not hold admin authority"),
            EscrowError::InsufficientBalance { available, requested } => {
                write!(f, "Insufficient balance: have {}, need {}", available, requested)
            }
            EscrowError::MarketNotFound(id) => write!(f, "Market not found: {}", id),
            EscrowError::PositionNotFound(id) => write!(f, "Position not found: {}", id),
            EscrowError::PositionMarketMismatch { position, market } => {
                write!(f, "Position {} was not placed on market {}", position, market)
            }
            EscrowError::ZeroAmount => write!(f, "Amount must be greater than zero"),
            EscrowError::AccountNotFound(who) => write!(f, "Account not found: {}", who),
            EscrowError::Overflow => write!(f, "Arithmetic overflow"),
            EscrowError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
        }
    }
}

impl std::error::Error for EscrowError {}

pub type EscrowResult<T> = Result<T, EscrowError>;
