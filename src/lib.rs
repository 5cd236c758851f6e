/// Binary Escrow Market
/// Exports all modules for use as a library crate

pub mod app_state;
pub mod auth;
pub mod clock;
pub mod config;
pub mod custody;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod market_resolve;
pub mod models;
pub mod positions;
pub mod registry;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use auth::{AdminCap, CreatorCap};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use custody::{Balance, Custody};
pub use errors::{EscrowError, EscrowResult};
pub use ledger::{Endpoint, Ledger, LedgerStats, Transaction, TxType};
pub use market_resolve::{Market, MarketDetails, MarketStatus, MarketView, Resolution};
pub use positions::{claim_winnings, Position, PositionSlot, Settlement};
pub use registry::Registry;
pub use routes::router;
