// ============================================================================
// Claim Settlement
// ============================================================================
//
// Settles one position against its resolved market:
//
//   backed the outcome  → stake paid back from that side's pool
//   backed the loser    → nothing paid
//
// Either way the position is destroyed, so a second claim finds nothing.
// All checks run before the pool or custody is touched.
//
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PositionSlot;
use crate::custody::Custody;
use crate::errors::{EscrowError, EscrowResult};
use crate::market_resolve::Market;

/// Outcome of a successful claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub position_id: Uuid,
    pub market_id: Uuid,
    pub owner: String,
    pub won: bool,
    pub payout: u64,
}

/// Settle the position in `slot` against `market` on behalf of `caller`
///
/// Caller must hold the slot and market locks together for the whole call.
pub fn claim_winnings<C: Custody>(
    slot: &mut PositionSlot,
    market: &mut Market,
    caller: &str,
    custody: &mut C,
) -> EscrowResult<Settlement> {
    let position = slot.get().ok_or(EscrowError::PositionNotFound(slot.id()))?;

    if position.market != market.id {
        return Err(EscrowError::PositionMarketMismatch {
            position: position.id,
            market: market.id,
        });
    }
    let outcome = market.resolution().ok_or(EscrowError::MarketNotResolved(market.id))?;
    if position.owner != caller {
        return Err(EscrowError::NotOwner {
            position: position.id,
            caller: caller.to_string(),
        });
    }

    let won = position.backs(outcome);
    let payout = if won { position.amount } else { 0 };

    if payout > 0 {
        custody
            .available(caller)
            .checked_add(payout)
            .ok_or(EscrowError::Overflow)?;
        let winnings = market.payout_from(position.bet, payout)?;
        custody.give(caller, winnings)?;
    }

    let settled = Settlement {
        position_id: position.id,
        market_id: market.id,
        owner: position.owner.clone(),
        won,
        payout,
    };
    slot.destroy();

    tracing::info!(
        position_id = %settled.position_id,
        market_id = %settled.market_id,
        owner = %settled.owner,
        won,
        payout,
        "position claimed"
    );
    Ok(settled)
}
