// ============================================================================
// Positions Module - Escrow Market
// ============================================================================
//
// A position is one staker's claim ticket against one market: which side
// they backed and how much value they actually deposited.
//
// Lifecycle:
//   place_bet ──▶ live position ──claim_winnings──▶ destroyed
//
// Winning positions are paid their stake back from their side's pool.
// Losing positions pay nothing and are destroyed the same way, so every
// position settles exactly once.
//
// ============================================================================

pub mod claim;

pub use claim::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of a single stake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,

    /// Identity allowed to claim
    pub owner: String,

    /// Market the stake sits in
    pub market: Uuid,

    /// Side backed: true = YES
    pub bet: bool,

    /// Quantity deposited when the bet was placed
    pub amount: u64,

    /// Placement timestamp (ms)
    pub placed_at: u64,
}

impl Position {
    pub(crate) fn new(owner: String, market: Uuid, bet: bool, amount: u64, placed_at: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            market,
            bet,
            amount,
            placed_at,
        }
    }

    /// Whether this position backed `outcome`
    pub fn backs(&self, outcome: bool) -> bool {
        self.bet == outcome
    }
}

/// Addressable home of a position. Emptied exactly once, when the position is claimed.
#[derive(Debug)]
pub struct PositionSlot {
    id: Uuid,
    live: Option<Position>,
}

impl PositionSlot {
    pub fn new(position: Position) -> Self {
        Self { id: position.id, live: Some(position) }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get(&self) -> Option<&Position> {
        self.live.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub(crate) fn destroy(&mut self) -> Option<Position> {
        self.live.take()
    }
}
