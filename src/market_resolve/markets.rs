use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AdminCap, CreatorCap};
use crate::custody::{Balance, Custody};
use crate::errors::{EscrowError, EscrowResult};
use crate::positions::Position;
use crate::registry::Registry;

/// Binary escrow market
///
/// Stakes on YES and NO accumulate in two separate pools. Resolution is a
/// one-way transition from `Open` to `Resolved`; after it the pools only
/// shrink, through winning claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier
    pub id: Uuid,

    /// Display name / question
    pub name: String,

    /// Identity that created the market
    pub creator: String,

    yes_pool: Balance,
    no_pool: Balance,

    /// Creation timestamp (ms)
    pub started_at: u64,

    /// Present exactly when the market is resolved
    resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: bool,
    pub resolved_at: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MarketStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "resolved")]
    Resolved,
}

/// Read-only snapshot returned by `get_market_details`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketDetails {
    pub resolved: bool,
    pub yes_pool: u64,
    pub no_pool: u64,
    pub resolution: Option<bool>,
}

/// Full public view of a market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketView {
    pub id: Uuid,
    pub name: String,
    pub creator: String,
    pub status: MarketStatus,
    pub yes_pool: u64,
    pub no_pool: u64,
    pub resolution: Option<bool>,
    pub started_at: u64,
    pub resolved_at: Option<u64>,
}

impl Market {
    /// Create a market for `creator`, registering them so they cannot create another
    pub fn create(
        name: String,
        creator: &str,
        now: u64,
        registry: &mut Registry,
    ) -> EscrowResult<(Market, CreatorCap)> {
        registry.register_creator(creator)?;

        let market = Market {
            id: Uuid::new_v4(),
            name,
            creator: creator.to_string(),
            yes_pool: Balance::zero(),
            no_pool: Balance::zero(),
            started_at: now,
            resolution: None,
        };
        let cap = CreatorCap::mint(market.id);

        tracing::info!(market_id = %market.id, creator, name = %market.name, "market created");
        Ok((market, cap))
    }

    /// Stake `amount` from `caller`'s custody on `side` (true = YES)
    ///
    /// Every check runs before value leaves custody, so a rejected bet moves
    /// nothing.
    pub fn place_bet<C: Custody>(
        &mut self,
        side: bool,
        amount: u64,
        caller: &str,
        custody: &mut C,
        now: u64,
    ) -> EscrowResult<Position> {
        if self.is_resolved() {
            return Err(EscrowError::MarketAlreadyResolved(self.id));
        }
        if amount == 0 {
            return Err(EscrowError::ZeroAmount);
        }
        self.pool(side).checked_add(amount).ok_or(EscrowError::Overflow)?;

        let stake = custody.take(caller, amount)?;
        let staked = stake.value();
        self.pool_mut(side).join(stake)?;

        let position = Position::new(caller.to_string(), self.id, side, staked, now);
        tracing::info!(
            market_id = %self.id,
            position_id = %position.id,
            caller,
            side = side_label(side),
            amount = staked,
            "bet placed"
        );
        Ok(position)
    }

    /// Record the final outcome. No value moves here; winners are paid on claim.
    pub fn resolve(
        &mut self,
        admin: &AdminCap,
        registry: &Registry,
        outcome: bool,
        now: u64,
    ) -> EscrowResult<()> {
        registry.verify_admin(admin)?;
        if self.is_resolved() {
            return Err(EscrowError::MarketAlreadyResolved(self.id));
        }

        self.resolution = Some(Resolution { outcome, resolved_at: now });
        tracing::info!(
            market_id = %self.id,
            outcome = side_label(outcome),
            yes_pool = self.yes_pool.value(),
            no_pool = self.no_pool.value(),
            "market resolved"
        );
        Ok(())
    }

    pub fn details(&self) -> MarketDetails {
        MarketDetails {
            resolved: self.is_resolved(),
            yes_pool: self.yes_pool.value(),
            no_pool: self.no_pool.value(),
            resolution: self.resolution(),
        }
    }

    pub fn view(&self) -> MarketView {
        MarketView {
            id: self.id,
            name: self.name.clone(),
            creator: self.creator.clone(),
            status: self.status(),
            yes_pool: self.yes_pool.value(),
            no_pool: self.no_pool.value(),
            resolution: self.resolution(),
            started_at: self.started_at,
            resolved_at: self.resolved_at(),
        }
    }

    pub fn status(&self) -> MarketStatus {
        if self.is_resolved() {
            MarketStatus::Resolved
        } else {
            MarketStatus::Open
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn resolution(&self) -> Option<bool> {
        self.resolution.map(|r| r.outcome)
    }

    pub fn resolved_at(&self) -> Option<u64> {
        self.resolution.map(|r| r.resolved_at)
    }

    /// Quantity currently held on `side`
    pub fn pool(&self, side: bool) -> u64 {
        if side {
            self.yes_pool.value()
        } else {
            self.no_pool.value()
        }
    }

    pub fn total_staked(&self) -> u64 {
        self.yes_pool.value().saturating_add(self.no_pool.value())
    }

    fn pool_mut(&mut self, side: bool) -> &mut Balance {
        if side {
            &mut self.yes_pool
        } else {
            &mut self.no_pool
        }
    }

    /// Split `amount` out of the pool for `side`
    pub(crate) fn payout_from(&mut self, side: bool, amount: u64) -> EscrowResult<Balance> {
        self.pool_mut(side).split(amount)
    }
}

pub fn side_label(side: bool) -> &'static str {
    if side {
        "YES"
    } else {
        "NO"
    }
}
