// Application state: the shared entity store behind every boundary operation
//
// Each market and each position sits behind its own mutex, so operations on
// different entities never contend. The id → entity maps are only locked long
// enough to look up or insert an `Arc`.
//
// Lock order (never acquire against it):
//   registry → market → position → ledger → entity maps

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AdminCap, CreatorCap};
use crate::clock::Clock;
use crate::config::Config;
use crate::errors::{EscrowError, EscrowResult};
use crate::ledger::{Ledger, LedgerStats, Transaction};
use crate::market_resolve::{Market, MarketDetails, MarketView};
use crate::positions::{claim_winnings, Position, PositionSlot, Settlement};
use crate::registry::Registry;

pub type SharedState = Arc<AppState>;
pub type SharedMarket = Arc<Mutex<Market>>;
pub type SharedPosition = Arc<Mutex<PositionSlot>>;

pub struct AppState {
    pub config: Config,
    clock: Arc<dyn Clock>,
    registry: Mutex<Registry>,
    markets: RwLock<HashMap<Uuid, SharedMarket>>,
    positions: RwLock<HashMap<Uuid, SharedPosition>>,
    ledger: Mutex<Ledger>,
}

/// On-disk form of the whole store
#[derive(Deserialize)]
struct Snapshot {
    registry: Registry,
    markets: Vec<Market>,
    positions: Vec<Position>,
    ledger: Ledger,
}

// A panicking writer never leaves an entity half-updated (all checks run
// before mutation), so a poisoned lock is still safe to use.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    /// Fresh deployment: empty registry plus the one admin credential
    pub fn initialize(config: Config, clock: Arc<dyn Clock>) -> (Self, AdminCap) {
        let (registry, admin) = match config.admin_token.as_deref() {
            Some(secret) => Registry::initialize_with_secret(secret),
            None => Registry::initialize(),
        };
        let state = Self {
            config,
            clock,
            registry: Mutex::new(registry),
            markets: RwLock::new(HashMap::new()),
            positions: RwLock::new(HashMap::new()),
            ledger: Mutex::new(Ledger::new()),
        };
        (state, admin)
    }

    /// Resume from the snapshot at `config.state_path` when persistence is on
    /// and one exists; otherwise initialize. Only a fresh deployment yields an
    /// admin credential.
    pub fn boot(config: Config, clock: Arc<dyn Clock>) -> EscrowResult<(Self, Option<AdminCap>)> {
        if config.persist && config.state_path.exists() {
            if config.admin_token.is_some() {
                tracing::warn!(
                    path = %config.state_path.display(),
                    "ESCROW_ADMIN_TOKEN ignored: resuming a deployment keeps its original admin credential"
                );
            }
            let state = Self::load_from_disk(config, clock)?;
            return Ok((state, None));
        }
        let (state, admin) = Self::initialize(config, clock);
        Ok((state, Some(admin)))
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    fn shared_market(&self, id: Uuid) -> EscrowResult<SharedMarket> {
        read(&self.markets).get(&id).cloned().ok_or(EscrowError::MarketNotFound(id))
    }

    fn shared_position(&self, id: Uuid) -> EscrowResult<SharedPosition> {
        read(&self.positions).get(&id).cloned().ok_or(EscrowError::PositionNotFound(id))
    }

    // ===== BOUNDARY OPERATIONS =====

    pub fn create_market(&self, name: String, creator: &str) -> EscrowResult<(MarketView, CreatorCap)> {
        let now = self.now();
        let (view, cap) = {
            let mut registry = lock(&self.registry);
            let (market, cap) = Market::create(name, creator, now, &mut registry)?;
            let view = market.view();
            write(&self.markets).insert(market.id, Arc::new(Mutex::new(market)));
            (view, cap)
        };
        lock(&self.ledger).record(Transaction::market_created(creator, view.id, now));
        Ok((view, cap))
    }

    pub fn place_bet(&self, market_id: Uuid, side: bool, amount: u64, caller: &str) -> EscrowResult<Position> {
        let shared = self.shared_market(market_id)?;
        let now = self.now();

        let mut market = lock(&shared);
        let position = {
            let mut ledger = lock(&self.ledger);
            let position = market.place_bet(side, amount, caller, &mut *ledger, now)?;
            ledger.record(Transaction::bet(caller, market_id, position.id, position.amount, now));
            position
        };
        // Published before the market unlocks, so pool and position appear together
        write(&self.positions).insert(position.id, Arc::new(Mutex::new(PositionSlot::new(position.clone()))));
        drop(market);

        Ok(position)
    }

    pub fn resolve_market(&self, admin: &AdminCap, market_id: Uuid, outcome: bool) -> EscrowResult<MarketDetails> {
        let shared = self.shared_market(market_id)?;
        let now = self.now();

        let details = {
            let registry = lock(&self.registry);
            let mut market = lock(&shared);
            market.resolve(admin, &registry, outcome, now)?;
            market.details()
        };
        lock(&self.ledger).record(Transaction::market_resolved(market_id, now));
        Ok(details)
    }

    pub fn claim_winnings(&self, position_id: Uuid, market_id: Uuid, caller: &str) -> EscrowResult<Settlement> {
        let slot = self.shared_position(position_id)?;
        let shared = self.shared_market(market_id)?;
        let now = self.now();

        let mut market = lock(&shared);
        let mut slot = lock(&slot);
        let settlement = {
            let mut ledger = lock(&self.ledger);
            let settlement = claim_winnings(&mut slot, &mut market, caller, &mut *ledger)?;
            if settlement.payout > 0 {
                ledger.record(Transaction::payout(caller, market_id, position_id, settlement.payout, now));
            }
            settlement
        };
        write(&self.positions).remove(&position_id);

        Ok(settlement)
    }

    pub fn get_market_details(&self, market_id: Uuid) -> EscrowResult<MarketDetails> {
        let shared = self.shared_market(market_id)?;
        let details = lock(&shared).details();
        Ok(details)
    }

    // ===== QUERIES =====

    pub fn market(&self, market_id: Uuid) -> EscrowResult<MarketView> {
        let shared = self.shared_market(market_id)?;
        let view = lock(&shared).view();
        Ok(view)
    }

    pub fn markets(&self) -> Vec<MarketView> {
        let shared: Vec<SharedMarket> = read(&self.markets).values().cloned().collect();
        let mut views: Vec<MarketView> = shared.iter().map(|m| lock(m).view()).collect();
        views.sort_by_key(|m| (m.started_at, m.id));
        views
    }

    pub fn position(&self, position_id: Uuid) -> EscrowResult<Position> {
        let slot = self.shared_position(position_id)?;
        let position = lock(&slot).get().cloned();
        position.ok_or(EscrowError::PositionNotFound(position_id))
    }

    pub fn positions_of(&self, owner: &str) -> Vec<Position> {
        let slots: Vec<SharedPosition> = read(&self.positions).values().cloned().collect();
        let mut owned: Vec<Position> = slots
            .iter()
            .filter_map(|s| lock(s).get().filter(|p| p.owner == owner).cloned())
            .collect();
        owned.sort_by_key(|p| (p.placed_at, p.id));
        owned
    }

    pub fn creators(&self) -> Vec<String> {
        lock(&self.registry).creators().to_vec()
    }

    // ===== WALLETS =====

    pub fn deposit(&self, owner: &str, amount: u64) -> EscrowResult<u64> {
        let now = self.now();
        lock(&self.ledger).deposit(owner, amount, now)
    }

    pub fn withdraw(&self, owner: &str, amount: u64) -> EscrowResult<u64> {
        let now = self.now();
        lock(&self.ledger).withdraw(owner, amount, now)
    }

    pub fn balance(&self, owner: &str) -> u64 {
        lock(&self.ledger).balance(owner)
    }

    pub fn recent_transactions(&self, limit: usize) -> Vec<Transaction> {
        lock(&self.ledger).recent_transactions(limit).into_iter().cloned().collect()
    }

    pub fn transactions_for(&self, owner: &str) -> Vec<Transaction> {
        lock(&self.ledger).transactions_for(owner).into_iter().cloned().collect()
    }

    pub fn ledger_stats(&self) -> LedgerStats {
        lock(&self.ledger).stats()
    }

    // ===== PERSISTENCE =====

    pub fn save_to_disk(&self) -> EscrowResult<()> {
        let to_json = |e: serde_json::Error| EscrowError::Persistence(format!("Failed to serialize state: {}", e));

        // The registry and every market stay locked while collecting, which
        // holds off creates, bets, resolutions and claims: pools, live
        // positions and wallets are read as one state.
        let (snapshot, market_count, position_count) = {
            let registry = lock(&self.registry);

            let mut shared: Vec<(Uuid, SharedMarket)> =
                read(&self.markets).iter().map(|(id, m)| (*id, m.clone())).collect();
            shared.sort_by_key(|(id, _)| *id);
            let markets: Vec<MutexGuard<'_, Market>> = shared.iter().map(|(_, m)| lock(m)).collect();

            let slots: Vec<SharedPosition> = read(&self.positions).values().cloned().collect();
            let positions: Vec<Position> = slots.iter().filter_map(|s| lock(s).get().cloned()).collect();

            let ledger = lock(&self.ledger);
            let (market_count, position_count) = (markets.len(), positions.len());

            let snapshot = json!({
                "registry": serde_json::to_value(&*registry).map_err(to_json)?,
                "markets": markets
                    .iter()
                    .map(|m| serde_json::to_value(&**m))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(to_json)?,
                "positions": positions,
                "ledger": serde_json::to_value(&*ledger).map_err(to_json)?,
            });
            (snapshot, market_count, position_count)
        };
        let body = serde_json::to_string_pretty(&snapshot).map_err(to_json)?;

        if let Some(dir) = self.config.state_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| EscrowError::Persistence(format!("Failed to create {}: {}", dir.display(), e)))?;
        }
        fs::write(&self.config.state_path, body)
            .map_err(|e| EscrowError::Persistence(format!("Failed to write state file: {}", e)))?;

        tracing::info!(
            path = %self.config.state_path.display(),
            markets = market_count,
            positions = position_count,
            "state saved"
        );
        Ok(())
    }

    pub fn load_from_disk(config: Config, clock: Arc<dyn Clock>) -> EscrowResult<Self> {
        let body = fs::read_to_string(&config.state_path)
            .map_err(|e| EscrowError::Persistence(format!("Failed to read state file: {}", e)))?;
        let snapshot: Snapshot = serde_json::from_str(&body)
            .map_err(|e| EscrowError::Persistence(format!("Failed to deserialize state: {}", e)))?;

        let markets: HashMap<Uuid, SharedMarket> = snapshot
            .markets
            .into_iter()
            .map(|m| (m.id, Arc::new(Mutex::new(m))))
            .collect();
        let positions: HashMap<Uuid, SharedPosition> = snapshot
            .positions
            .into_iter()
            .map(|p| (p.id, Arc::new(Mutex::new(PositionSlot::new(p)))))
            .collect();

        tracing::info!(
            path = %config.state_path.display(),
            markets = markets.len(),
            positions = positions.len(),
            "state restored"
        );
        Ok(Self {
            config,
            clock,
            registry: Mutex::new(snapshot.registry),
            markets: RwLock::new(markets),
            positions: RwLock::new(positions),
            ledger: Mutex::new(snapshot.ledger),
        })
    }
}
