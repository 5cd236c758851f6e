/// Wallet Ledger
///
/// Holds every identity's spendable value outside the markets and keeps an
/// append-only log of every movement across the escrow boundary:
/// - Deposits / withdrawals: value entering or leaving the whole system
/// - Bets: value moving from a wallet into a market pool
/// - Payouts: value moving from a market pool back to a wallet
///
/// The ledger is the `Custody` implementation the markets draw stakes from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::custody::{Balance, Custody};
use crate::errors::{EscrowError, EscrowResult};

// ============================================================================
// TRANSACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxType {
    Deposit,
    Withdraw,
    Bet,
    Payout,
    MarketCreated,
    MarketResolved,
}

/// One side of a transaction. Wallet addresses live in their own variant so
/// no address can pose as the system's own accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Outside the system (deposits in, withdrawals out)
    External,
    /// Market pools
    Escrow,
    Admin,
    Wallet(String),
}

impl Endpoint {
    pub fn wallet(address: &str) -> Self {
        Endpoint::Wallet(address.to_string())
    }

    pub fn is_wallet(&self, address: &str) -> bool {
        matches!(self, Endpoint::Wallet(a) if a == address)
    }
}

/// A single ledger record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub tx_type: TxType,
    pub from: Endpoint,
    pub to: Option<Endpoint>,
    pub amount: u64,
    pub market_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub timestamp: u64,
}

impl Transaction {
    pub fn new(tx_type: TxType, from: Endpoint, amount: u64, timestamp: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx_type,
            from,
            to: None,
            amount,
            market_id: None,
            position_id: None,
            timestamp,
        }
    }

    pub fn deposit(to: &str, amount: u64, timestamp: u64) -> Self {
        let mut tx = Self::new(TxType::Deposit, Endpoint::External, amount, timestamp);
        tx.to = Some(Endpoint::wallet(to));
        tx
    }

    pub fn withdraw(from: &str, amount: u64, timestamp: u64) -> Self {
        let mut tx = Self::new(TxType::Withdraw, Endpoint::wallet(from), amount, timestamp);
        tx.to = Some(Endpoint::External);
        tx
    }

    pub fn bet(from: &str, market_id: Uuid, position_id: Uuid, amount: u64, timestamp: u64) -> Self {
        let mut tx = Self::new(TxType::Bet, Endpoint::wallet(from), amount, timestamp);
        tx.to = Some(Endpoint::Escrow);
        tx.market_id = Some(market_id);
        tx.position_id = Some(position_id);
        tx
    }

    pub fn payout(to: &str, market_id: Uuid, position_id: Uuid, amount: u64, timestamp: u64) -> Self {
        let mut tx = Self::new(TxType::Payout, Endpoint::Escrow, amount, timestamp);
        tx.to = Some(Endpoint::wallet(to));
        tx.market_id = Some(market_id);
        tx.position_id = Some(position_id);
        tx
    }

    pub fn market_created(creator: &str, market_id: Uuid, timestamp: u64) -> Self {
        let mut tx = Self::new(TxType::MarketCreated, Endpoint::wallet(creator), 0, timestamp);
        tx.market_id = Some(market_id);
        tx
    }

    pub fn market_resolved(market_id: Uuid, timestamp: u64) -> Self {
        let mut tx = Self::new(TxType::MarketResolved, Endpoint::Admin, 0, timestamp);
        tx.market_id = Some(market_id);
        tx
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Wallet balances keyed by identity
    wallets: HashMap<String, Balance>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fund a wallet from outside the system, creating it on first use
    pub fn deposit(&mut self, owner: &str, amount: u64, now: u64) -> EscrowResult<u64> {
        if amount == 0 {
            return Err(EscrowError::ZeroAmount);
        }
        let wallet = self.wallets.entry(owner.to_string()).or_default();
        wallet.value().checked_add(amount).ok_or(EscrowError::Overflow)?;
        let total = wallet.join(Balance::mint(amount))?;

        self.transactions.push(Transaction::deposit(owner, amount, now));
        tracing::info!(owner, amount, balance = total, "wallet deposit");
        Ok(total)
    }

    /// Cash value out of the system
    pub fn withdraw(&mut self, owner: &str, amount: u64, now: u64) -> EscrowResult<u64> {
        if amount == 0 {
            return Err(EscrowError::ZeroAmount);
        }
        let wallet = self
            .wallets
            .get_mut(owner)
            .ok_or_else(|| EscrowError::AccountNotFound(owner.to_string()))?;
        let cashed = wallet.split(amount)?;
        let remaining = wallet.value();
        cashed.burn();

        self.transactions.push(Transaction::withdraw(owner, amount, now));
        tracing::info!(owner, amount, balance = remaining, "wallet withdrawal");
        Ok(remaining)
    }

    pub fn balance(&self, owner: &str) -> u64 {
        self.wallets.get(owner).map(Balance::value).unwrap_or(0)
    }

    pub fn has_wallet(&self, owner: &str) -> bool {
        self.wallets.contains_key(owner)
    }

    /// Append a record that moved no wallet value (market events, bet/payout receipts)
    pub fn record(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn transactions_for(&self, owner: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.from.is_wallet(owner) || tx.to.as_ref().is_some_and(|to| to.is_wallet(owner)))
            .collect()
    }

    pub fn recent_transactions(&self, limit: usize) -> Vec<&Transaction> {
        self.transactions.iter().rev().take(limit).collect()
    }

    pub fn stats(&self) -> LedgerStats {
        let count = |kind: TxType| self.transactions.iter().filter(|t| t.tx_type == kind).count();
        let volume = |kind: TxType| -> u64 {
            self.transactions
                .iter()
                .filter(|t| t.tx_type == kind)
                .map(|t| t.amount)
                .sum()
        };

        LedgerStats {
            wallets: self.wallets.len(),
            transactions: self.transactions.len(),
            total_bets: count(TxType::Bet),
            bet_volume: volume(TxType::Bet),
            payout_volume: volume(TxType::Payout),
            wallet_supply: self.wallets.values().map(Balance::value).sum(),
        }
    }
}

impl Custody for Ledger {
    fn take(&mut self, owner: &str, amount: u64) -> EscrowResult<Balance> {
        let wallet = self
            .wallets
            .get_mut(owner)
            .ok_or_else(|| EscrowError::AccountNotFound(owner.to_string()))?;
        wallet.split(amount)
    }

    fn give(&mut self, owner: &str, value: Balance) -> EscrowResult<()> {
        let wallet = self.wallets.entry(owner.to_string()).or_default();
        wallet.value().checked_add(value.value()).ok_or(EscrowError::Overflow)?;
        wallet.join(value)?;
        Ok(())
    }

    fn available(&self, owner: &str) -> u64 {
        self.balance(owner)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub wallets: usize,
    pub transactions: usize,
    pub total_bets: usize,
    pub bet_volume: u64,
    pub payout_volume: u64,
    pub wallet_supply: u64,
}
