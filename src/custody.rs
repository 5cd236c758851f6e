// ============================================================================
// Value Custody
// ============================================================================
//
// A `Balance` is an opaque quantity of fungible value. It is deliberately not
// `Clone`: value only moves, it is never duplicated. The escrow core only
// ever asks a balance for its quantity and joins or splits it.
//
// `Custody` is the seam to whatever holds value outside the markets. Taking
// from custody moves value into the system; giving moves it back out.
//
// ============================================================================

use crate::errors::{EscrowError, EscrowResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    value: u64,
}

impl Balance {
    pub fn zero() -> Self {
        Self { value: 0 }
    }

    /// Only custody implementations inside the crate create value
    pub(crate) fn mint(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Absorb `other`, returning the new quantity
    pub fn join(&mut self, other: Balance) -> EscrowResult<u64> {
        self.value = self.value.checked_add(other.value).ok_or(EscrowError::Overflow)?;
        Ok(self.value)
    }

    pub fn split(&mut self, amount: u64) -> EscrowResult<Balance> {
        if self.value < amount {
            return Err(EscrowError::InsufficientBalance {
                available: self.value,
                requested: amount,
            });
        }
        self.value -= amount;
        Ok(Balance { value: amount })
    }

    pub fn withdraw_all(&mut self) -> Balance {
        Balance { value: std::mem::take(&mut self.value) }
    }

    /// Consume the balance, handing its quantity back to a custodian
    pub(crate) fn burn(self) -> u64 {
        self.value
    }
}

/// Holder of value outside the escrow markets
pub trait Custody {
    /// Move `amount` from `owner` into the system
    fn take(&mut self, owner: &str, amount: u64) -> EscrowResult<Balance>;

    /// Move `value` out of the system to `owner`
    fn give(&mut self, owner: &str, value: Balance) -> EscrowResult<()>;

    /// Quantity `owner` could currently hand over
    fn available(&self, owner: &str) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_split() {
        let mut pool = Balance::zero();
        assert_eq!(pool.join(Balance::mint(100)).unwrap(), 100);
        assert_eq!(pool.join(Balance::mint(50)).unwrap(), 150);

        let part = pool.split(30).unwrap();
        assert_eq!(part.value(), 30);
        assert_eq!(pool.value(), 120);
    }

    #[test]
    fn test_split_more_than_held() {
        let mut pool = Balance::mint(10);
        let err = pool.split(11).unwrap_err();
        assert_eq!(err, EscrowError::InsufficientBalance { available: 10, requested: 11 });
        assert_eq!(pool.value(), 10);
    }

    #[test]
    fn test_join_overflow_leaves_balance_untouched() {
        let mut pool = Balance::mint(u64::MAX);
        assert_eq!(pool.join(Balance::mint(1)), Err(EscrowError::Overflow));
        assert_eq!(pool.value(), u64::MAX);
    }

    #[test]
    fn test_withdraw_all() {
        let mut pool = Balance::mint(75);
        let all = pool.withdraw_all();
        assert_eq!(all.value(), 75);
        assert!(pool.is_zero());
    }
}
