//! Balance record for the EPC escrow model.
//!
//! Every account has a total `balance` and a `locked_balance` reserved for
//! pending trades. The two always satisfy `0 <= locked_balance <= balance`;
//! the free part (`balance - locked_balance`) is what transfers, burns and
//! further locks may draw on.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AccountId, LedgerError, Result,
    amount::{exact_add, exact_sub},
};

/// Per-account balance, stored under `BAL_{accountId}`.
///
/// Mutators are all-or-nothing: on error the record is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub account_id: AccountId,
    /// Total holdings, locked part included.
    pub balance: Decimal,
    /// Reserved for pending trades.
    pub locked_balance: Decimal,
    /// Commit time of the last mutation; `None` until first written.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Balance {
    /// Zero balance for an account that has never been written.
    #[must_use]
    pub fn zero(account_id: AccountId) -> Self {
        Self {
            account_id,
            balance: Decimal::ZERO,
            locked_balance: Decimal::ZERO,
            updated_at: None,
        }
    }

    /// Free balance: `balance - locked_balance`.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.balance - self.locked_balance
    }

    /// Whether this entry has no balance at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.balance.is_zero() && self.locked_balance.is_zero()
    }

    /// `0 <= locked_balance <= balance`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !self.locked_balance.is_sign_negative()
            && !self.balance.is_sign_negative()
            && self.locked_balance <= self.balance
    }

    /// Add to the total balance.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the sum is not exactly representable.
    pub fn credit(&mut self, amount: Decimal) -> Result<()> {
        let balance = exact_add(self.balance, amount, "credit")?;
        self.settle(balance, self.locked_balance, "credit")
    }

    /// Remove from the total balance. Locked funds are never consumed.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if available < amount.
    pub fn debit(&mut self, amount: Decimal) -> Result<()> {
        let available = self.available();
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: self.account_id.clone(),
                requested: amount,
                available,
            });
        }
        let balance = exact_sub(self.balance, amount, "debit")?;
        self.settle(balance, self.locked_balance, "debit")
    }

    /// Move funds from the free partition to the locked partition.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if available < amount.
    pub fn lock(&mut self, amount: Decimal) -> Result<()> {
        let available = self.available();
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: self.account_id.clone(),
                requested: amount,
                available,
            });
        }
        let locked = exact_add(self.locked_balance, amount, "lock")?;
        self.settle(self.balance, locked, "lock")
    }

    /// Move funds from the locked partition back to the free partition.
    ///
    /// # Errors
    /// Returns `InsufficientLock` if locked < amount.
    pub fn unlock(&mut self, amount: Decimal) -> Result<()> {
        if self.locked_balance < amount {
            return Err(LedgerError::InsufficientLock {
                account: self.account_id.clone(),
                requested: amount,
                locked: self.locked_balance,
            });
        }
        let locked = exact_sub(self.locked_balance, amount, "unlock")?;
        self.settle(self.balance, locked, "unlock")
    }

    // Both partitions must stay exact, the free part included, so that
    // `available()` never rounds.
    fn settle(&mut self, balance: Decimal, locked: Decimal, context: &'static str) -> Result<()> {
        exact_sub(balance, locked, context)?;
        self.balance = balance;
        self.locked_balance = locked;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded(total: i64, locked: i64) -> Balance {
        Balance {
            account_id: AccountId::new("alice"),
            balance: Decimal::new(total, 0),
            locked_balance: Decimal::new(locked, 0),
            updated_at: None,
        }
    }

    #[test]
    fn zero_balance_default() {
        let bal = Balance::zero(AccountId::new("alice"));
        assert!(bal.is_zero());
        assert_eq!(bal.available(), Decimal::ZERO);
        assert!(bal.updated_at.is_none());
        assert!(bal.is_consistent());
    }

    #[test]
    fn available_excludes_locked() {
        let bal = funded(100, 70);
        assert_eq!(bal.available(), Decimal::new(30, 0));
    }

    #[test]
    fn credit_adds_to_total() {
        let mut bal = funded(10, 0);
        bal.credit(Decimal::new(5, 1)).unwrap();
        assert_eq!(bal.balance, Decimal::new(105, 1));
    }

    #[test]
    fn credit_overflow_rejected() {
        let mut bal = funded(0, 0);
        bal.balance = Decimal::MAX;
        let err = bal.credit(Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow { .. }));
        assert_eq!(bal.balance, Decimal::MAX);
    }

    #[test]
    fn credit_that_would_round_is_rejected() {
        let mut bal = funded(0, 0);
        bal.balance = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000, 0);
        let before = bal.clone();
        let err = bal.credit(Decimal::new(1, 8)).unwrap_err();
        assert_eq!(err, LedgerError::AmountOverflow { context: "credit" });
        assert_eq!(bal, before);
    }

    #[test]
    fn credit_that_would_round_the_free_part_is_rejected() {
        // 1 with 10^-8 locked, topped up to 10^21: the balance is exact but
        // 10^21 - 10^-8 is not.
        let mut bal = funded(1, 0);
        bal.lock(Decimal::new(1, 8)).unwrap();
        let before = bal.clone();
        let top_up = Decimal::from_i128_with_scale(999_999_999_999_999_999_999, 0);
        assert!(bal.credit(top_up).is_err());
        assert_eq!(bal, before);
    }

    #[test]
    fn debit_cannot_touch_locked_funds() {
        let mut bal = funded(100, 70);
        let err = bal.debit(Decimal::new(50, 0)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                account: AccountId::new("alice"),
                requested: Decimal::new(50, 0),
                available: Decimal::new(30, 0),
            }
        );
        assert_eq!(bal, funded(100, 70));

        bal.debit(Decimal::new(30, 0)).unwrap();
        assert_eq!(bal.balance, Decimal::new(70, 0));
        assert!(bal.is_consistent());
    }

    #[test]
    fn lock_then_unlock_restores_partitions() {
        let mut bal = funded(100, 0);
        bal.lock(Decimal::new(70, 0)).unwrap();
        assert_eq!(bal.locked_balance, Decimal::new(70, 0));
        assert_eq!(bal.balance, Decimal::new(100, 0));

        bal.unlock(Decimal::new(70, 0)).unwrap();
        assert_eq!(bal, funded(100, 0));
    }

    #[test]
    fn lock_exceeding_available_fails() {
        let mut bal = funded(100, 70);
        let err = bal.lock(Decimal::new(31, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[test]
    fn unlock_exceeding_locked_fails() {
        let mut bal = funded(100, 10);
        let err = bal.unlock(Decimal::new(11, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientLock { .. }));
        assert_eq!(bal.locked_balance, Decimal::new(10, 0));
    }

    #[test]
    fn serde_uses_camel_case_and_string_decimals() {
        let bal = Balance {
            account_id: AccountId::new("alice"),
            balance: Decimal::new(12345, 2),
            locked_balance: Decimal::new(678, 1),
            updated_at: None,
        };
        let json = serde_json::to_string(&bal).unwrap();
        assert!(json.contains("\"accountId\":\"alice\""), "{json}");
        assert!(json.contains("\"lockedBalance\":\"67.8\""), "{json}");
        let back: Balance = serde_json::from_str(&json).unwrap();
        assert_eq!(bal, back);
    }
}
