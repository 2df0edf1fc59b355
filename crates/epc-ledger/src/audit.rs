//! Supply conservation audit.
//!
//! Invariants checked against committed state:
//! ```text
//! total_supply == total_minted - total_burned
//! Σ balance(account) == total_supply
//! ∀ account: 0 <= locked_balance <= balance
//! ```
//!
//! If any of these breaks, stored state is corrupt and the audit fails with
//! `SupplyInvariantViolation`.

use epc_state::{StateTxn, VersionedStore};
use epc_types::{Balance, KeyCategory, LedgerError, Result, Supply, amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{codec, supply_ledger};

/// Snapshot totals produced by a successful audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyAudit {
    pub supply: Supply,
    /// Accounts with a stored balance record.
    pub accounts: usize,
    pub balance_total: Decimal,
    pub locked_total: Decimal,
}

impl SupplyAudit {
    /// Value free to move across all accounts.
    #[must_use]
    pub fn available_total(&self) -> Decimal {
        self.balance_total - self.locked_total
    }

    pub fn verify(&self) -> Result<()> {
        self.supply.verify()?;
        if self.balance_total != self.supply.total_supply {
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!(
                    "account balances sum to {} but total supply is {}",
                    self.balance_total, self.supply.total_supply
                ),
            });
        }
        Ok(())
    }
}

/// Scan every balance record and reconcile against the supply singleton.
pub fn audit<S: VersionedStore + ?Sized>(txn: &mut StateTxn<'_, S>) -> Result<SupplyAudit> {
    let supply = supply_ledger::read(txn)?;
    let mut balance_total = Decimal::ZERO;
    let mut locked_total = Decimal::ZERO;
    let mut accounts = 0;

    for (key, bytes) in txn.scan(KeyCategory::Balance)? {
        let balance: Balance = codec::decode(&key, &bytes)?;
        if !balance.is_consistent() {
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!(
                    "account {} has locked {} outside balance {}",
                    balance.account_id, balance.locked_balance, balance.balance
                ),
            });
        }
        balance_total = amount::exact_add(balance_total, balance.balance, "audit")?;
        locked_total = amount::exact_add(locked_total, balance.locked_balance, "audit")?;
        accounts += 1;
    }

    let report = SupplyAudit {
        supply,
        accounts,
        balance_total,
        locked_total,
    };
    report.verify()?;
    info!(
        accounts,
        total_supply = %report.supply.total_supply,
        locked = %report.locked_total,
        "supply audit passed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use epc_state::{MemoryStore, testing::ctx};
    use epc_types::{AccountId, StateKey};

    use super::*;

    fn write_balance(store: &mut MemoryStore, seq: u64, balance: &Balance) {
        let key = StateKey::balance(&balance.account_id);
        let mut txn = StateTxn::new(&*store, ctx(seq));
        txn.put(key.clone(), codec::encode(&key, balance).unwrap()).unwrap();
        let unit = txn.into_commit_unit().unwrap();
        store.commit(unit).unwrap();
    }

    #[test]
    fn empty_ledger_audits_clean() {
        let store = MemoryStore::new();
        let report = audit(&mut StateTxn::read_only(&store)).unwrap();
        assert_eq!(report.accounts, 0);
        assert_eq!(report.balance_total, Decimal::ZERO);
    }

    #[test]
    fn balances_without_supply_fail() {
        let mut store = MemoryStore::new();
        let mut alice = Balance::zero(AccountId::new("alice"));
        alice.balance = Decimal::new(10, 0);
        write_balance(&mut store, 1, &alice);

        let err = audit(&mut StateTxn::read_only(&store)).unwrap_err();
        assert!(matches!(err, LedgerError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn over_locked_account_fails() {
        let mut store = MemoryStore::new();
        let mut alice = Balance::zero(AccountId::new("alice"));
        alice.locked_balance = Decimal::ONE;
        write_balance(&mut store, 1, &alice);

        let err = audit(&mut StateTxn::read_only(&store)).unwrap_err();
        assert!(matches!(err, LedgerError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn available_total_subtracts_locks() {
        let report = SupplyAudit {
            supply: Supply::zero(),
            accounts: 2,
            balance_total: Decimal::new(100, 0),
            locked_total: Decimal::new(30, 0),
        };
        assert_eq!(report.available_total(), Decimal::new(70, 0));
    }
}
