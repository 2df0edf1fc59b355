//! Per-account balance records under `BAL_{accountId}`.
//!
//! Keyed read-modify-write only. The arithmetic and its checks live on
//! [`Balance`]; this module loads the record (zero if unseen), applies one
//! mutation, stamps the commit time and buffers the write.

use epc_state::{StateTxn, VersionedStore};
use epc_types::{AccountId, Balance, Result, StateKey};
use rust_decimal::Decimal;
use tracing::debug;

use crate::codec;

/// Current balance of `account`; a zero record if it was never written.
pub fn get_or_create<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    account: &AccountId,
) -> Result<Balance> {
    let key = StateKey::balance(account);
    match txn.get(&key)? {
        Some(bytes) => codec::decode(&key, &bytes),
        None => Ok(Balance::zero(account.clone())),
    }
}

pub fn credit<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    account: &AccountId,
    amount: Decimal,
) -> Result<Balance> {
    modify(txn, account, "credit", |b| b.credit(amount))
}

/// Fails with `InsufficientFunds` if `amount` exceeds the available balance.
pub fn debit<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    account: &AccountId,
    amount: Decimal,
) -> Result<Balance> {
    modify(txn, account, "debit", |b| b.debit(amount))
}

pub fn lock<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    account: &AccountId,
    amount: Decimal,
) -> Result<Balance> {
    modify(txn, account, "lock", |b| b.lock(amount))
}

pub fn unlock<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    account: &AccountId,
    amount: Decimal,
) -> Result<Balance> {
    modify(txn, account, "unlock", |b| b.unlock(amount))
}

fn modify<S, F>(
    txn: &mut StateTxn<'_, S>,
    account: &AccountId,
    action: &'static str,
    apply: F,
) -> Result<Balance>
where
    S: VersionedStore + ?Sized,
    F: FnOnce(&mut Balance) -> Result<()>,
{
    let mut balance = get_or_create(txn, account)?;
    apply(&mut balance)?;
    balance.updated_at = Some(txn.timestamp()?);

    let key = StateKey::balance(account);
    let bytes = codec::encode(&key, &balance)?;
    txn.put(key, bytes)?;

    debug!(
        account = %account,
        action,
        balance = %balance.balance,
        locked = %balance.locked_balance,
        "balance updated"
    );
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use epc_state::{MemoryStore, testing::ctx};
    use epc_types::LedgerError;

    use super::*;

    fn alice() -> AccountId {
        AccountId::new("alice")
    }

    #[test]
    fn unseen_account_reads_as_zero_without_writing() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::new(&store, ctx(1));
        let balance = get_or_create(&mut txn, &alice()).unwrap();
        assert!(balance.is_zero());
        assert!(balance.updated_at.is_none());
        assert!(txn.writes().is_empty());
    }

    #[test]
    fn mutations_chain_within_one_txn() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::new(&store, ctx(1));
        credit(&mut txn, &alice(), Decimal::new(100, 0)).unwrap();
        lock(&mut txn, &alice(), Decimal::new(40, 0)).unwrap();
        let b = debit(&mut txn, &alice(), Decimal::new(60, 0)).unwrap();
        assert_eq!(b.balance, Decimal::new(40, 0));
        assert_eq!(b.locked_balance, Decimal::new(40, 0));
        assert_eq!(b.updated_at, Some(ctx(1).timestamp));
        // One key, rewritten in place.
        assert_eq!(txn.writes().len(), 1);
    }

    #[test]
    fn debit_cannot_touch_locked_funds() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::new(&store, ctx(1));
        credit(&mut txn, &alice(), Decimal::new(100, 0)).unwrap();
        lock(&mut txn, &alice(), Decimal::new(70, 0)).unwrap();
        let err = debit(&mut txn, &alice(), Decimal::new(50, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[test]
    fn failed_mutation_buffers_nothing() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::new(&store, ctx(1));
        let err = unlock(&mut txn, &alice(), Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientLock { .. }));
        assert!(txn.writes().is_empty());
    }
}
