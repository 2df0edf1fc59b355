//! Append-only audit log under `TX_{txId}`.

use epc_state::{StateTxn, VersionedStore};
use epc_types::{LedgerError, LedgerEvent, Result, StateKey, Transaction, TxId};
use tracing::debug;

use crate::codec;

/// Buffer the entry and its event. The event payload is the stored bytes.
///
/// The txId is assigned by the host and is not checked for reuse.
pub fn append<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    entry: &Transaction,
) -> Result<()> {
    let key = StateKey::transaction(&entry.tx_id);
    let bytes = codec::encode(&key, entry)?;
    txn.put(key, bytes.clone())?;
    txn.emit(LedgerEvent::new(entry.tx_type.event_name(), bytes))?;
    debug!(
        tx_id = %entry.tx_id,
        tx_type = %entry.tx_type,
        amount = %entry.amount,
        "transaction logged"
    );
    Ok(())
}

pub fn get<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    tx_id: &TxId,
) -> Result<Transaction> {
    let key = StateKey::transaction(tx_id);
    let bytes = txn
        .get(&key)?
        .ok_or_else(|| LedgerError::TransactionNotFound(tx_id.clone()))?;
    codec::decode(&key, &bytes)
}
