//! The `EPC_SUPPLY` singleton.
//!
//! Every supply write goes through [`store`], which re-verifies
//! `total_supply == total_minted - total_burned` before buffering it. A
//! violation means stored data is corrupt and the operation is refused.

use epc_state::{StateTxn, VersionedStore};
use epc_types::{LedgerError, Result, StateKey, Supply, constants};
use rust_decimal::Decimal;
use tracing::debug;

use crate::codec;

/// Current supply; all zeros if the singleton was never written.
pub fn read<S: VersionedStore + ?Sized>(txn: &mut StateTxn<'_, S>) -> Result<Supply> {
    match txn.get(&StateKey::Supply)? {
        Some(bytes) => codec::decode(&StateKey::Supply, &bytes),
        None => Ok(Supply::zero()),
    }
}

/// Create the singleton. Fails with `AlreadyInitialized` if it exists.
pub fn initialize<S: VersionedStore + ?Sized>(txn: &mut StateTxn<'_, S>) -> Result<Supply> {
    if txn.get(&StateKey::Supply)?.is_some() {
        return Err(LedgerError::AlreadyInitialized {
            key: constants::SUPPLY_KEY.to_string(),
        });
    }
    let supply = store(txn, Supply::zero())?;
    debug!("supply initialized");
    Ok(supply)
}

pub fn mint<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    amount: Decimal,
) -> Result<Supply> {
    let mut supply = read(txn)?;
    supply.verify()?;
    supply.mint(amount)?;
    store(txn, supply)
}

/// Account balances are not consulted here; the caller debits first.
pub fn burn<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    amount: Decimal,
) -> Result<Supply> {
    let mut supply = read(txn)?;
    supply.verify()?;
    supply.burn(amount)?;
    store(txn, supply)
}

pub fn set_price<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    basket_price: Decimal,
) -> Result<Supply> {
    let mut supply = read(txn)?;
    supply.set_price(basket_price);
    store(txn, supply)
}

fn store<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    mut supply: Supply,
) -> Result<Supply> {
    supply.verify()?;
    supply.updated_at = Some(txn.timestamp()?);
    let bytes = codec::encode(&StateKey::Supply, &supply)?;
    txn.put(StateKey::Supply, bytes)?;
    debug!(
        total = %supply.total_supply,
        minted = %supply.total_minted,
        burned = %supply.total_burned,
        "supply updated"
    );
    Ok(supply)
}
