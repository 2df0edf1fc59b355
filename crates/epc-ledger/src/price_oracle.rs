//! Oracle price log.
//!
//! Each record is written under `PRICE_{priceId}` and the same bytes under
//! `EPC_LATEST_PRICE`. The store keeps every version of both keys, so the
//! history of an id is the store history of its key.

use chrono::{DateTime, Utc};
use epc_state::{StateTxn, VersionedStore};
use epc_types::{LedgerError, PriceId, PriceRecord, PriceSource, Result, StateKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec;

/// A price as reported by a feed, before the ledger stamps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceObservation {
    pub price_id: PriceId,
    pub source: PriceSource,
    pub price: Decimal,
    pub currency: String,
    pub basket_price: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    fn into_record(self, recorded_at: DateTime<Utc>) -> PriceRecord {
        PriceRecord {
            price_id: self.price_id,
            source: self.source,
            price: self.price,
            currency: self.currency,
            basket_price: self.basket_price,
            observed_at: self.observed_at,
            recorded_at,
        }
    }
}

/// Validate and buffer a new price record plus the latest pointer.
pub fn record<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    observation: PriceObservation,
    max_scale: u32,
) -> Result<PriceRecord> {
    let record = observation.into_record(txn.timestamp()?);
    record.validate(max_scale)?;

    let key = StateKey::price(&record.price_id);
    let bytes = codec::encode(&key, &record)?;
    txn.put(key, bytes.clone())?;
    txn.put(StateKey::LatestPrice, bytes)?;

    debug!(
        price_id = %record.price_id,
        source = %record.source,
        basket_price = %record.basket_price,
        "price recorded"
    );
    Ok(record)
}

pub fn latest<S: VersionedStore + ?Sized>(txn: &mut StateTxn<'_, S>) -> Result<PriceRecord> {
    let bytes = txn
        .get(&StateKey::LatestPrice)?
        .ok_or(LedgerError::LatestPriceNotSet)?;
    codec::decode(&StateKey::LatestPrice, &bytes)
}

/// Every committed version of `price_id`, oldest first.
///
/// Versions that no longer decode are skipped with a warning rather than
/// failing the whole read.
pub fn history<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    price_id: &PriceId,
) -> Result<Vec<PriceRecord>> {
    let key = StateKey::price(price_id);
    let versions = txn.history(&key)?;
    if versions.is_empty() {
        return Err(LedgerError::PriceNotFound(price_id.clone()));
    }

    Ok(versions
        .into_iter()
        .filter_map(|v| match codec::decode::<PriceRecord>(&key, &v.value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    price_id = %price_id,
                    version = %v.version,
                    error = %e,
                    "skipping malformed price entry"
                );
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use epc_state::{MemoryStore, testing::ctx};
    use epc_types::testing::timestamp;

    use super::*;

    fn observation(id: &str, basket: i64) -> PriceObservation {
        PriceObservation {
            price_id: PriceId::new(id),
            source: PriceSource::Entsoe,
            price: Decimal::new(8812, 2),
            currency: "EUR".into(),
            basket_price: Decimal::new(basket, 3),
            observed_at: timestamp(-60),
        }
    }

    #[test]
    fn record_writes_entry_and_pointer() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::new(&store, ctx(1));
        let rec = record(&mut txn, observation("p1", 105), 8).unwrap();
        assert_eq!(rec.recorded_at, ctx(1).timestamp);
        assert_eq!(txn.writes().len(), 2);
        assert_eq!(txn.writes()[0].1, txn.writes()[1].1);
        assert_eq!(latest(&mut txn).unwrap(), rec);
    }

    #[test]
    fn non_positive_prices_rejected() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::new(&store, ctx(1));
        let mut obs = observation("p1", 0);
        let err = record(&mut txn, obs.clone(), 8).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPrice { field: "basketPrice", .. }));

        obs.basket_price = Decimal::ONE;
        obs.price = Decimal::new(-1, 0);
        let err = record(&mut txn, obs, 8).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPrice { field: "price", .. }));
        assert!(txn.writes().is_empty());
    }

    #[test]
    fn latest_without_price_is_not_found() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::read_only(&store);
        assert_eq!(latest(&mut txn).unwrap_err(), LedgerError::LatestPriceNotSet);
    }

    #[test]
    fn unknown_history_is_not_found() {
        let store = MemoryStore::new();
        let mut txn = StateTxn::read_only(&store);
        let err = history(&mut txn, &PriceId::new("nope")).unwrap_err();
        assert_eq!(err, LedgerError::PriceNotFound(PriceId::new("nope")));
    }

    #[test]
    fn history_skips_malformed_versions() {
        let mut store = MemoryStore::new();
        let key = StateKey::price(&PriceId::new("p1"));

        let mut txn = StateTxn::new(&store, ctx(1));
        record(&mut txn, observation("p1", 100), 8).unwrap();
        let unit = txn.into_commit_unit().unwrap();
        store.commit(unit).unwrap();

        let mut txn = StateTxn::new(&store, ctx(2));
        txn.put(key.clone(), b"garbage".to_vec()).unwrap();
        let unit = txn.into_commit_unit().unwrap();
        store.commit(unit).unwrap();

        let mut txn = StateTxn::new(&store, ctx(3));
        record(&mut txn, observation("p1", 110), 8).unwrap();
        let unit = txn.into_commit_unit().unwrap();
        store.commit(unit).unwrap();

        let mut reader = StateTxn::read_only(&store);
        let prices: Vec<_> = history(&mut reader, &PriceId::new("p1"))
            .unwrap()
            .into_iter()
            .map(|r| r.basket_price)
            .collect();
        assert_eq!(prices, vec![Decimal::new(100, 3), Decimal::new(110, 3)]);
    }
}
