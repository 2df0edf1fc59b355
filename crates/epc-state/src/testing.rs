//! Test fixtures. **Never use in production.**

use epc_types::{TxId, testing::timestamp};

use crate::TxContext;

/// Context number `seq`: txId `tx-{seq}`, committed `seq` seconds after the
/// fixture epoch.
#[must_use]
pub fn ctx(seq: u64) -> TxContext {
    TxContext::new(
        TxId::new(format!("tx-{seq}")),
        timestamp(i64::try_from(seq).unwrap_or(i64::MAX)),
    )
}
