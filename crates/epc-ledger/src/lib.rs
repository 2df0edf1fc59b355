//! # epc-ledger
//!
//! The **EPC** token ledger: balances with available/locked partitions, a
//! conserved mint/burn supply, an oracle price log and an append-only
//! audit trail, all mutated through one atomic commit per operation.
//!
//! ## Components
//!
//! | Module            | Keys                               |
//! |-------------------|------------------------------------|
//! | [`balance_store`] | `BAL_{accountId}`                  |
//! | [`supply_ledger`] | `EPC_SUPPLY`                       |
//! | [`price_oracle`]  | `PRICE_{priceId}`, `EPC_LATEST_PRICE` |
//! | [`tx_log`]        | `TX_{txId}`                        |
//!
//! Only [`TokenLedger`] touches more than one of them in a single operation.
//!
//! ## Determinism
//!
//! The ledger reads no clock and generates no ids. Transaction id and
//! commit time come from the caller's [`TxContext`], so replicas that
//! execute the same operations commit identical bytes.

pub mod audit;
pub mod balance_store;
pub mod codec;
pub mod ledger;
pub mod operation;
pub mod price_oracle;
pub mod supply_ledger;
pub mod tx_log;

pub use audit::SupplyAudit;
pub use ledger::{PreparedOperation, TokenLedger};
pub use operation::{Operation, OperationOutput};
pub use price_oracle::PriceObservation;

pub use epc_state::{
    CommitOutcome, CommitReceipt, Conflict, MemoryStore, TxContext, Version, VersionedStore,
};
