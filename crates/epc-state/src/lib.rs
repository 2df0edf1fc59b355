//! # epc-state
//!
//! Versioned state access for the **EPC** ledger.
//!
//! Operations never write to the store directly. They run against a
//! [`StateTxn`], which records every key read together with the version
//! observed and buffers the writes and events the operation produces. The
//! resulting [`CommitUnit`] is handed to a [`VersionedStore`], which either
//! applies all of it under a single new version or, if any key read has
//! moved on, applies nothing and reports the [`Conflict`].
//!
//! ```text
//! execute (snapshot, &store)        commit (&mut store)
//! ┌──────────────────────────┐      ┌─────────────────────────────┐
//! │ get  -> read-set         │      │ read-set still current?     │
//! │ put  -> ordered writes   │ ───> │   yes: apply, version + 1   │
//! │ emit -> events           │      │   no:  Aborted(Conflict)    │
//! └──────────────────────────┘      └─────────────────────────────┘
//! ```

pub mod digest;
pub mod memory;
pub mod store;
pub mod txn;
pub mod version;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use digest::{commit_digest, verify_commit_digest};
pub use memory::MemoryStore;
pub use store::{CommitOutcome, CommitUnit, VersionedStore};
pub use txn::{StateTxn, TxContext};
pub use version::{CommitReceipt, Conflict, Version, VersionedValue};
