//! # epc-types
//!
//! Shared types, errors, and configuration for the **EPC** token ledger.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`PriceId`], [`TxId`]
//! - **Balance model**: [`Balance`] with available / locked partitions
//! - **Supply model**: [`Supply`], the singleton mint/burn aggregate
//! - **Price model**: [`PriceRecord`], [`PriceSource`]
//! - **Audit model**: [`Transaction`], [`TxType`], [`LedgerEvent`], [`EventName`]
//! - **Keyspace**: [`StateKey`], [`KeyCategory`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`LedgerError`] with `EPC_ERR_` prefix codes, grouped by [`ErrorKind`]
//! - **Constants**: key prefixes and defaults

pub mod amount;
pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod keys;
pub mod price;
pub mod supply;
pub mod transaction;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

// Re-export all primary types at crate root for ergonomic imports:
//   use epc_types::{Balance, Supply, Transaction, StateKey, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use keys::*;
pub use price::*;
pub use supply::*;
pub use transaction::*;

// Constants and amount guards are accessed via their module path
// (`epc_types::constants::FOO`, `epc_types::amount::ensure_positive`).
