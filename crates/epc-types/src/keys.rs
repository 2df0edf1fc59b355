//! Typed keyspace of the ledger state.
//!
//! The host store sees a flat string layout:
//!
//! | Key                 | Record        |
//! |---------------------|---------------|
//! | `BAL_{accountId}`   | `Balance`     |
//! | `EPC_SUPPLY`        | `Supply`      |
//! | `PRICE_{priceId}`   | `PriceRecord` |
//! | `EPC_LATEST_PRICE`  | `PriceRecord` |
//! | `TX_{txId}`         | `Transaction` |
//!
//! Inside the engine every key is a [`StateKey`] so two categories can never
//! alias, whatever characters an id contains.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{AccountId, LedgerError, PriceId, TxId, constants};

/// Key categories, one per owning component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum KeyCategory {
    Balance,
    Supply,
    Price,
    LatestPrice,
    Transaction,
}

/// A fully-qualified state key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum StateKey {
    Balance(AccountId),
    Supply,
    Price(PriceId),
    LatestPrice,
    Transaction(TxId),
}

impl StateKey {
    #[must_use]
    pub fn balance(account: &AccountId) -> Self {
        Self::Balance(account.clone())
    }

    #[must_use]
    pub fn price(price_id: &PriceId) -> Self {
        Self::Price(price_id.clone())
    }

    #[must_use]
    pub fn transaction(tx_id: &TxId) -> Self {
        Self::Transaction(tx_id.clone())
    }

    #[must_use]
    pub fn category(&self) -> KeyCategory {
        match self {
            Self::Balance(_) => KeyCategory::Balance,
            Self::Supply => KeyCategory::Supply,
            Self::Price(_) => KeyCategory::Price,
            Self::LatestPrice => KeyCategory::LatestPrice,
            Self::Transaction(_) => KeyCategory::Transaction,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balance(id) => write!(f, "{}{id}", constants::BALANCE_KEY_PREFIX),
            Self::Supply => f.write_str(constants::SUPPLY_KEY),
            Self::Price(id) => write!(f, "{}{id}", constants::PRICE_KEY_PREFIX),
            Self::LatestPrice => f.write_str(constants::LATEST_PRICE_KEY),
            Self::Transaction(id) => write!(f, "{}{id}", constants::TX_KEY_PREFIX),
        }
    }
}

impl FromStr for StateKey {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // Singletons first: they share no prefix with the id-bearing keys.
        if raw == constants::SUPPLY_KEY {
            return Ok(Self::Supply);
        }
        if raw == constants::LATEST_PRICE_KEY {
            return Ok(Self::LatestPrice);
        }

        let nonempty = |id: &str| {
            if id.is_empty() {
                Err(LedgerError::InvalidKey(raw.to_string()))
            } else {
                Ok(id.to_string())
            }
        };

        if let Some(id) = raw.strip_prefix(constants::BALANCE_KEY_PREFIX) {
            return nonempty(id).map(|id| Self::Balance(AccountId::new(id)));
        }
        if let Some(id) = raw.strip_prefix(constants::PRICE_KEY_PREFIX) {
            return nonempty(id).map(|id| Self::Price(PriceId::new(id)));
        }
        if let Some(id) = raw.strip_prefix(constants::TX_KEY_PREFIX) {
            return nonempty(id).map(|id| Self::Transaction(TxId::new(id)));
        }
        Err(LedgerError::InvalidKey(raw.to_string()))
    }
}
