//! Audit-trail entries written under `TX_{txId}`.
//!
//! A [`Transaction`] is the immutable record of one committed
//! balance-changing operation. Entries are never updated or deleted.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, EventName, TxId};

/// Kind of balance change an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    Mint,
    Burn,
    Transfer,
    Lock,
    Unlock,
}

impl TxType {
    /// Event emitted when an entry of this type is appended.
    #[must_use]
    pub fn event_name(self) -> EventName {
        match self {
            Self::Mint => EventName::Mint,
            Self::Burn => EventName::Burn,
            Self::Transfer => EventName::Transfer,
            Self::Lock => EventName::Lock,
            Self::Unlock => EventName::Unlock,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mint => write!(f, "MINT"),
            Self::Burn => write!(f, "BURN"),
            Self::Transfer => write!(f, "TRANSFER"),
            Self::Lock => write!(f, "LOCK"),
            Self::Unlock => write!(f, "UNLOCK"),
        }
    }
}

/// One audit entry.
///
/// Party conventions:
/// - MINT: `to` = recipient
/// - BURN: `from` = holder
/// - TRANSFER: both
/// - LOCK: `from` = holder
/// - UNLOCK: `to` = holder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub tx_id: TxId,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub from: Option<AccountId>,
    pub to: Option<AccountId>,
    pub amount: Decimal,
    pub reason: String,
    /// Caller-side reference (order id, settlement id, ...). May be empty.
    pub ref_id: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[must_use]
    pub fn mint(
        tx_id: TxId,
        to: AccountId,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            tx_type: TxType::Mint,
            from: None,
            to: Some(to),
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn burn(
        tx_id: TxId,
        from: AccountId,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            tx_type: TxType::Burn,
            from: Some(from),
            to: None,
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn transfer(
        tx_id: TxId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            tx_type: TxType::Transfer,
            from: Some(from),
            to: Some(to),
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn lock(
        tx_id: TxId,
        account: AccountId,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            tx_type: TxType::Lock,
            from: Some(account),
            to: None,
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn unlock(
        tx_id: TxId,
        account: AccountId,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id,
            tx_type: TxType::Unlock,
            from: None,
            to: Some(account),
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
            created_at,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let party = |p: &Option<AccountId>| p.as_ref().map_or("-", AccountId::as_str).to_string();
        write!(
            f,
            "Tx[{}] {} {} -> {} amount={}",
            self.tx_id,
            self.tx_type,
            party(&self.from),
            party(&self.to),
            self.amount,
        )
    }
}
