//! Public operations as data.
//!
//! An [`Operation`] is what the invocation layer decodes from a request;
//! [`crate::TokenLedger::execute`] turns it into a commit unit.

use epc_types::{AccountId, PriceRecord, Supply, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PriceObservation;

/// A state-changing ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all_fields = "camelCase")]
pub enum Operation {
    InitLedger,
    SetPrice(PriceObservation),
    Mint {
        account: AccountId,
        amount: Decimal,
        reason: String,
        ref_id: String,
    },
    Burn {
        account: AccountId,
        amount: Decimal,
        reason: String,
        ref_id: String,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: String,
        ref_id: String,
    },
    Lock {
        account: AccountId,
        amount: Decimal,
        ref_id: String,
    },
    Unlock {
        account: AccountId,
        amount: Decimal,
        ref_id: String,
    },
}

impl Operation {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitLedger => "InitLedger",
            Self::SetPrice(_) => "SetPrice",
            Self::Mint { .. } => "Mint",
            Self::Burn { .. } => "Burn",
            Self::Transfer { .. } => "Transfer",
            Self::Lock { .. } => "Lock",
            Self::Unlock { .. } => "Unlock",
        }
    }

    pub fn mint(
        account: impl Into<AccountId>,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Self {
        Self::Mint {
            account: account.into(),
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
        }
    }

    pub fn burn(
        account: impl Into<AccountId>,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Self {
        Self::Burn {
            account: account.into(),
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
        }
    }

    pub fn transfer(
        from: impl Into<AccountId>,
        to: impl Into<AccountId>,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Self {
        Self::Transfer {
            from: from.into(),
            to: to.into(),
            amount,
            reason: reason.into(),
            ref_id: ref_id.into(),
        }
    }

    pub fn lock(account: impl Into<AccountId>, amount: Decimal, ref_id: impl Into<String>) -> Self {
        Self::Lock {
            account: account.into(),
            amount,
            ref_id: ref_id.into(),
        }
    }

    pub fn unlock(
        account: impl Into<AccountId>,
        amount: Decimal,
        ref_id: impl Into<String>,
    ) -> Self {
        Self::Unlock {
            account: account.into(),
            amount,
            ref_id: ref_id.into(),
        }
    }
}

/// What a successful operation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum OperationOutput {
    /// `InitLedger`: the fresh singleton.
    Initialized(Supply),
    /// `SetPrice`: the stored record.
    Price(PriceRecord),
    /// Balance-changing operations: the audit entry written.
    Recorded(Transaction),
}

impl OperationOutput {
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Recorded(tx) => Some(tx),
            _ => None,
        }
    }
}
