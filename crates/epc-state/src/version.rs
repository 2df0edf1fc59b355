//! Versions, versioned values and commit receipts.

use std::fmt;

use chrono::{DateTime, Utc};
use epc_types::{StateKey, TxId};
use serde::{Deserialize, Serialize};

/// Commit height. Every successful commit gets the next version, and every
/// key it writes is stamped with it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    /// Height of an empty store.
    pub const GENESIS: Self = Self(0);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// One committed value of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedValue {
    pub version: Version,
    /// Transaction that wrote this value.
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub value: Vec<u8>,
}

/// A read-set entry that no longer matches the store.
///
/// `None` means "absent": the key had not been written when read, or has
/// not been written yet at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub key: StateKey,
    pub expected: Option<Version>,
    pub found: Option<Version>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<Version>| v.map_or_else(|| "absent".to_string(), |v| v.to_string());
        write!(
            f,
            "conflict on {}: read {}, now {}",
            self.key,
            show(self.expected),
            show(self.found)
        )
    }
}

/// Proof that a commit unit was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub tx_id: TxId,
    pub version: Version,
    /// Keys written, in write order.
    pub keys_written: Vec<StateKey>,
    /// SHA-256 over the write-set, see [`crate::commit_digest`].
    pub digest: [u8; 32],
}

impl CommitReceipt {
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}
