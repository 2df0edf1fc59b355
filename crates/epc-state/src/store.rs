//! The store contract consumed by the ledger.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use epc_types::{KeyCategory, LedgerEvent, Result, StateKey, TxId};

use crate::{CommitReceipt, Conflict, Version, VersionedValue};

/// Everything one operation wants to make visible, atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitUnit {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    /// Keys read during execution and the version each had (`None` = absent).
    pub read_set: BTreeMap<StateKey, Option<Version>>,
    /// Writes in the order the operation issued them. Keys are unique.
    pub writes: Vec<(StateKey, Vec<u8>)>,
    /// Events to hand back once the commit succeeds.
    pub events: Vec<LedgerEvent>,
}

/// Result of a commit attempt.
///
/// A conflict is not an error: the operation was valid against the snapshot
/// it read, the snapshot just went stale. Callers retry by re-executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome<T> {
    Committed {
        receipt: CommitReceipt,
        output: T,
        events: Vec<LedgerEvent>,
    },
    Aborted(Conflict),
}

impl<T> CommitOutcome<T> {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    pub fn receipt(&self) -> Option<&CommitReceipt> {
        match self {
            Self::Committed { receipt, .. } => Some(receipt),
            Self::Aborted(_) => None,
        }
    }

    pub fn output(&self) -> Option<&T> {
        match self {
            Self::Committed { output, .. } => Some(output),
            Self::Aborted(_) => None,
        }
    }

    pub fn events(&self) -> &[LedgerEvent] {
        match self {
            Self::Committed { events, .. } => events,
            Self::Aborted(_) => &[],
        }
    }

    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            Self::Committed { .. } => None,
            Self::Aborted(conflict) => Some(conflict),
        }
    }

    /// Replace the output, keeping receipt and events.
    pub fn with_output<U>(self, output: U) -> CommitOutcome<U> {
        match self {
            Self::Committed {
                receipt, events, ..
            } => CommitOutcome::Committed {
                receipt,
                output,
                events,
            },
            Self::Aborted(conflict) => CommitOutcome::Aborted(conflict),
        }
    }
}

/// A key-value store that keeps every committed version of every key and
/// validates read-sets at commit time.
///
/// Implementations must make `commit` all-or-nothing: on `Aborted` or `Err`
/// no write of the unit may be visible.
pub trait VersionedStore {
    /// Latest committed value of `key`.
    fn get(&self, key: &StateKey) -> Result<Option<VersionedValue>>;

    /// Every committed value of `key`, oldest first. Empty if never written.
    fn history(&self, key: &StateKey) -> Result<Vec<VersionedValue>>;

    /// Latest value of every key in `category`, in key order.
    fn scan(&self, category: KeyCategory) -> Result<Vec<(StateKey, VersionedValue)>>;

    fn version_of(&self, key: &StateKey) -> Result<Option<Version>> {
        Ok(self.get(key)?.map(|v| v.version))
    }

    /// Validate the read-set and, if it is still current, apply the writes
    /// under one new version.
    fn commit(&mut self, unit: CommitUnit) -> Result<CommitOutcome<()>>;

    /// Version of the most recent commit.
    fn height(&self) -> Version;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_outcome_accessors() {
        let outcome: CommitOutcome<u32> = CommitOutcome::Aborted(Conflict {
            key: StateKey::Supply,
            expected: Some(Version(1)),
            found: Some(Version(2)),
        });
        assert!(!outcome.is_committed());
        assert!(outcome.receipt().is_none());
        assert!(outcome.events().is_empty());
        assert_eq!(outcome.conflict().map(|c| c.found), Some(Some(Version(2))));
        assert!(outcome.with_output("x").output().is_none());
    }
}
