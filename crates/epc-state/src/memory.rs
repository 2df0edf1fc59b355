//! In-memory [`VersionedStore`] with full per-key history.

use std::collections::{BTreeMap, BTreeSet};

use epc_types::{KeyCategory, LedgerError, Result, StateKey};
use tracing::{debug, warn};

use crate::{
    CommitOutcome, CommitReceipt, CommitUnit, Conflict, Version, VersionedStore, VersionedValue,
    commit_digest,
};

/// Reference store for tests and embedding.
///
/// Versions of a key are kept oldest first and never removed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<StateKey, Vec<VersionedValue>>,
    height: Version,
    receipts: Vec<CommitReceipt>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Receipts of every commit so far, oldest first.
    pub fn receipts(&self) -> &[CommitReceipt] {
        &self.receipts
    }

    /// Number of distinct keys ever written.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self, read_set: &BTreeMap<StateKey, Option<Version>>) -> Option<Conflict> {
        read_set.iter().find_map(|(key, expected)| {
            let found = self
                .entries
                .get(key)
                .and_then(|h| h.last())
                .map(|v| v.version);
            (found != *expected).then(|| Conflict {
                key: key.clone(),
                expected: *expected,
                found,
            })
        })
    }
}

impl VersionedStore for MemoryStore {
    fn get(&self, key: &StateKey) -> Result<Option<VersionedValue>> {
        Ok(self.entries.get(key).and_then(|h| h.last()).cloned())
    }

    fn history(&self, key: &StateKey) -> Result<Vec<VersionedValue>> {
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }

    fn scan(&self, category: KeyCategory) -> Result<Vec<(StateKey, VersionedValue)>> {
        Ok(self
            .entries
            .iter()
            .filter(|(key, _)| key.category() == category)
            .filter_map(|(key, history)| history.last().map(|v| (key.clone(), v.clone())))
            .collect())
    }

    fn commit(&mut self, unit: CommitUnit) -> Result<CommitOutcome<()>> {
        let CommitUnit {
            tx_id,
            timestamp,
            read_set,
            writes,
            events,
        } = unit;

        if writes.is_empty() {
            return Err(LedgerError::Internal(format!(
                "commit unit {tx_id} has no writes"
            )));
        }
        let mut seen = BTreeSet::new();
        if let Some((dup, _)) = writes.iter().find(|(key, _)| !seen.insert(key)) {
            return Err(LedgerError::Internal(format!(
                "commit unit {tx_id} writes {dup} twice"
            )));
        }

        if let Some(conflict) = self.validate(&read_set) {
            warn!(tx_id = %tx_id, %conflict, "commit aborted");
            return Ok(CommitOutcome::Aborted(conflict));
        }

        let version = self.height.next();
        let digest = commit_digest(&tx_id, &writes);
        let keys_written: Vec<StateKey> = writes.iter().map(|(key, _)| key.clone()).collect();

        for (key, value) in writes {
            self.entries.entry(key).or_default().push(VersionedValue {
                version,
                tx_id: tx_id.clone(),
                timestamp,
                value,
            });
        }
        self.height = version;

        let receipt = CommitReceipt {
            tx_id,
            version,
            keys_written,
            digest,
        };
        debug!(
            tx_id = %receipt.tx_id,
            %version,
            keys = receipt.keys_written.len(),
            "commit applied"
        );
        self.receipts.push(receipt.clone());

        Ok(CommitOutcome::Committed {
            receipt,
            output: (),
            events,
        })
    }

    fn height(&self) -> Version {
        self.height
    }
}
