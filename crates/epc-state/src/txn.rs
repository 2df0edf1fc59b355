//! Execution-side view of the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use epc_types::{KeyCategory, LedgerError, LedgerEvent, Result, StateKey, TxId};

use crate::{CommitUnit, Version, VersionedStore, VersionedValue};

/// Identity and commit time of one logical operation, assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
}

impl TxContext {
    #[must_use]
    pub fn new(tx_id: impl Into<TxId>, timestamp: DateTime<Utc>) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
        }
    }
}

/// A single operation's view of committed state.
///
/// Reads see the operation's own buffered writes first, then the store.
/// Every read that reaches the store is recorded with the version observed.
/// A transaction opened with [`StateTxn::read_only`] rejects writes and
/// events and cannot become a commit unit.
pub struct StateTxn<'s, S: VersionedStore + ?Sized> {
    store: &'s S,
    ctx: Option<TxContext>,
    read_set: BTreeMap<StateKey, Option<Version>>,
    writes: Vec<(StateKey, Vec<u8>)>,
    events: Vec<LedgerEvent>,
}

impl<'s, S: VersionedStore + ?Sized> StateTxn<'s, S> {
    #[must_use]
    pub fn new(store: &'s S, ctx: TxContext) -> Self {
        Self {
            store,
            ctx: Some(ctx),
            read_set: BTreeMap::new(),
            writes: Vec::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn read_only(store: &'s S) -> Self {
        Self {
            store,
            ctx: None,
            read_set: BTreeMap::new(),
            writes: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn context(&self) -> Result<&TxContext> {
        self.ctx.as_ref().ok_or(LedgerError::ReadOnlyTransaction)
    }

    pub fn tx_id(&self) -> Result<&TxId> {
        Ok(&self.context()?.tx_id)
    }

    pub fn timestamp(&self) -> Result<DateTime<Utc>> {
        Ok(self.context()?.timestamp)
    }

    pub fn get(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>> {
        if let Some((_, value)) = self.writes.iter().find(|(k, _)| k == key) {
            return Ok(Some(value.clone()));
        }
        let current = self.store.get(key)?;
        self.observe(key, current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.value))
    }

    /// Committed history of `key`. Buffered writes are not included.
    pub fn history(&mut self, key: &StateKey) -> Result<Vec<VersionedValue>> {
        let history = self.store.history(key)?;
        self.observe(key, history.last().map(|v| v.version));
        Ok(history)
    }

    /// Committed values of a category. Buffered writes are not included.
    pub fn scan(&mut self, category: KeyCategory) -> Result<Vec<(StateKey, Vec<u8>)>> {
        let entries = self.store.scan(category)?;
        let mut out = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            self.observe(&key, Some(value.version));
            out.push((key, value.value));
        }
        Ok(out)
    }

    /// Buffer a write. Writing a key twice keeps its first position.
    pub fn put(&mut self, key: StateKey, value: Vec<u8>) -> Result<()> {
        self.context()?;
        match self.writes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.writes.push((key, value)),
        }
        Ok(())
    }

    pub fn emit(&mut self, event: LedgerEvent) -> Result<()> {
        self.context()?;
        self.events.push(event);
        Ok(())
    }

    pub fn read_set(&self) -> &BTreeMap<StateKey, Option<Version>> {
        &self.read_set
    }

    pub fn writes(&self) -> &[(StateKey, Vec<u8>)] {
        &self.writes
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn into_commit_unit(self) -> Result<CommitUnit> {
        let ctx = self.ctx.ok_or(LedgerError::ReadOnlyTransaction)?;
        Ok(CommitUnit {
            tx_id: ctx.tx_id,
            timestamp: ctx.timestamp,
            read_set: self.read_set,
            writes: self.writes,
            events: self.events,
        })
    }

    // The first observation of a key wins; the store cannot move under a
    // shared borrow, so later ones would agree anyway.
    fn observe(&mut self, key: &StateKey, version: Option<Version>) {
        self.read_set.entry(key.clone()).or_insert(version);
    }
}
