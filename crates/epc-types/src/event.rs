//! Notifications produced by committed operations.
//!
//! The core never publishes anything itself: events travel back to the
//! invocation layer inside the commit outcome and are published only once
//! the commit is durable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name under which an event is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    #[serde(rename = "MintEvent")]
    Mint,
    #[serde(rename = "BurnEvent")]
    Burn,
    #[serde(rename = "TransferEvent")]
    Transfer,
    #[serde(rename = "LockEvent")]
    Lock,
    #[serde(rename = "UnlockEvent")]
    Unlock,
}

impl EventName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "MintEvent",
            Self::Burn => "BurnEvent",
            Self::Transfer => "TransferEvent",
            Self::Lock => "LockEvent",
            Self::Unlock => "UnlockEvent",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event and its payload (the serialized transaction entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub name: EventName,
    pub payload: Vec<u8>,
}

impl LedgerEvent {
    #[must_use]
    pub fn new(name: EventName, payload: Vec<u8>) -> Self {
        Self { name, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_serialize_as_published() {
        let json = serde_json::to_string(&EventName::Transfer).unwrap();
        assert_eq!(json, "\"TransferEvent\"");
        assert_eq!(EventName::Lock.to_string(), "LockEvent");
    }
}
