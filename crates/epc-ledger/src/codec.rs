//! JSON encoding of stored records.
//!
//! Values are stored as serde_json bytes with camelCase field names and
//! decimals as strings, so the host store keeps the familiar wire layout.

use epc_types::{LedgerError, Result, StateKey};
use serde::{Serialize, de::DeserializeOwned};

pub fn encode<T: Serialize>(key: &StateKey, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| LedgerError::Serialization {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

pub fn decode<T: DeserializeOwned>(key: &StateKey, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::Serialization {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
