//! Write-set digests for cross-replica consistency.
//!
//! Two replicas that execute the same operations in the same order must
//! commit byte-identical write-sets. Comparing the 32-byte digest of each
//! commit is enough to detect divergence without shipping the values.

use epc_types::{StateKey, TxId, constants::COMMIT_DIGEST_DOMAIN};
use sha2::{Digest, Sha256};

/// Digest of one commit: domain, txId, write count, then every key string
/// and value in write order. Lengths are prefixed so adjacent fields cannot
/// run into each other.
#[must_use]
pub fn commit_digest(tx_id: &TxId, writes: &[(StateKey, Vec<u8>)]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(COMMIT_DIGEST_DOMAIN);
    hasher.update((tx_id.as_str().len() as u64).to_le_bytes());
    hasher.update(tx_id.as_str().as_bytes());
    hasher.update((writes.len() as u64).to_le_bytes());

    for (key, value) in writes {
        let key = key.to_string();
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value);
    }

    hasher.finalize().into()
}

#[must_use]
pub fn verify_commit_digest(
    tx_id: &TxId,
    writes: &[(StateKey, Vec<u8>)],
    expected: &[u8; 32],
) -> bool {
    commit_digest(tx_id, writes) == *expected
}

#[cfg(test)]
mod tests {
    use epc_types::AccountId;

    use super::*;

    fn writes() -> Vec<(StateKey, Vec<u8>)> {
        vec![
            (StateKey::balance(&AccountId::new("alice")), b"{\"balance\":\"1\"}".to_vec()),
            (StateKey::Supply, b"{\"totalSupply\":\"1\"}".to_vec()),
        ]
    }

    #[test]
    fn digest_is_deterministic() {
        let tx = TxId::new("t1");
        assert_eq!(commit_digest(&tx, &writes()), commit_digest(&tx, &writes()));
        assert!(verify_commit_digest(&tx, &writes(), &commit_digest(&tx, &writes())));
    }

    #[test]
    fn digest_depends_on_order() {
        let tx = TxId::new("t1");
        let mut reversed = writes();
        reversed.reverse();
        assert_ne!(commit_digest(&tx, &writes()), commit_digest(&tx, &reversed));
    }

    #[test]
    fn digest_depends_on_tx_id() {
        assert_ne!(
            commit_digest(&TxId::new("t1"), &writes()),
            commit_digest(&TxId::new("t2"), &writes())
        );
    }

    #[test]
    fn empty_write_set_digest() {
        let d = commit_digest(&TxId::new("t1"), &[]);
        assert_ne!(d, [0u8; 32]);
    }
}
