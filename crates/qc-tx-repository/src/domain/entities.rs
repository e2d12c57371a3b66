//! # Entities
//!
//! The repository treats transactions as opaque, identifiable units. The only
//! thing it needs from a transaction is its fixed-width id (see
//! [`IndexedTransaction`](crate::ports::outbound::IndexedTransaction)).
//!
//! [`AtomicTransaction`] is the concrete shape accepted by the node's
//! block-acceptance pipeline and is what the default codec stores.

use crate::ports::outbound::IndexedTransaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Width of a transaction id in bytes.
pub const TX_ID_LEN: usize = 32;

/// Globally unique transaction identifier.
pub type TxId = [u8; TX_ID_LEN];

/// 32-byte chain identifier.
pub type ChainId = [u8; 32];

/// A cross-chain (import/export) transaction accepted at some height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicTransaction {
    /// Chain on the other side of the transfer.
    pub source_chain: ChainId,
    /// Sender-scoped nonce.
    pub nonce: u64,
    /// Amount moved, in base units.
    pub amount: u64,
    /// Opaque body (inputs/outputs as encoded by the VM).
    pub payload: Vec<u8>,
    /// Signature bytes over the unsigned fields.
    pub signature: Vec<u8>,
}

impl AtomicTransaction {
    pub fn new(source_chain: ChainId, nonce: u64, amount: u64, payload: Vec<u8>) -> Self {
        Self {
            source_chain,
            nonce,
            amount,
            payload,
            signature: Vec::new(),
        }
    }

    /// SHA-256 over the unsigned fields.
    pub fn compute_id(&self) -> TxId {
        let mut hasher = Sha256::new();
        hasher.update(self.source_chain);
        hasher.update(self.nonce.to_be_bytes());
        hasher.update(self.amount.to_be_bytes());
        hasher.update((self.payload.len() as u64).to_be_bytes());
        hasher.update(&self.payload);
        hasher.finalize().into()
    }
}

impl IndexedTransaction for AtomicTransaction {
    fn id(&self) -> TxId {
        self.compute_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_deterministic() {
        let a = AtomicTransaction::new([1; 32], 7, 100, vec![1, 2, 3]);
        let b = AtomicTransaction::new([1; 32], 7, 100, vec![1, 2, 3]);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_ignores_signature() {
        let a = AtomicTransaction::new([1; 32], 7, 100, vec![]);
        let mut b = a.clone();
        b.signature = vec![0xFF; 65];
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_frames_payload_with_u64_length() {
        let tx = AtomicTransaction::new([3; 32], 4, 5, vec![0xAA, 0xBB]);

        let mut expected = Sha256::new();
        expected.update([3u8; 32]);
        expected.update(4u64.to_be_bytes());
        expected.update(5u64.to_be_bytes());
        expected.update(2u64.to_be_bytes());
        expected.update([0xAA, 0xBB]);
        let expected: TxId = expected.finalize().into();

        assert_eq!(tx.id(), expected);
    }

    #[test]
    fn test_id_changes_with_nonce() {
        let a = AtomicTransaction::new([1; 32], 1, 100, vec![]);
        let b = AtomicTransaction::new([1; 32], 2, 100, vec![]);
        assert_ne!(a.id(), b.id());
    }
}
