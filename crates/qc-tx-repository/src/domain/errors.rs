//! # Domain Errors
//!
//! Error types for the transaction repository.
//!
//! ## Taxonomy
//!
//! | Kind | Variant | Handling |
//! |------|---------|----------|
//! | Not found | `TxNotFound`, `HeightNotFound` | Recoverable, caller decides |
//! | Corruption | `Corruption` | Fatal to the calling operation, never repaired |
//! | Store failure | `Store` | Propagated unchanged |
//! | Codec failure | `Codec` | Propagated unchanged |
//!
//! Nothing in this crate retries. Every failure is returned to the caller.

use crate::domain::entities::TxId;
use thiserror::Error;

/// Errors returned by the repository API and by construction-time migration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No by-ID record exists for this transaction.
    #[error("Transaction not found: {}", hex::encode(tx_id))]
    TxNotFound { tx_id: TxId },

    /// No by-height record exists for this height.
    #[error("No transactions indexed at height {height}")]
    HeightNotFound { height: u64 },

    /// A stored value has an unexpected shape.
    #[error("Corrupted {what}: {reason}")]
    Corruption { what: &'static str, reason: String },

    /// A single height carried more transactions than the opt-in bound.
    #[error("Too many transactions at height {height}: {count} (max {max})")]
    BatchTooLarge { height: u64, count: usize, max: usize },

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Serialization failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl RepositoryError {
    pub(crate) fn corruption(what: &'static str, reason: impl Into<String>) -> Self {
        RepositoryError::Corruption {
            what,
            reason: reason.into(),
        }
    }

    /// True for either not-found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::TxNotFound { .. } | RepositoryError::HeightNotFound { .. }
        )
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, RepositoryError::Corruption { .. })
    }
}

/// Versioned key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// I/O error during read/write/scan.
    #[error("Store I/O error: {message}")]
    Io { message: String },

    /// Staged writes could not be flushed.
    #[error("Store commit failed: {message}")]
    Commit { message: String },
}

/// Transaction codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The version prefix names a format this codec does not understand.
    #[error("Unknown codec version {version}")]
    UnknownVersion { version: u16 },

    /// Input is shorter than the version prefix.
    #[error("Encoded value truncated: {len} bytes")]
    Truncated { len: usize },

    #[error("Encode failed: {message}")]
    Encode { message: String },

    #[error("Decode failed: {message}")]
    Decode { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(RepositoryError::TxNotFound { tx_id: [0xAB; 32] }.is_not_found());
        assert!(RepositoryError::HeightNotFound { height: 7 }.is_not_found());
        assert!(!RepositoryError::corruption("marker", "bad length").is_not_found());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: RepositoryError = StoreError::Io {
            message: "disk failure".to_string(),
        }
        .into();

        match err {
            RepositoryError::Store(StoreError::Io { message }) => {
                assert!(message.contains("disk failure"));
            }
            other => panic!("Expected Store error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = RepositoryError::TxNotFound { tx_id: [0xAB; 32] };
        assert!(err.to_string().starts_with("Transaction not found: abab"));

        let err = RepositoryError::corruption("progress marker", "length 5");
        assert_eq!(err.to_string(), "Corrupted progress marker: length 5");
        assert!(err.is_corruption());
    }
}
