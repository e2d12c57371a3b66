//! # Value Objects
//!
//! Configuration and key layout for the transaction repository.

use crate::domain::entities::TxId;
use crate::domain::packing::pack_height;
use std::time::Duration;

/// Configuration for the repository and its construction-time migration.
///
/// All values have sensible defaults for production use.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Approximate payload bytes processed between migration checkpoints
    /// (default: 10 MiB).
    pub commit_size_cap: usize,

    /// Minimum time between migration progress log lines (default: 15s).
    pub progress_log_interval: Duration,

    /// Entries fetched per store scan (default: 1024).
    pub scan_page_size: usize,

    /// Optional upper bound on transactions written at a single height
    /// (default: none).
    pub max_txs_per_height: Option<usize>,

    /// Codec version used when marshalling (default: 0).
    pub codec_version: u16,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            commit_size_cap: 10 * 1024 * 1024, // 10 MiB
            progress_log_interval: Duration::from_secs(15),
            scan_page_size: 1024,
            max_txs_per_height: None,
            codec_version: 0,
        }
    }
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the checkpoint threshold in bytes.
    pub fn with_commit_size_cap(mut self, bytes: usize) -> Self {
        self.commit_size_cap = bytes;
        self
    }

    /// Set the migration heartbeat interval.
    pub fn with_progress_log_interval(mut self, interval: Duration) -> Self {
        self.progress_log_interval = interval;
        self
    }

    /// Set the scan page size. Zero is treated as one.
    pub fn with_scan_page_size(mut self, size: usize) -> Self {
        self.scan_page_size = size.max(1);
        self
    }

    /// Reject heights carrying more than `max` transactions.
    pub fn with_max_txs_per_height(mut self, max: usize) -> Self {
        self.max_txs_per_height = Some(max);
        self
    }

    pub fn with_codec_version(mut self, version: u16) -> Self {
        self.codec_version = version;
        self
    }
}

/// Key prefixes for the underlying versioned store.
///
/// The marker key sorts outside both index ranges, so a full scan of either
/// index never sees bookkeeping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// By-ID index: `i:{tx_id}` -> height ‖ len ‖ tx bytes
    TxById,
    /// By-height index: `h:{height}` -> codec-serialized tx batch
    TxsByHeight,
    /// Bookkeeping: `m:maxIndexedHeight` -> progress marker
    Metadata,
}

impl KeyPrefix {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::TxById => b"i:",
            KeyPrefix::TxsByHeight => b"h:",
            KeyPrefix::Metadata => b"m:",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let prefix = self.as_bytes();
        let mut key = Vec::with_capacity(prefix.len() + suffix.len());
        key.extend_from_slice(prefix);
        key.extend_from_slice(suffix);
        key
    }

    /// Strip this prefix from a full key.
    pub fn strip<'a>(&self, key: &'a [u8]) -> Option<&'a [u8]> {
        key.strip_prefix(self.as_bytes())
    }

    pub fn tx_key(tx_id: &TxId) -> Vec<u8> {
        KeyPrefix::TxById.key(tx_id)
    }

    pub fn height_key(height: u64) -> Vec<u8> {
        KeyPrefix::TxsByHeight.key(&pack_height(height))
    }

    /// Key of the progress marker.
    pub fn marker_key() -> Vec<u8> {
        KeyPrefix::Metadata.key(b"maxIndexedHeight")
    }
}
