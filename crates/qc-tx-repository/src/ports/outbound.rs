//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the repository requires the host application to provide.

use crate::domain::entities::TxId;
use crate::domain::errors::{CodecError, StoreError};

/// Ordered `(key, value)` pairs returned by a scan.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// A key-value store with staged writes and explicit commit.
///
/// Writes are staged on the handle: they are visible to `get`/`scan` on the
/// same handle immediately, but are not durable until `commit` flushes every
/// staged key in one atomic unit.
///
/// Production: `RocksDbVersionedStore` (feature `rocksdb`)
/// Testing: `InMemoryVersionedStore`
pub trait VersionedStore: Send + Sync {
    /// Get a value by key, staged writes included.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stage a key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Return up to `limit` entries in ascending key order, starting at
    /// `start` (inclusive) and stopping at the first key outside `prefix`.
    fn scan(&self, start: &[u8], prefix: &[u8], limit: usize) -> Result<ScanResult, StoreError>;

    /// Atomically flush all staged writes.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Discard all staged writes.
    fn abort(&mut self);

    /// Number of staged keys.
    fn pending_writes(&self) -> usize;
}

/// Anything the repository can index: it only needs a stable id.
pub trait IndexedTransaction {
    fn id(&self) -> TxId;
}

/// Versioned serialization of transactions and transaction batches.
pub trait TxCodec<T>: Send + Sync {
    fn marshal_tx(&self, version: u16, tx: &T) -> Result<Vec<u8>, CodecError>;

    fn unmarshal_tx(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// Order-preserving batch encoding.
    fn marshal_batch(&self, version: u16, txs: &[T]) -> Result<Vec<u8>, CodecError>;

    fn unmarshal_batch(&self, bytes: &[u8]) -> Result<Vec<T>, CodecError>;
}
