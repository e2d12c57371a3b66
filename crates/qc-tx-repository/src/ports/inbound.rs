//! # Inbound Ports (Driving Ports)
//!
//! The API the repository exposes to the block-acceptance pipeline and to
//! query handlers.

use crate::domain::entities::TxId;
use crate::domain::errors::RepositoryError;

/// Raw `(key, value)` pair with the key-space prefix stripped.
pub type IndexEntry = (Vec<u8>, Vec<u8>);

/// Ordered iteration over one index space.
///
/// A store failure is yielded once as `Err`, after which iteration ends, so
/// callers must check every item before treating the end as success.
pub type IndexEntries<'a> = Box<dyn Iterator<Item = Result<IndexEntry, RepositoryError>> + 'a>;

/// Dual-index transaction repository.
pub trait TxRepositoryApi<T> {
    /// Index `txs` as the complete set accepted at `height`.
    ///
    /// ## Contract
    ///
    /// Must be called at most once per height. Writes are staged on the
    /// store and become durable only when the caller commits.
    ///
    /// ## Effects
    ///
    /// - One by-ID record per transaction
    /// - One by-height record holding the full batch (overwrites)
    /// - Progress marker set to `height`
    ///
    /// ## Errors
    ///
    /// - `BatchTooLarge`: a bound is configured and `txs` exceeds it
    /// - `Store` / `Codec`: underlying failure, nothing more is staged
    fn write(&mut self, height: u64, txs: &[T]) -> Result<(), RepositoryError>;

    /// Look up a transaction and the height it was accepted at.
    ///
    /// ## Errors
    ///
    /// - `TxNotFound`: no record for `tx_id`
    /// - `Corruption`: record present but malformed
    fn get_by_tx_id(&self, tx_id: &TxId) -> Result<(T, u64), RepositoryError>;

    /// All transactions accepted at `height`, in stored order.
    ///
    /// ## Errors
    ///
    /// - `HeightNotFound`: nothing indexed at `height`
    fn get_by_height(&self, height: u64) -> Result<Vec<T>, RepositoryError>;

    /// Raw by-ID entries in tx id order. Keys are bare tx ids.
    fn iterate_by_tx_id(&self) -> IndexEntries<'_>;

    /// Raw by-height entries in height order starting at `start`
    /// (inclusive, packed height bytes; empty means from the beginning).
    fn iterate_by_height(&self, start: &[u8]) -> IndexEntries<'_>;
}
