//! # Repository API Implementation
//!
//! Implements the `TxRepositoryApi` trait for read/write operations.

use super::*;
use crate::domain::entities::TxId;
use crate::domain::packing::IndexedTxRecord;
use crate::domain::value_objects::KeyPrefix;
use crate::ports::inbound::{IndexEntries, TxRepositoryApi};

impl<S, C, T> TxRepositoryApi<T> for TxRepository<S, C, T>
where
    S: VersionedStore,
    C: TxCodec<T>,
    T: IndexedTransaction,
{
    fn write(&mut self, height: u64, txs: &[T]) -> Result<(), RepositoryError> {
        if let Some(max) = self.config.max_txs_per_height {
            if txs.len() > max {
                return Err(RepositoryError::BatchTooLarge {
                    height,
                    count: txs.len(),
                    max,
                });
            }
        }

        let version = self.config.codec_version;

        // Encode everything before staging anything.
        let mut writes = Vec::with_capacity(txs.len() + 2);
        for tx in txs {
            let tx_bytes = self.codec.marshal_tx(version, tx)?;
            let record = IndexedTxRecord::new(height, tx_bytes).encode()?;
            writes.push((KeyPrefix::tx_key(&tx.id()), record));
        }
        writes.push((
            KeyPrefix::height_key(height),
            self.codec.marshal_batch(version, txs)?,
        ));
        writes.push((
            KeyPrefix::marker_key(),
            ProgressMarker::Complete { height }.encode(),
        ));

        for (key, value) in &writes {
            self.store.put(key, value)?;
        }

        tracing::debug!("[qc-tx] Indexed {} txs at #{}", txs.len(), height);
        Ok(())
    }

    fn get_by_tx_id(&self, tx_id: &TxId) -> Result<(T, u64), RepositoryError> {
        let bytes = self
            .store
            .get(&KeyPrefix::tx_key(tx_id))?
            .ok_or(RepositoryError::TxNotFound { tx_id: *tx_id })?;

        let record = IndexedTxRecord::decode(&bytes)?;
        let tx = self
            .codec
            .unmarshal_tx(&record.tx_bytes)
            .map_err(|e| RepositoryError::corruption("by-id transaction", e.to_string()))?;

        Ok((tx, record.height))
    }

    fn get_by_height(&self, height: u64) -> Result<Vec<T>, RepositoryError> {
        let bytes = self
            .store
            .get(&KeyPrefix::height_key(height))?
            .ok_or(RepositoryError::HeightNotFound { height })?;

        self.codec
            .unmarshal_batch(&bytes)
            .map_err(|e| RepositoryError::corruption("by-height batch", e.to_string()))
    }

    fn iterate_by_tx_id(&self) -> IndexEntries<'_> {
        Box::new(IndexIterator::new(
            &self.store,
            KeyPrefix::TxById,
            &[],
            self.config.scan_page_size,
        ))
    }

    fn iterate_by_height(&self, start: &[u8]) -> IndexEntries<'_> {
        Box::new(IndexIterator::new(
            &self.store,
            KeyPrefix::TxsByHeight,
            start,
            self.config.scan_page_size,
        ))
    }
}
