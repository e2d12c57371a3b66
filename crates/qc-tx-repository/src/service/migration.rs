//! # Height Index Migration
//!
//! Builds the by-height index from a pre-existing by-ID index. Runs once,
//! synchronously, inside [`TxRepository::open`](super::TxRepository::open).
//!
//! ## State Machine
//!
//! ```text
//! marker absent ────────→ Fresh ──────┐
//! marker = cursor ──────→ Resuming ───┼──→ scan by-ID ──→ marker = last accepted height
//! marker = height ──────→ Done (no-op)┘
//! ```
//!
//! Every `commit_size_cap` bytes of payload the cursor is written to the
//! marker and the store is committed. A crash therefore redoes at most one
//! checkpoint interval, and the duplicate guard in the merge step makes the
//! redo harmless.

use super::iter::key_successor;
use crate::domain::entities::TxId;
use crate::domain::errors::RepositoryError;
use crate::domain::marker::ProgressMarker;
use crate::domain::packing::IndexedTxRecord;
use crate::domain::value_objects::{KeyPrefix, RepositoryConfig};
use crate::ports::outbound::{IndexedTransaction, TxCodec, VersionedStore};
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// Where the migration starts, as read from the progress marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    /// No marker: build the whole height index.
    Fresh,
    /// Interrupted run: continue from `cursor` (inclusive).
    Resuming { cursor: TxId },
    /// Height index already complete through `height`.
    Done { height: u64 },
}

impl MigrationState {
    pub fn from_marker(marker: Option<ProgressMarker>) -> Self {
        match marker {
            None => MigrationState::Fresh,
            Some(ProgressMarker::InProgress { cursor }) => MigrationState::Resuming { cursor },
            Some(ProgressMarker::Complete { height }) => MigrationState::Done { height },
        }
    }
}

/// Outcome of one migration invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// State the run started from.
    pub state: MigrationState,
    /// Transactions appended to the height index.
    pub indexed_txs: u64,
    /// Transactions already present at their height and left alone.
    pub duplicates_skipped: u64,
    /// Intermediate commits.
    pub checkpoints: u64,
    /// Serialized transaction bytes read from the by-ID index.
    pub bytes_processed: u64,
    pub duration: Duration,
}

impl MigrationReport {
    fn new(state: MigrationState) -> Self {
        Self {
            state,
            indexed_txs: 0,
            duplicates_skipped: 0,
            checkpoints: 0,
            bytes_processed: 0,
            duration: Duration::ZERO,
        }
    }

    /// True if the run did nothing because the index was already complete.
    pub fn was_noop(&self) -> bool {
        matches!(self.state, MigrationState::Done { .. })
    }
}

/// Read and decode the progress marker.
pub(crate) fn read_marker<S: VersionedStore + ?Sized>(
    store: &S,
) -> Result<Option<ProgressMarker>, RepositoryError> {
    store
        .get(&KeyPrefix::marker_key())?
        .map(|bytes| ProgressMarker::decode(&bytes))
        .transpose()
}

/// Tx id suffix of a scanned by-ID key.
fn cursor_from_key(key: &[u8]) -> Result<TxId, RepositoryError> {
    KeyPrefix::TxById
        .strip(key)
        .and_then(|suffix| TxId::try_from(suffix).ok())
        .ok_or_else(|| {
            RepositoryError::corruption(
                "by-id key",
                format!("not a tx id key: {}", hex::encode(key)),
            )
        })
}

/// One migration invocation. All progress state is local to the run.
pub(crate) struct Migration<'a, S, C, T> {
    store: &'a mut S,
    codec: &'a C,
    config: &'a RepositoryConfig,
    pending_bytes: usize,
    last_log: Instant,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, S, C, T> Migration<'a, S, C, T>
where
    S: VersionedStore,
    C: TxCodec<T>,
    T: IndexedTransaction,
{
    pub(crate) fn new(store: &'a mut S, codec: &'a C, config: &'a RepositoryConfig) -> Self {
        Self {
            store,
            codec,
            config,
            pending_bytes: 0,
            last_log: Instant::now(),
            _marker: PhantomData,
        }
    }

    /// Run to completion or first failure.
    pub(crate) fn run(mut self, last_accepted_height: u64) -> Result<MigrationReport, RepositoryError> {
        let started = Instant::now();
        let state = MigrationState::from_marker(read_marker(&*self.store)?);
        let mut report = MigrationReport::new(state);

        let mut start = match state {
            MigrationState::Done { height } => {
                tracing::debug!("[qc-tx] Height index already complete through #{}", height);
                return Ok(report);
            }
            MigrationState::Fresh => {
                tracing::info!("[qc-tx] 🔧 Initializing transaction repository from scratch");
                KeyPrefix::TxById.key(&[])
            }
            MigrationState::Resuming { cursor } => {
                tracing::info!(
                    "[qc-tx] 🔧 Resuming transaction repository migration from tx 0x{}",
                    hex::encode(cursor)
                );
                KeyPrefix::tx_key(&cursor)
            }
        };

        self.last_log = started;
        let page_size = self.config.scan_page_size.max(1);

        loop {
            let page = self
                .store
                .scan(&start, KeyPrefix::TxById.as_bytes(), page_size)?;
            let exhausted = page.len() < page_size;
            if let Some((last, _)) = page.last() {
                start = key_successor(last);
            }

            for (key, value) in page {
                let cursor = cursor_from_key(&key)?;
                self.migrate_entry(cursor, &value, &mut report)?;
            }

            if exhausted {
                break;
            }
        }

        let marker = ProgressMarker::Complete {
            height: last_accepted_height,
        };
        self.store.put(&KeyPrefix::marker_key(), &marker.encode())?;
        self.store.commit()?;

        report.duration = started.elapsed();
        tracing::info!(
            "[qc-tx] ✓ Completed transaction repository migration: {} txs indexed, {} duplicates skipped, last accepted #{}, took {:?}",
            report.indexed_txs,
            report.duplicates_skipped,
            last_accepted_height,
            report.duration
        );
        Ok(report)
    }

    /// Merge one by-ID entry into the height index. `cursor` is the entry's
    /// stored key, which is what a resumed scan seeks to.
    fn migrate_entry(
        &mut self,
        cursor: TxId,
        value: &[u8],
        report: &mut MigrationReport,
    ) -> Result<(), RepositoryError> {
        let record = IndexedTxRecord::decode(value)?;
        let tx = self
            .codec
            .unmarshal_tx(&record.tx_bytes)
            .map_err(|e| RepositoryError::corruption("by-id transaction", e.to_string()))?;

        if self.add_to_height_index(record.height, tx)? {
            report.indexed_txs += 1;
        } else {
            report.duplicates_skipped += 1;
        }

        self.pending_bytes += record.tx_bytes.len();
        report.bytes_processed += record.tx_bytes.len() as u64;

        if self.pending_bytes > self.config.commit_size_cap {
            self.checkpoint(cursor)?;
            report.checkpoints += 1;
        }

        if self.last_log.elapsed() > self.config.progress_log_interval {
            self.last_log = Instant::now();
            tracing::info!(
                "[qc-tx] Transaction repository migration: {} txs indexed",
                report.indexed_txs + report.duplicates_skipped
            );
        }
        Ok(())
    }

    /// Append `tx` to the batch at `height` unless it is already there.
    fn add_to_height_index(&mut self, height: u64, tx: T) -> Result<bool, RepositoryError> {
        let key = KeyPrefix::height_key(height);
        let mut txs = match self.store.get(&key)? {
            Some(bytes) => self
                .codec
                .unmarshal_batch(&bytes)
                .map_err(|e| RepositoryError::corruption("by-height batch", e.to_string()))?,
            None => Vec::new(),
        };

        let tx_id = tx.id();
        if txs.iter().any(|existing| existing.id() == tx_id) {
            tracing::debug!(
                "[qc-tx] Tx 0x{} already indexed at #{}, skipping",
                hex::encode(&tx_id[..8]),
                height
            );
            return Ok(false);
        }

        txs.push(tx);
        let bytes = self.codec.marshal_batch(self.config.codec_version, &txs)?;
        self.store.put(&key, &bytes)?;
        Ok(true)
    }

    fn checkpoint(&mut self, cursor: TxId) -> Result<(), RepositoryError> {
        let marker = ProgressMarker::InProgress { cursor };
        self.store.put(&KeyPrefix::marker_key(), &marker.encode())?;
        self.store.commit()?;
        self.pending_bytes = 0;

        tracing::info!(
            "[qc-tx] 💾 Committed migration checkpoint at tx 0x{}",
            hex::encode(cursor)
        );
        Ok(())
    }
}
