//! # Transaction Repository Service
//!
//! Owns the versioned store and maintains two views over accepted
//! transactions: by id and by height.
//!
//! ## Lifecycle
//!
//! 1. `open` reads the progress marker and runs the height index migration
//!    to completion (or fails, returning no repository)
//! 2. The block-acceptance pipeline calls `write` once per accepted height
//!    and commits
//! 3. Query handlers call `get_by_tx_id` / `get_by_height` / iteration
//!
//! Reads take `&self` and writes take `&mut self`; share the repository
//! behind a lock if readers and the writer live on different threads.

mod iter;
mod migration;
mod repository;

pub use iter::IndexIterator;
pub use migration::{MigrationReport, MigrationState};

use crate::domain::errors::RepositoryError;
use crate::domain::marker::ProgressMarker;
use crate::domain::value_objects::RepositoryConfig;
use crate::ports::outbound::{IndexedTransaction, TxCodec, VersionedStore};
use migration::{read_marker, Migration};
use std::marker::PhantomData;

/// Dual-index transaction repository.
pub struct TxRepository<S, C, T>
where
    S: VersionedStore,
    C: TxCodec<T>,
    T: IndexedTransaction,
{
    /// Versioned store holding both index spaces and the marker.
    pub(crate) store: S,
    /// Transaction codec.
    pub(crate) codec: C,
    pub(crate) config: RepositoryConfig,
    /// Report of the migration run performed by `open`.
    pub(crate) last_migration: MigrationReport,
    _marker: PhantomData<fn() -> T>,
}

impl<S, C, T> TxRepository<S, C, T>
where
    S: VersionedStore,
    C: TxCodec<T>,
    T: IndexedTransaction,
{
    /// Open the repository, building the height index first if needed.
    ///
    /// `last_accepted_height` is the height the rest of the node already
    /// considers accepted; a completed migration records it as the marker.
    ///
    /// ## Errors
    ///
    /// Any marker, decode, store or codec failure during migration. The
    /// store is dropped with whatever was last checkpointed.
    pub fn open(
        mut store: S,
        codec: C,
        last_accepted_height: u64,
        config: RepositoryConfig,
    ) -> Result<Self, RepositoryError> {
        let report =
            Migration::<S, C, T>::new(&mut store, &codec, &config).run(last_accepted_height)?;

        Ok(Self {
            store,
            codec,
            config,
            last_migration: report,
            _marker: PhantomData,
        })
    }

    /// Height recorded by the progress marker, `None` if never written.
    ///
    /// ## Errors
    ///
    /// - `Corruption`: marker malformed, or still holds a migration cursor
    pub fn index_height(&self) -> Result<Option<u64>, RepositoryError> {
        match read_marker(&self.store)? {
            None => Ok(None),
            Some(ProgressMarker::Complete { height }) => Ok(Some(height)),
            Some(ProgressMarker::InProgress { cursor }) => Err(RepositoryError::corruption(
                "progress marker",
                format!("migration cursor 0x{} after open", hex::encode(cursor)),
            )),
        }
    }

    /// Flush all staged writes.
    pub fn commit(&mut self) -> Result<(), RepositoryError> {
        self.store.commit()?;
        Ok(())
    }

    /// Discard all staged writes.
    pub fn abort(&mut self) {
        self.store.abort();
    }

    pub fn last_migration(&self) -> &MigrationReport {
        &self.last_migration
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, staged writes included.
    pub fn into_store(self) -> S {
        self.store
    }
}
