//! # Transaction Repository (qc-tx)
//!
//! Durable, dual-index storage for accepted cross-chain transactions.
//!
//! Every transaction accepted at a height is stored twice:
//!
//! | Space | Key | Value |
//! |-------|-----|-------|
//! | by-ID | `i:{tx_id}` | `height (u64 BE) ‖ len (u32 BE) ‖ tx bytes` |
//! | by-height | `h:{height u64 BE}` | codec-serialized tx batch |
//! | marker | `m:maxIndexedHeight` | progress marker |
//!
//! Both spaces and the marker live in one versioned store and commit
//! together, so readers never observe half of a height.
//!
//! ## Height Index Migration
//!
//! Older stores only carry the by-ID space. On [`TxRepository::open`] the
//! progress marker decides whether to build the height index from scratch,
//! resume an interrupted build, or do nothing. The build checkpoints every
//! 10 MiB of payload and runs to completion before the repository is handed
//! out.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): packing, marker, keys, errors, config
//! - **Ports Layer** (`ports/`): `TxRepositoryApi` in, `VersionedStore` and
//!   `TxCodec` out
//! - **Adapters Layer** (`adapters/`): in-memory and RocksDB stores, bincode codec
//! - **Service** (`service/`): `TxRepository` and its migration
//!
//! ## Usage
//!
//! ```ignore
//! use qc_tx_repository::{
//!     BincodeTxCodec, InMemoryVersionedStore, RepositoryConfig, TxRepository, TxRepositoryApi,
//! };
//!
//! let mut repo = TxRepository::open(
//!     InMemoryVersionedStore::new(),
//!     BincodeTxCodec::default(),
//!     last_accepted_height,
//!     RepositoryConfig::default(),
//! )?;
//!
//! repo.write(height, &accepted_txs)?;
//! repo.commit()?;
//!
//! let (tx, height) = repo.get_by_tx_id(&tx_id)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    pack_height, unpack_height, AtomicTransaction, ChainId, CodecError, IndexedTxRecord,
    KeyPrefix, ProgressMarker, RepositoryConfig, RepositoryError, StoreError, TxId, HEIGHT_LEN,
    TX_ID_LEN,
};

pub use ports::inbound::{IndexEntries, IndexEntry, TxRepositoryApi};
pub use ports::outbound::{IndexedTransaction, ScanResult, TxCodec, VersionedStore};

pub use adapters::{BincodeTxCodec, InMemoryVersionedStore};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbVersionedStore};

pub use service::{IndexIterator, MigrationReport, MigrationState, TxRepository};
