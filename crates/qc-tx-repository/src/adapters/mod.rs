//! # Adapters Module
//!
//! ## Modules
//!
//! - `storage`: `VersionedStore` implementations (in-memory, RocksDB)
//! - `serializer`: `TxCodec` implementations (bincode)

pub mod serializer;
pub mod storage;

pub use serializer::BincodeTxCodec;
pub use storage::InMemoryVersionedStore;
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbVersionedStore};
