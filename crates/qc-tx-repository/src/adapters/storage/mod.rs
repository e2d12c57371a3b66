//! Storage Adapters
//!
//! Implementations of the `VersionedStore` trait.

mod memory;
mod overlay;
#[cfg(feature = "rocksdb")]
mod rocksdb;

pub use memory::InMemoryVersionedStore;
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbConfig, RocksDbVersionedStore};
