//! # RocksDB Versioned Store
//!
//! Production implementation of [`VersionedStore`].
//!
//! Staged writes are held in an ordered overlay on the handle and flushed
//! with a single `WriteBatch` on commit, so both index spaces and the
//! progress marker land together or not at all.

use super::overlay::{merge_page, scan_start, PendingWrites};
use crate::domain::errors::StoreError;
use crate::ports::outbound::{ScanResult, VersionedStore};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::sync::Arc;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 256MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 64MB)
    pub write_buffer_size: usize,
    /// fsync on commit (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/tx-repository".to_string(),
            block_cache_size: 256 * 1024 * 1024, // 256MB
            write_buffer_size: 64 * 1024 * 1024, // 64MB
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            sync_writes: false,
        }
    }
}

/// RocksDB-backed versioned store.
pub struct RocksDbVersionedStore {
    db: Arc<RwLock<DB>>,
    pending: PendingWrites,
    config: RocksDbConfig,
}

impl RocksDbVersionedStore {
    /// Open or create a database.
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| StoreError::Io {
            message: format!("Failed to open RocksDB: {}", e),
        })?;

        tracing::info!("[qc-tx] 💾 Opened RocksDB store at {}", config.path);

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            pending: PendingWrites::new(),
            config,
        })
    }

    /// A new handle over the same database, with nothing staged.
    pub fn reopen(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            pending: PendingWrites::new(),
            config: self.config.clone(),
        }
    }
}

impl VersionedStore for RocksDbVersionedStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        let db = self.db.read();
        db.get(key).map_err(|e| StoreError::Io {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn scan(&self, start: &[u8], prefix: &[u8], limit: usize) -> Result<ScanResult, StoreError> {
        let db = self.db.read();
        let from = scan_start(start, prefix);
        let iter = db
            .iterator(IteratorMode::From(from, Direction::Forward))
            .map(|item| {
                item.map(|(key, value)| (key.to_vec(), value.to_vec()))
                    .map_err(|e| StoreError::Io {
                        message: format!("RocksDB scan failed: {}", e),
                    })
            })
            .take_while(|item| match item {
                Ok((key, _)) => key.starts_with(prefix),
                Err(_) => true,
            });

        merge_page(iter, &self.pending, start, prefix, limit)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut batch = WriteBatch::default();
        for (key, value) in &self.pending {
            batch.put(key, value);
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);

        let db = self.db.write();
        db.write_opt(batch, &write_opts)
            .map_err(|e| StoreError::Commit {
                message: format!("RocksDB batch write failed: {}", e),
            })?;

        self.pending.clear();
        Ok(())
    }

    fn abort(&mut self) {
        self.pending.clear();
    }

    fn pending_writes(&self) -> usize {
        self.pending.len()
    }
}
