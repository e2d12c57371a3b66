use super::overlay::{merge_page, scan_start, PendingWrites};
use crate::domain::errors::StoreError;
use crate::ports::outbound::{ScanResult, VersionedStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory versioned store for unit tests.
///
/// Committed data lives behind a shared lock so that [`reopen`](Self::reopen)
/// can hand out a fresh handle over the same committed state. Dropping a
/// handle with staged writes is how tests simulate a crash.
#[derive(Default)]
pub struct InMemoryVersionedStore {
    committed: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
    pending: PendingWrites,
    commits: usize,
}

impl InMemoryVersionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new handle over the same committed data, with nothing staged.
    pub fn reopen(&self) -> Self {
        Self {
            committed: Arc::clone(&self.committed),
            pending: PendingWrites::new(),
            commits: 0,
        }
    }

    /// Number of successful commits issued through this handle.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Committed value for `key`, ignoring anything staged.
    pub fn committed_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.committed.read().get(key).cloned()
    }

    /// Number of committed keys.
    pub fn committed_len(&self) -> usize {
        self.committed.read().len()
    }
}

impl VersionedStore for InMemoryVersionedStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        Ok(self.committed_get(key))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn scan(&self, start: &[u8], prefix: &[u8], limit: usize) -> Result<ScanResult, StoreError> {
        let committed = self.committed.read();
        let from = scan_start(start, prefix).to_vec();
        let iter = committed
            .range(from..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| Ok((key.clone(), value.clone())));

        merge_page(iter, &self.pending, start, prefix, limit)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let staged = std::mem::take(&mut self.pending);
        self.committed.write().extend(staged);
        self.commits += 1;
        Ok(())
    }

    fn abort(&mut self) {
        self.pending.clear();
    }

    fn pending_writes(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_writes_visible_before_commit() {
        let mut store = InMemoryVersionedStore::new();
        store.put(b"key1", b"value1").unwrap();

        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.committed_get(b"key1"), None);
        assert_eq!(store.pending_writes(), 1);
    }

    #[test]
    fn test_commit_flushes_everything() {
        let mut store = InMemoryVersionedStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();
        store.commit().unwrap();

        assert_eq!(store.pending_writes(), 0);
        assert_eq!(store.committed_len(), 2);
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn test_reopen_sees_only_committed() {
        let mut store = InMemoryVersionedStore::new();
        store.put(b"durable", b"1").unwrap();
        store.commit().unwrap();
        store.put(b"lost", b"2").unwrap();

        let reopened = store.reopen();
        assert_eq!(reopened.get(b"durable").unwrap(), Some(b"1".to_vec()));
        assert_eq!(reopened.get(b"lost").unwrap(), None);
    }

    #[test]
    fn test_abort_discards_staged() {
        let mut store = InMemoryVersionedStore::new();
        store.put(b"key", b"value").unwrap();
        store.abort();

        assert_eq!(store.get(b"key").unwrap(), None);
    }

    #[test]
    fn test_scan_respects_prefix_and_start() {
        let mut store = InMemoryVersionedStore::new();
        store.put(b"h:1", b"one").unwrap();
        store.put(b"h:2", b"two").unwrap();
        store.commit().unwrap();
        store.put(b"h:3", b"three").unwrap();
        store.put(b"i:1", b"other").unwrap();

        let all = store.scan(b"", b"h:", 100).unwrap();
        assert_eq!(all.len(), 3);

        let tail = store.scan(b"h:2", b"h:", 100).unwrap();
        let keys: Vec<_> = tail.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![&b"h:2"[..], b"h:3"]);
    }
}
