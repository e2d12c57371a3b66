//! # Index Iterator
//!
//! Lazily paged, ordered iteration over one key space.

use crate::domain::errors::RepositoryError;
use crate::domain::value_objects::KeyPrefix;
use crate::ports::inbound::IndexEntry;
use crate::ports::outbound::VersionedStore;
use std::collections::VecDeque;

/// Smallest key strictly greater than `key`.
pub(crate) fn key_successor(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0);
    next
}

/// Ordered iterator over one key space.
///
/// Fetches `page_size` entries at a time. If the store reports an error the
/// iterator yields it once and is then exhausted, so callers must check every
/// item before treating the end of iteration as success.
pub struct IndexIterator<'a> {
    store: &'a dyn VersionedStore,
    space: KeyPrefix,
    next_start: Vec<u8>,
    page_size: usize,
    buffer: VecDeque<IndexEntry>,
    finished: bool,
}

impl<'a> IndexIterator<'a> {
    /// Iterate `space` from `start` (inclusive, without prefix).
    pub fn new(
        store: &'a dyn VersionedStore,
        space: KeyPrefix,
        start: &[u8],
        page_size: usize,
    ) -> Self {
        Self {
            store,
            space,
            next_start: space.key(start),
            page_size: page_size.max(1),
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    fn fill(&mut self) -> Result<(), RepositoryError> {
        let page = self
            .store
            .scan(&self.next_start, self.space.as_bytes(), self.page_size)?;

        if page.len() < self.page_size {
            self.finished = true;
        }
        if let Some((last, _)) = page.last() {
            self.next_start = key_successor(last);
        }

        let prefix_len = self.space.as_bytes().len();
        self.buffer
            .extend(page.into_iter().map(|(mut key, value)| {
                let suffix = key.split_off(prefix_len);
                (suffix, value)
            }));
        Ok(())
    }
}

impl Iterator for IndexIterator<'_> {
    type Item = Result<IndexEntry, RepositoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Some(Ok(entry));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fill() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}
