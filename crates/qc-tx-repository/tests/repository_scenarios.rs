//! # Repository Scenario Tests
//!
//! End-to-end behaviour through the public API only: write, commit, reopen
//! and read back through both indexes.

use parking_lot::RwLock;
use qc_tx_repository::{
    pack_height, unpack_height, AtomicTransaction, BincodeTxCodec, IndexedTransaction,
    InMemoryVersionedStore, RepositoryConfig, RepositoryError, TxRepository, TxRepositoryApi,
};
use std::sync::Arc;
use std::thread;

type Repo =
    TxRepository<InMemoryVersionedStore, BincodeTxCodec<AtomicTransaction>, AtomicTransaction>;

fn make_tx(chain: u8, nonce: u64) -> AtomicTransaction {
    AtomicTransaction::new([chain; 32], nonce, nonce * 3, b"export".to_vec())
}

fn open(store: InMemoryVersionedStore, last_accepted: u64) -> Repo {
    TxRepository::open(
        store,
        BincodeTxCodec::default(),
        last_accepted,
        RepositoryConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_accepted_height_survives_restart() {
    let base = InMemoryVersionedStore::new();
    let (a, b) = (make_tx(1, 1), make_tx(2, 1));

    let mut repo = open(base.reopen(), 0);
    repo.write(10, &[a.clone(), b.clone()]).unwrap();
    repo.commit().unwrap();
    drop(repo);

    let repo = open(base.reopen(), 10);
    assert!(repo.last_migration().was_noop());

    assert_eq!(repo.get_by_height(10).unwrap(), vec![a.clone(), b.clone()]);
    assert_eq!(repo.get_by_tx_id(&a.id()).unwrap(), (a, 10));
    assert_eq!(repo.get_by_tx_id(&b.id()).unwrap(), (b, 10));

    let unknown = make_tx(3, 1);
    assert_eq!(
        repo.get_by_tx_id(&unknown.id()),
        Err(RepositoryError::TxNotFound { tx_id: unknown.id() })
    );
    assert_eq!(repo.index_height().unwrap(), Some(10));
}

#[test]
fn test_uncommitted_height_is_lost_on_restart() {
    let base = InMemoryVersionedStore::new();

    let mut repo = open(base.reopen(), 0);
    repo.write(1, &[make_tx(1, 1)]).unwrap();
    repo.commit().unwrap();
    repo.write(2, &[make_tx(1, 2)]).unwrap();
    drop(repo);

    let repo = open(base.reopen(), 1);
    assert_eq!(repo.get_by_height(1).unwrap().len(), 1);
    assert!(repo.get_by_height(2).unwrap_err().is_not_found());
    assert!(repo.get_by_tx_id(&make_tx(1, 2).id()).unwrap_err().is_not_found());
    assert_eq!(repo.index_height().unwrap(), Some(1));
}

#[test]
fn test_iteration_sees_staged_and_committed_heights() {
    let mut repo = open(InMemoryVersionedStore::new(), 0);
    for height in 1..=3u64 {
        repo.write(height, &[make_tx(1, height)]).unwrap();
    }
    repo.commit().unwrap();
    for height in 4..=6u64 {
        repo.write(height, &[make_tx(1, height), make_tx(2, height)]).unwrap();
    }

    let entries: Vec<(u64, usize)> = repo
        .iterate_by_height(&pack_height(2))
        .map(|entry| {
            let (key, value) = entry.unwrap();
            (unpack_height(&key).unwrap(), value.len())
        })
        .collect();

    let heights: Vec<u64> = entries.iter().map(|(height, _)| *height).collect();
    assert_eq!(heights, vec![2, 3, 4, 5, 6]);
    assert!(entries.iter().all(|(_, len)| *len > 0));

    assert_eq!(repo.iterate_by_tx_id().count(), 9);
}

#[test]
fn test_readers_share_repository_with_writer() {
    let repo = Arc::new(RwLock::new(open(InMemoryVersionedStore::new(), 0)));

    let writer = {
        let repo = Arc::clone(&repo);
        thread::spawn(move || {
            for height in 1..=50u64 {
                let mut guard = repo.write();
                guard.write(height, &[make_tx(7, height)]).unwrap();
                guard.commit().unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for _ in 0..50 {
                    let guard = repo.read();
                    // A visible marker implies the whole height is visible.
                    if let Some(height) = guard.index_height().unwrap() {
                        if height > 0 {
                            let txs = guard.get_by_height(height).unwrap();
                            assert_eq!(txs, vec![make_tx(7, height)]);
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(repo.read().index_height().unwrap(), Some(50));
}
