use crate::domain::errors::StoreError;
use crate::ports::outbound::ScanResult;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Staged writes keyed in store order.
pub(crate) type PendingWrites = BTreeMap<Vec<u8>, Vec<u8>>;

/// Clamp a scan start so it never sorts before its prefix.
pub(crate) fn scan_start<'a>(start: &'a [u8], prefix: &'a [u8]) -> &'a [u8] {
    if start < prefix {
        prefix
    } else {
        start
    }
}

/// Merge one page of committed entries with staged writes.
///
/// `committed` must already be positioned at `scan_start(start, prefix)` and
/// stop at the end of `prefix`. Staged values shadow committed ones. The first
/// `limit` keys of the union are always among the first `limit` keys of each
/// side, so reading `limit` from both is enough.
pub(crate) fn merge_page<I>(
    committed: I,
    pending: &PendingWrites,
    start: &[u8],
    prefix: &[u8],
    limit: usize,
) -> Result<ScanResult, StoreError>
where
    I: Iterator<Item = Result<(Vec<u8>, Vec<u8>), StoreError>>,
{
    let start = scan_start(start, prefix);
    let mut page = BTreeMap::new();

    for item in committed.take(limit) {
        let (key, value) = item?;
        page.insert(key, value);
    }

    let staged = pending
        .range::<[u8], _>((Bound::Included(start), Bound::Unbounded))
        .take_while(|(key, _)| key.starts_with(prefix))
        .take(limit);
    for (key, value) in staged {
        page.insert(key.clone(), value.clone());
    }

    Ok(page.into_iter().take(limit).collect())
}
