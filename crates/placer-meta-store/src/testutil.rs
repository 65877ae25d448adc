//! Backend adapters for tests

use crate::kv::{KvBase, KvError, KvResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rejects range scans asking for more than `max` keys, like consensus
/// stores that cap the size of a range response.
pub struct RangeLimitedKv<K> {
    pub inner: K,
    pub max: usize,
}

impl<K: KvBase> KvBase for RangeLimitedKv<K> {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        self.inner.delete(key)
    }

    fn scan_range(
        &self,
        start: &[u8],
        end: &[u8],
        limit: usize,
    ) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        if limit > self.max {
            return Err(KvError::RangeLimitExceeded {
                limit,
                max: self.max,
            });
        }
        self.inner.scan_range(start, end, limit)
    }
}

/// Counts point reads and range scans, and optionally fails the n-th scan
pub struct CountingKv<K> {
    pub inner: K,
    pub gets: AtomicUsize,
    pub scans: AtomicUsize,
    pub fail_on_scan: Option<usize>,
}

impl<K> CountingKv<K> {
    pub const fn new(inner: K) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
            fail_on_scan: None,
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl<K: KvBase> KvBase for CountingKv<K> {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        self.inner.delete(key)
    }

    fn scan_range(
        &self,
        start: &[u8],
        end: &[u8],
        limit: usize,
    ) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let n = self.scans.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_scan == Some(n) {
            return Err(KvError::Other(format!("injected failure on scan {n}")));
        }
        self.inner.scan_range(start, end, limit)
    }
}
