//! Ordered key/value backends
//!
//! `KvBase` is the narrow interface the metadata store consumes: point
//! get/put/delete plus a bounded, ordered range scan. Keys compare as raw
//! bytes.

mod memory;
mod redb_kv;

pub use self::memory::MemoryKv;
pub use self::redb_kv::RedbKv;

use std::sync::Arc;
use thiserror::Error;

/// Error type for backend operations
#[derive(Debug, Error)]
pub enum KvError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::DatabaseError),
    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid range limit {0}")]
    InvalidLimit(usize),
    #[error("range limit {limit} exceeds backend maximum {max}")]
    RangeLimitExceeded { limit: usize, max: usize },
    #[error("backend error: {0}")]
    Other(String),
}

impl From<redb::TransactionError> for KvError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

pub type KvResult<T> = Result<T, KvError>;

/// Ordered key/value store.
///
/// `scan_range` returns at most `limit` pairs with `start <= key < end` in
/// ascending key order. An empty `end` places no upper bound on the scan.
/// A `limit` of zero is rejected with [`KvError::InvalidLimit`].
pub trait KvBase: Send + Sync {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>>;

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &[u8]) -> KvResult<()>;

    fn scan_range(&self, start: &[u8], end: &[u8], limit: usize)
    -> KvResult<Vec<(Vec<u8>, Vec<u8>)>>;
}

impl<T: KvBase + ?Sized> KvBase for Arc<T> {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        (**self).delete(key)
    }

    fn scan_range(
        &self,
        start: &[u8],
        end: &[u8],
        limit: usize,
    ) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        (**self).scan_range(start, end, limit)
    }
}

impl<T: KvBase + ?Sized> KvBase for Box<T> {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        (**self).delete(key)
    }

    fn scan_range(
        &self,
        start: &[u8],
        end: &[u8],
        limit: usize,
    ) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        (**self).scan_range(start, end, limit)
    }
}

/// True when `[start, end)` cannot contain any key
pub(crate) fn is_empty_range(start: &[u8], end: &[u8]) -> bool {
    !end.is_empty() && start >= end
}
