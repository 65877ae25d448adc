//! Embedded backend on redb.
//!
//! All metadata lives in one table keyed by raw bytes. Each mutation is
//! its own write transaction and each scan page reads from its own read
//! transaction, so single-key operations and pages are atomic but a
//! multi-page scan is not a snapshot.

use super::{KvBase, KvError, KvResult, is_empty_range};
use redb::{Database, ReadableTable, TableDefinition};
use std::ops::Bound;
use std::path::Path;
use tracing::debug;

const META: TableDefinition<&[u8], &[u8]> = TableDefinition::new("meta");

/// Persistent backend stored in a single redb file
pub struct RedbKv {
    db: Database,
}

impl RedbKv {
    /// Open (or create) the redb database at the given path.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Create the table eagerly so later read txns don't fail
        let write_txn = db.begin_write()?;
        {
            let _t = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        debug!("Opened redb metadata backend at {}", path.display());
        Ok(Self { db })
    }
}

impl KvBase for RedbKv {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(META)?;
        Ok(table.get(key)?.map(|v| v.value().to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(META)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(META)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn scan_range(
        &self,
        start: &[u8],
        end: &[u8],
        limit: usize,
    ) -> KvResult<Vec<(Vec<u8>, Vec<u8>)>> {
        if limit == 0 {
            return Err(KvError::InvalidLimit(limit));
        }
        if is_empty_range(start, end) {
            return Ok(Vec::new());
        }

        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(META)?;
        let mut result = Vec::new();
        for entry in table.range::<&[u8]>((Bound::Included(start), upper))? {
            let entry = entry?;
            result.push((entry.0.value().to_vec(), entry.1.value().to_vec()));
            if result.len() == limit {
                break;
            }
        }
        Ok(result)
    }
}
