//! In-memory backend

use super::{KvBase, KvError, KvResult, is_empty_range};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Volatile ordered map. Reference backend for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryKv {
    tree: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }
}

impl KvBase for MemoryKv {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        Ok(self.tree.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.tree.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        self.tree.write().remove(key);
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
        // BTreeMap::range panics on an inverted range
        if is_empty_range(start, end) {
            return Ok(Vec::new());
        }

        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        let tree = self.tree.read();
        Ok(tree
            .range::<[u8], _>((Bound::Included(start), upper))
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> MemoryKv {
        let kv = MemoryKv::new();
        for key in ["a", "b", "b\0", "ba", "c", "d"] {
            kv.put(key.as_bytes(), key.to_uppercase().as_bytes()).unwrap();
        }
        kv
    }

    fn keys(pairs: &[(Vec<u8>, Vec<u8>)]) -> Vec<&str> {
        pairs
            .iter()
            .map(|(k, _)| std::str::from_utf8(k).unwrap())
            .collect()
    }

    #[test]
    fn test_put_get_delete() {
        let kv = MemoryKv::new();
        assert!(kv.get(b"k").unwrap().is_none());

        kv.put(b"k", b"v1").unwrap();
        kv.put(b"k", b"v2").unwrap();
        assert_eq!(kv.get(b"k").unwrap().unwrap(), b"v2");
        assert_eq!(kv.len(), 1);

        kv.delete(b"k").unwrap();
        kv.delete(b"k").unwrap();
        assert!(kv.get(b"k").unwrap().is_none());
        assert!(kv.is_empty());
    }

    #[test]
    fn test_scan_bounds() {
        let kv = populated();

        let res = kv.scan_range(b"b", b"c", 10).unwrap();
        assert_eq!(keys(&res), vec!["b", "b\0", "ba"]);

        let res = kv.scan_range(b"b\0", b"", 10).unwrap();
        assert_eq!(keys(&res), vec!["b\0", "ba", "c", "d"]);

        let res = kv.scan_range(b"a", b"z", 2).unwrap();
        assert_eq!(keys(&res), vec!["a", "b"]);
        assert_eq!(res[0].1, b"A");
    }

    #[test]
    fn test_scan_inverted_and_zero_limit() {
        let kv = populated();
        assert!(kv.scan_range(b"d", b"a", 10).unwrap().is_empty());
        assert!(kv.scan_range(b"c", b"c", 10).unwrap().is_empty());
        assert!(matches!(
            kv.scan_range(b"a", b"z", 0),
            Err(KvError::InvalidLimit(0))
        ));
    }
}
