//! Region cache
//!
//! Regions are keyed by id. A start-key index answers "which region owns
//! this key" without scanning every region.
//!
//! The cache does not judge region validity: regions sharing a start key
//! all stay cached. The index points at the most recently set one, or at
//! the highest remaining id once that one moves away.

use placer_proto::metapb::Region;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

/// All known regions
#[derive(Clone, Debug, Default)]
pub struct RegionsInfo {
    regions: HashMap<u64, Region>,
    /// start_key -> id of one region starting there
    tree: BTreeMap<Vec<u8>, u64>,
}

impl RegionsInfo {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the region with the same id.
    ///
    /// Other regions are never removed, even when they share the start key.
    pub fn set_region(&mut self, region: Region) {
        let start_key = region.start_key.clone();
        let id = region.id;
        if let Some(old) = self.regions.insert(id, region)
            && old.start_key != start_key
        {
            self.unindex(id, &old.start_key);
        }
        self.tree.insert(start_key, id);
    }

    /// Remove a region by id
    pub fn remove_region(&mut self, region_id: u64) -> Option<Region> {
        let region = self.regions.remove(&region_id)?;
        self.unindex(region_id, &region.start_key);
        Some(region)
    }

    /// Drop the index entry of `start_key` if `region_id` owns it, handing
    /// it to another cached region with the same start key.
    fn unindex(&mut self, region_id: u64, start_key: &[u8]) {
        if self.tree.get(start_key) != Some(&region_id) {
            return;
        }
        let heir = self
            .regions
            .values()
            .filter(|r| r.id != region_id && r.start_key == start_key)
            .map(|r| r.id)
            .max();
        match heir {
            Some(id) => {
                self.tree.insert(start_key.to_vec(), id);
            }
            None => {
                self.tree.remove(start_key);
            }
        }
    }

    /// Get a region by id
    #[must_use]
    pub fn get_region(&self, region_id: u64) -> Option<&Region> {
        self.regions.get(&region_id)
    }

    /// Find the region whose range contains `key`
    #[must_use]
    pub fn get_region_by_key(&self, key: &[u8]) -> Option<&Region> {
        let (_, id) = self
            .tree
            .range::<[u8], _>((Bound::Unbounded, Bound::Included(key)))
            .next_back()?;
        self.regions.get(id).filter(|r| r.contains_key(key))
    }

    /// Iterate all regions ordered by start key, then id
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        let mut regions: Vec<&Region> = self.regions.values().collect();
        regions.sort_by(|a, b| (&a.start_key, a.id).cmp(&(&b.start_key, b.id)));
        regions.into_iter()
    }

    /// Clone of every cached region
    #[must_use]
    pub fn meta_regions(&self) -> Vec<Region> {
        self.regions.values().cloned().collect()
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    fn region(id: u64, start: &[u8], end: &[u8]) -> Region {
        Region {
            id,
            start_key: start.to_vec(),
            end_key: end.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_by_key() {
        let mut cache = RegionsInfo::new();
        let mut regions = vec![
            region(1, b"", b"b"),
            region(2, b"b", b"d"),
            region(3, b"d", b"k"),
            region(4, b"k", b""),
        ];
        regions.shuffle(&mut rand::thread_rng());
        for r in regions {
            cache.set_region(r);
        }

        assert_eq!(cache.region_count(), 4);
        assert_eq!(cache.get_region_by_key(b"").unwrap().id, 1);
        assert_eq!(cache.get_region_by_key(b"a").unwrap().id, 1);
        assert_eq!(cache.get_region_by_key(b"b").unwrap().id, 2);
        assert_eq!(cache.get_region_by_key(b"f").unwrap().id, 3);
        assert_eq!(cache.get_region_by_key(b"zzz").unwrap().id, 4);

        let order: Vec<u64> = cache.regions().map(|r| r.id).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_lookup_in_gap() {
        let mut cache = RegionsInfo::new();
        cache.set_region(region(1, b"a", b"c"));
        cache.set_region(region(2, b"e", b"g"));

        assert!(cache.get_region_by_key(b"d").is_none());
        assert!(cache.get_region_by_key(b"0").is_none());
    }

    #[test]
    fn test_update_moves_start_key() {
        let mut cache = RegionsInfo::new();
        cache.set_region(region(1, b"a", b"z"));
        // split: region 1 shrinks, region 2 takes the upper half
        cache.set_region(region(1, b"a", b"m"));
        cache.set_region(region(2, b"m", b"z"));

        assert_eq!(cache.get_region_by_key(b"q").unwrap().id, 2);
        assert_eq!(cache.get_region(1).unwrap().end_key, b"m".to_vec());

        // merge back under a new start key
        cache.remove_region(2);
        cache.set_region(region(1, b"0", b"z"));
        assert_eq!(cache.region_count(), 1);
        assert_eq!(cache.get_region_by_key(b"q").unwrap().id, 1);
        assert!(cache.get_region_by_key(b"").is_none());
    }

    #[test]
    fn test_same_start_key_keeps_both() {
        let mut cache = RegionsInfo::new();
        cache.set_region(region(1, b"a", b"z"));
        cache.set_region(region(7, b"a", b"k"));

        assert_eq!(cache.region_count(), 2);
        assert_eq!(cache.get_region(1).unwrap().end_key, b"z".to_vec());
        assert_eq!(cache.get_region_by_key(b"b").unwrap().id, 7);

        let order: Vec<u64> = cache.regions().map(|r| r.id).collect();
        assert_eq!(order, vec![1, 7]);

        // the index falls back to the region left behind
        cache.remove_region(7);
        assert_eq!(cache.get_region_by_key(b"q").unwrap().id, 1);
        cache.remove_region(1);
        assert!(cache.get_region_by_key(b"q").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_regions_all_cached() {
        let mut cache = RegionsInfo::new();
        for id in 0..10 {
            cache.set_region(Region {
                id,
                ..Default::default()
            });
        }
        assert_eq!(cache.region_count(), 10);
        assert_eq!(cache.meta_regions().len(), 10);

        // moving one region away leaves the rest indexed
        cache.set_region(region(9, b"m", b""));
        assert_eq!(cache.get_region_by_key(b"zzz").unwrap().id, 9);
        assert!(cache.get_region_by_key(b"a").is_some());
        assert_eq!(cache.region_count(), 10);
    }

    #[test]
    fn test_remove_missing() {
        let mut cache = RegionsInfo::new();
        assert!(cache.remove_region(1).is_none());
        assert!(cache.is_empty());
    }
}
