//! Store cache

use placer_proto::metapb::{Store, StoreState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scheduling weight applied when no override has been saved
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A store as seen by the scheduler: persisted metadata plus the
/// effective scheduling weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub meta: Store,
    /// Weight for leader balancing (higher = more leaders)
    pub leader_weight: f64,
    /// Weight for region balancing (higher = more regions)
    pub region_weight: f64,
}

impl StoreInfo {
    /// Wrap store metadata with default weights
    #[must_use]
    pub const fn new(meta: Store) -> Self {
        Self {
            meta,
            leader_weight: DEFAULT_WEIGHT,
            region_weight: DEFAULT_WEIGHT,
        }
    }

    /// Replace both scheduling weights
    #[must_use]
    pub fn with_weights(mut self, leader_weight: f64, region_weight: f64) -> Self {
        self.leader_weight = leader_weight;
        self.region_weight = region_weight;
        self
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.meta.id
    }

    #[must_use]
    pub const fn leader_weight(&self) -> f64 {
        self.leader_weight
    }

    #[must_use]
    pub const fn region_weight(&self) -> f64 {
        self.region_weight
    }

    /// Check if the store is up
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.meta.state() == StoreState::Up
    }

    /// Check if the store has been permanently removed
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.meta.state() == StoreState::Tombstone
    }
}

/// All known stores, keyed by store id
#[derive(Clone, Debug, Default)]
pub struct StoresInfo {
    stores: HashMap<u64, StoreInfo>,
}

impl StoresInfo {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a store
    pub fn set_store(&mut self, store: StoreInfo) {
        self.stores.insert(store.id(), store);
    }

    /// Get a store by id
    #[must_use]
    pub fn get_store(&self, store_id: u64) -> Option<&StoreInfo> {
        self.stores.get(&store_id)
    }

    /// Update the scheduling weights of a cached store.
    ///
    /// Returns `false` when the store is unknown.
    pub fn set_store_weight(&mut self, store_id: u64, leader_weight: f64, region_weight: f64) -> bool {
        match self.stores.get_mut(&store_id) {
            Some(store) => {
                store.leader_weight = leader_weight;
                store.region_weight = region_weight;
                true
            }
            None => false,
        }
    }

    /// Iterate all stores
    pub fn stores(&self) -> impl Iterator<Item = &StoreInfo> {
        self.stores.values()
    }

    /// Persisted metadata of every store
    #[must_use]
    pub fn meta_stores(&self) -> Vec<Store> {
        self.stores.values().map(|s| s.meta.clone()).collect()
    }

    #[must_use]
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: u64) -> Store {
        Store {
            id,
            address: format!("127.0.0.1:{}", 20160 + id),
            ..Default::default()
        }
    }

    #[test]
    fn test_set_and_get_store() {
        let mut cache = StoresInfo::new();
        cache.set_store(StoreInfo::new(store(1)));
        cache.set_store(StoreInfo::new(store(2)).with_weights(2.0, 3.0));

        assert_eq!(cache.store_count(), 2);
        let s1 = cache.get_store(1).unwrap();
        assert_eq!(s1.leader_weight(), DEFAULT_WEIGHT);
        assert_eq!(s1.region_weight(), DEFAULT_WEIGHT);
        assert!(s1.is_up());

        let s2 = cache.get_store(2).unwrap();
        assert_eq!(s2.leader_weight(), 2.0);
        assert_eq!(s2.region_weight(), 3.0);
        assert!(cache.get_store(3).is_none());
    }

    #[test]
    fn test_set_store_overwrites() {
        let mut cache = StoresInfo::new();
        cache.set_store(StoreInfo::new(store(1)));

        let mut updated = store(1);
        updated.set_state(StoreState::Tombstone);
        cache.set_store(StoreInfo::new(updated));

        assert_eq!(cache.store_count(), 1);
        assert!(cache.get_store(1).unwrap().is_tombstone());
    }

    #[test]
    fn test_set_store_weight() {
        let mut cache = StoresInfo::new();
        cache.set_store(StoreInfo::new(store(1)));

        assert!(cache.set_store_weight(1, 0.5, 4.0));
        assert!(!cache.set_store_weight(9, 0.5, 4.0));
        assert_eq!(cache.get_store(1).unwrap().leader_weight(), 0.5);
        assert_eq!(cache.get_store(1).unwrap().region_weight(), 4.0);
    }
}
