//! Cache insertion contract used by bulk loads.
//!
//! The keyed caches overwrite any earlier entry with the same id. The
//! `Vec` impls keep every insertion in delivery order.

use placer_cluster::{RegionsInfo, StoreInfo, StoresInfo};
use placer_proto::metapb::Region;

/// Destination of [`MetaStore::load_stores`](crate::MetaStore::load_stores)
pub trait StoreCache {
    fn insert_store(&mut self, store: StoreInfo);
}

/// Destination of [`MetaStore::load_regions`](crate::MetaStore::load_regions)
pub trait RegionCache {
    fn insert_region(&mut self, region: Region);
}

impl StoreCache for StoresInfo {
    fn insert_store(&mut self, store: StoreInfo) {
        self.set_store(store);
    }
}

impl RegionCache for RegionsInfo {
    fn insert_region(&mut self, region: Region) {
        self.set_region(region);
    }
}

impl StoreCache for Vec<StoreInfo> {
    fn insert_store(&mut self, store: StoreInfo) {
        self.push(store);
    }
}

impl RegionCache for Vec<Region> {
    fn insert_region(&mut self, region: Region) {
        self.push(region);
    }
}
