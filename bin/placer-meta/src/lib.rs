//! Placer metadata tool internals
//!
//! Opens the configured backend and summarizes what a manager would load
//! from it at startup.

use anyhow::{Context, Result};
use placer_cluster::{RegionsInfo, StoresInfo};
use placer_common::{BackendKind, Config};
use placer_meta_store::{KvBase, MemoryKv, MetaStore, RedbKv};
use placer_proto::metapb::StoreState;
use serde::Serialize;
use tracing::info;

/// Metadata store over whichever backend the config selects
pub type DynMetaStore = MetaStore<Box<dyn KvBase>>;

/// Open the backend named by `config`
pub fn open_store(config: &Config) -> Result<DynMetaStore> {
    let kv: Box<dyn KvBase> = match config.storage.backend {
        BackendKind::Memory => {
            info!("Using in-memory metadata backend");
            Box::new(MemoryKv::new())
        }
        BackendKind::Redb => {
            let path = config.storage.db_path();
            info!("Using redb metadata backend at {}", path.display());
            Box::new(
                RedbKv::open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?,
            )
        }
    };
    Ok(MetaStore::new(kv).with_range_limit(config.storage.range_limit))
}

/// What a full startup load finds in the backend
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub cluster_id: Option<u64>,
    pub stores: usize,
    pub stores_up: usize,
    pub stores_offline: usize,
    pub stores_tombstone: usize,
    /// Stores whose weights differ from the default
    pub weighted_stores: Vec<u64>,
    pub regions: usize,
    pub gc_safe_point: u64,
}

/// Run the same bulk loads a manager runs at startup and count the result
#[allow(clippy::float_cmp)]
pub fn summarize<K: KvBase>(store: &MetaStore<K>) -> Result<Summary> {
    let cluster = store.load_cluster_meta().context("failed to load cluster meta")?;

    let mut stores = StoresInfo::new();
    store.load_stores(&mut stores).context("failed to load stores")?;

    let mut regions = RegionsInfo::new();
    store.load_regions(&mut regions).context("failed to load regions")?;

    let gc_safe_point = store
        .load_gc_safe_point()
        .context("failed to load GC safe point")?;

    let mut summary = Summary {
        cluster_id: cluster.map(|c| c.id),
        stores: stores.store_count(),
        regions: regions.region_count(),
        gc_safe_point,
        ..Default::default()
    };
    for s in stores.stores() {
        match s.meta.state() {
            StoreState::Up => summary.stores_up += 1,
            StoreState::Offline => summary.stores_offline += 1,
            StoreState::Tombstone => summary.stores_tombstone += 1,
        }
        if s.leader_weight() != placer_cluster::DEFAULT_WEIGHT
            || s.region_weight() != placer_cluster::DEFAULT_WEIGHT
        {
            summary.weighted_stores.push(s.id());
        }
    }
    summary.weighted_stores.sort_unstable();
    Ok(summary)
}
