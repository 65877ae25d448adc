//! Persistent cluster metadata store.
//!
//! Provides typed save/load/delete for the cluster meta, stores, regions,
//! store weights, the GC safe point and the scheduling config, plus the
//! paginated bulk loads that rebuild the in-memory caches at startup.
//!
//! The store holds nothing but its backend handle: every call goes
//! straight to the backend, and no two writes are atomic with each other.

use crate::cache::{RegionCache, StoreCache};
use crate::codec::{
    CodecError, JsonCodec, MetaCodec, ProstCodec, RecordCodec, decode_safe_point, decode_weight,
    encode_safe_point, encode_weight,
};
use crate::keys::{self, WeightKind};
use crate::kv::{KvBase, KvError};
use placer_cluster::StoreInfo;
use placer_common::DEFAULT_RANGE_LIMIT;
use placer_proto::metapb::{Cluster, Region, Store};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Error type for metadata store operations
#[derive(Debug, thiserror::Error)]
pub enum MetaStoreError {
    #[error("backend error: {0}")]
    Backend(#[from] KvError),
    #[error("failed to decode '{key}': {source}")]
    Decode { key: String, source: CodecError },
    #[error("failed to encode record: {0}")]
    Encode(#[source] CodecError),
}

impl MetaStoreError {
    fn decode(key: &[u8], source: CodecError) -> Self {
        Self::Decode {
            key: String::from_utf8_lossy(key).into_owned(),
            source,
        }
    }

    /// Check if the stored bytes failed to decode
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

pub type MetaStoreResult<T> = Result<T, MetaStoreError>;

/// Typed metadata persistence over an ordered key/value backend
pub struct MetaStore<K, C = ProstCodec> {
    kv: K,
    codec: C,
    range_limit: usize,
}

impl<K: KvBase> MetaStore<K> {
    /// Create a store persisting records in protobuf format
    pub const fn new(kv: K) -> Self {
        Self::with_codec(kv, ProstCodec)
    }
}

impl<K, C> MetaStore<K, C> {
    /// Create a store with an explicit record codec
    pub const fn with_codec(kv: K, codec: C) -> Self {
        Self {
            kv,
            codec,
            range_limit: DEFAULT_RANGE_LIMIT,
        }
    }

    /// Set the page size of bulk loads.
    ///
    /// The value is passed to the backend unchanged; a backend that caps
    /// range responses below it will fail every bulk load.
    #[must_use]
    pub const fn with_range_limit(mut self, range_limit: usize) -> Self {
        self.range_limit = range_limit;
        self
    }

    #[must_use]
    pub const fn range_limit(&self) -> usize {
        self.range_limit
    }

    /// The underlying backend
    pub const fn kv(&self) -> &K {
        &self.kv
    }
}

impl<K: KvBase, C: RecordCodec> MetaStore<K, C> {
    // ---- Cluster meta ----

    pub fn load_cluster_meta(&self) -> MetaStoreResult<Option<Cluster>> {
        self.load_record::<Cluster>(keys::CLUSTER_META_PATH)
    }

    pub fn save_cluster_meta(&self, meta: &Cluster) -> MetaStoreResult<()> {
        self.save_record(keys::CLUSTER_META_PATH, meta)
    }

    // ---- Stores ----

    pub fn load_store(&self, store_id: u64) -> MetaStoreResult<Option<Store>> {
        self.load_record::<Store>(&keys::store_path(store_id))
    }

    pub fn save_store(&self, store: &Store) -> MetaStoreResult<()> {
        self.save_record(&keys::store_path(store.id), store)
    }

    /// Persist scheduling weights for a store.
    ///
    /// The two weights are separate writes and do not require the store
    /// itself to exist.
    pub fn save_store_weight(
        &self,
        store_id: u64,
        leader_weight: f64,
        region_weight: f64,
    ) -> MetaStoreResult<()> {
        self.kv.put(
            keys::store_leader_weight_path(store_id).as_bytes(),
            &encode_weight(leader_weight),
        )?;
        self.kv.put(
            keys::store_region_weight_path(store_id).as_bytes(),
            &encode_weight(region_weight),
        )?;
        debug!(
            "Saved weights for store {}: leader={}, region={}",
            store_id, leader_weight, region_weight
        );
        Ok(())
    }

    // ---- Regions ----

    pub fn load_region(&self, region_id: u64) -> MetaStoreResult<Option<Region>> {
        self.load_record::<Region>(&keys::region_path(region_id))
    }

    pub fn save_region(&self, region: &Region) -> MetaStoreResult<()> {
        self.save_record(&keys::region_path(region.id), region)
    }

    /// Remove a region. Succeeds if the region was never saved.
    pub fn delete_region(&self, region: &Region) -> MetaStoreResult<()> {
        self.kv.delete(keys::region_path(region.id).as_bytes())?;
        Ok(())
    }

    // ---- GC safe point ----

    /// Load the GC safe point, `0` if it was never saved
    pub fn load_gc_safe_point(&self) -> MetaStoreResult<u64> {
        let key = keys::GC_SAFE_POINT_PATH.as_bytes();
        match self.kv.get(key)? {
            Some(bytes) => decode_safe_point(&bytes).map_err(|e| MetaStoreError::decode(key, e)),
            None => Ok(0),
        }
    }

    /// Overwrite the GC safe point.
    ///
    /// Any value is accepted, including one below the stored value;
    /// keeping the safe point non-decreasing is up to the caller.
    pub fn save_gc_safe_point(&self, safe_point: u64) -> MetaStoreResult<()> {
        self.kv.put(
            keys::GC_SAFE_POINT_PATH.as_bytes(),
            &encode_safe_point(safe_point),
        )?;
        debug!("Saved GC safe point {}", safe_point);
        Ok(())
    }

    // ---- Scheduling config (JSON) ----

    pub fn save_config<T: Serialize + DeserializeOwned>(&self, config: &T) -> MetaStoreResult<()> {
        let bytes = MetaCodec::<T>::encode(&JsonCodec, config).map_err(MetaStoreError::Encode)?;
        self.kv.put(keys::CONFIG_PATH.as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn load_config<T: Serialize + DeserializeOwned>(&self) -> MetaStoreResult<Option<T>> {
        let key = keys::CONFIG_PATH.as_bytes();
        self.kv
            .get(key)?
            .map(|bytes| {
                MetaCodec::<T>::decode(&JsonCodec, &bytes).map_err(|e| MetaStoreError::decode(key, e))
            })
            .transpose()
    }

    // ---- Bulk loads ----

    /// Load every store into `cache`, applying saved weights.
    ///
    /// Stores without a weight override get `1.0` for both weights. The
    /// weights are read from the same scan as the stores: weight keys
    /// sort directly after their store key, so a store is held back until
    /// the next store key (or the end of the scan) and page boundaries
    /// between a store and its weights need no extra reads.
    ///
    /// Stops at the first backend or decode error; the cache may then
    /// hold a partial result and should be discarded.
    pub fn load_stores(&self, cache: &mut impl StoreCache) -> MetaStoreResult<usize> {
        let mut pending: Option<(u64, StoreInfo)> = None;
        let loaded = self.load_range(keys::STORE_PREFIX, |key, value| {
            if let Some(store_id) = keys::parse_store_path(key) {
                let store = self
                    .decode_record::<Store>(value)
                    .map_err(|e| MetaStoreError::decode(key, e))?;
                if let Some((_, done)) = pending.replace((store_id, StoreInfo::new(store))) {
                    cache.insert_store(done);
                }
                return Ok(true);
            }

            // weights of a store with no persisted record are skipped
            if let Some((store_id, kind)) = keys::parse_store_weight_path(key)
                && let Some((_, info)) = pending.as_mut().filter(|(id, _)| *id == store_id)
            {
                let weight = decode_weight(value).map_err(|e| MetaStoreError::decode(key, e))?;
                match kind {
                    WeightKind::Leader => info.leader_weight = weight,
                    WeightKind::Region => info.region_weight = weight,
                }
            }
            Ok(false)
        })?;
        if let Some((_, done)) = pending {
            cache.insert_store(done);
        }
        info!("Loaded {} stores from metadata store", loaded);
        Ok(loaded)
    }

    /// Load every region into `cache`.
    ///
    /// Stops at the first backend or decode error; the cache may then
    /// hold a partial result and should be discarded.
    pub fn load_regions(&self, cache: &mut impl RegionCache) -> MetaStoreResult<usize> {
        let loaded = self.load_range(keys::REGION_PREFIX, |key, value| {
            if keys::parse_region_path(key).is_none() {
                return Ok(false);
            }
            let region = self
                .decode_record::<Region>(value)
                .map_err(|e| MetaStoreError::decode(key, e))?;
            cache.insert_region(region);
            Ok(true)
        })?;
        info!("Loaded {} regions from metadata store", loaded);
        Ok(loaded)
    }

    /// Page through every key under `prefix` in ascending order.
    ///
    /// `visit` returns whether the entry counted as a loaded record.
    fn load_range<F>(&self, prefix: &str, mut visit: F) -> MetaStoreResult<usize>
    where
        F: FnMut(&[u8], &[u8]) -> MetaStoreResult<bool>,
    {
        let end = keys::prefix_end(prefix.as_bytes());
        let mut cursor = prefix.as_bytes().to_vec();
        let mut pages = 0usize;
        let mut loaded = 0usize;

        loop {
            let page = self.kv.scan_range(&cursor, &end, self.range_limit)?;
            pages += 1;
            for (key, value) in &page {
                if visit(key.as_slice(), value.as_slice())? {
                    loaded += 1;
                }
            }
            match page.last() {
                Some((last, _)) if page.len() >= self.range_limit => {
                    cursor = keys::key_after(last);
                }
                _ => break,
            }
        }

        debug!(
            "Scanned '{}' in {} pages of up to {} keys, {} records",
            prefix, pages, self.range_limit, loaded
        );
        Ok(loaded)
    }

    // ---- Generic helpers ----

    fn load_record<T>(&self, key: &str) -> MetaStoreResult<Option<T>>
    where
        C: MetaCodec<T>,
    {
        self.kv
            .get(key.as_bytes())?
            .map(|bytes| {
                self.decode_record::<T>(&bytes)
                    .map_err(|e| MetaStoreError::decode(key.as_bytes(), e))
            })
            .transpose()
    }

    fn save_record<T>(&self, key: &str, value: &T) -> MetaStoreResult<()>
    where
        C: MetaCodec<T>,
    {
        let bytes = <C as MetaCodec<T>>::encode(&self.codec, value).map_err(MetaStoreError::Encode)?;
        self.kv.put(key.as_bytes(), &bytes)?;
        Ok(())
    }

    fn decode_record<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        C: MetaCodec<T>,
    {
        <C as MetaCodec<T>>::decode(&self.codec, bytes)
    }
}
