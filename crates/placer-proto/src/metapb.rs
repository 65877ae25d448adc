//! Cluster, store and region metadata records.

use serde::{Deserialize, Serialize};

/// Cluster-wide configuration singleton
#[derive(Clone, PartialEq, Serialize, Deserialize, ::prost::Message)]
pub struct Cluster {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    /// Default number of replicas for each region
    #[prost(uint32, tag = "2")]
    pub max_peer_count: u32,
}

/// Lifecycle state of a store
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ::prost::Enumeration,
)]
#[repr(i32)]
pub enum StoreState {
    Up = 0,
    Offline = 1,
    Tombstone = 2,
}

/// Key/value label attached to a store (zone, rack, host, ...)
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ::prost::Message)]
pub struct StoreLabel {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// A storage node
#[derive(Clone, PartialEq, Serialize, Deserialize, ::prost::Message)]
pub struct Store {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub address: String,
    #[prost(enumeration = "StoreState", tag = "3")]
    pub state: i32,
    #[prost(message, repeated, tag = "4")]
    pub labels: Vec<StoreLabel>,
    #[prost(string, tag = "5")]
    pub version: String,
}

/// Versioning of a region's range and membership
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ::prost::Message)]
pub struct RegionEpoch {
    /// Bumped on every membership change
    #[prost(uint64, tag = "1")]
    pub conf_ver: u64,
    /// Bumped on every split or merge
    #[prost(uint64, tag = "2")]
    pub version: u64,
}

/// A replica of a region placed on a store
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ::prost::Message)]
pub struct Peer {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub store_id: u64,
}

/// A contiguous partition of the keyspace, `[start_key, end_key)`.
///
/// An empty `end_key` means the region extends to the end of the keyspace.
#[derive(Clone, PartialEq, Serialize, Deserialize, ::prost::Message)]
pub struct Region {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub start_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub end_key: Vec<u8>,
    #[prost(message, optional, tag = "4")]
    pub region_epoch: Option<RegionEpoch>,
    #[prost(message, repeated, tag = "5")]
    pub peers: Vec<Peer>,
}

impl Region {
    /// Check whether `key` falls inside this region's range
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        key >= self.start_key.as_slice() && (self.end_key.is_empty() || key < self.end_key.as_slice())
    }
}
