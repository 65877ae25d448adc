//! Placer Cluster - in-memory scheduling caches
//!
//! `StoresInfo` and `RegionsInfo` hold the manager's working copy of the
//! cluster. They are populated from the metadata store at startup and
//! kept in sync by the caller afterwards; nothing here writes back to
//! persistent storage.

pub mod regions;
pub mod stores;

pub use regions::RegionsInfo;
pub use stores::{DEFAULT_WEIGHT, StoreInfo, StoresInfo};
