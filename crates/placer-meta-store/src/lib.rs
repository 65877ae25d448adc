//! Placer Metadata Store - cluster metadata persistence
//!
//! This crate persists cluster, store and region metadata plus the GC
//! safe point on top of an ordered key/value backend, and rebuilds the
//! in-memory caches from a paginated scan at startup.

pub mod cache;
pub mod codec;
pub mod keys;
pub mod kv;
pub mod store;

#[cfg(test)]
mod testutil;

// Re-exports
pub use cache::{RegionCache, StoreCache};
pub use codec::{BincodeCodec, CodecError, JsonCodec, MetaCodec, ProstCodec, RecordCodec};
pub use kv::{KvBase, KvError, KvResult, MemoryKv, RedbKv};
pub use store::{MetaStore, MetaStoreError, MetaStoreResult};
