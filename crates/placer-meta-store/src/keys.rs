//! Key layout for persisted metadata.
//!
//! Keys are designed for ordered range scans:
//! - Cluster meta: `raft/meta`
//! - Store meta: `raft/s/{store_id:020}`
//! - Store weights: `raft/s/{store_id:020}/leader`, `raft/s/{store_id:020}/region`
//! - Region meta: `raft/r/{region_id:020}`
//! - GC safe point: `raft/gc_safe_point`
//! - Scheduling config: `config`
//!
//! Ids are zero-padded to 20 digits, the width of `u64::MAX`, so byte
//! order of keys equals numeric order of ids.

/// Width of a zero-padded `u64`
pub const ID_WIDTH: usize = 20;

pub const CLUSTER_META_PATH: &str = "raft/meta";
pub const GC_SAFE_POINT_PATH: &str = "raft/gc_safe_point";
pub const CONFIG_PATH: &str = "config";

pub const STORE_PREFIX: &str = "raft/s/";
pub const REGION_PREFIX: &str = "raft/r/";

const LEADER_WEIGHT_SUFFIX: &str = "/leader";
const REGION_WEIGHT_SUFFIX: &str = "/region";

/// Which of a store's two scheduling weights a key holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightKind {
    Leader,
    Region,
}

#[must_use]
pub fn store_path(store_id: u64) -> String {
    format!("{STORE_PREFIX}{store_id:020}")
}

#[must_use]
pub fn region_path(region_id: u64) -> String {
    format!("{REGION_PREFIX}{region_id:020}")
}

#[must_use]
pub fn store_leader_weight_path(store_id: u64) -> String {
    store_path(store_id) + LEADER_WEIGHT_SUFFIX
}

#[must_use]
pub fn store_region_weight_path(store_id: u64) -> String {
    store_path(store_id) + REGION_WEIGHT_SUFFIX
}

/// Parse a store id out of a store meta key.
///
/// Weight keys and anything else under the store prefix yield `None`.
#[must_use]
pub fn parse_store_path(key: &[u8]) -> Option<u64> {
    parse_id(key, STORE_PREFIX)
}

/// Parse a store weight key into its store id and weight kind
#[must_use]
pub fn parse_store_weight_path(key: &[u8]) -> Option<(u64, WeightKind)> {
    let id_end = STORE_PREFIX.len() + ID_WIDTH;
    if key.len() <= id_end {
        return None;
    }
    let (store_key, suffix) = key.split_at(id_end);
    let kind = match suffix {
        s if s == LEADER_WEIGHT_SUFFIX.as_bytes() => WeightKind::Leader,
        s if s == REGION_WEIGHT_SUFFIX.as_bytes() => WeightKind::Region,
        _ => return None,
    };
    Some((parse_store_path(store_key)?, kind))
}

/// Parse a region id out of a region meta key
#[must_use]
pub fn parse_region_path(key: &[u8]) -> Option<u64> {
    parse_id(key, REGION_PREFIX)
}

fn parse_id(key: &[u8], prefix: &str) -> Option<u64> {
    let digits = key.strip_prefix(prefix.as_bytes())?;
    if digits.len() != ID_WIDTH || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    // 20 digits can exceed u64::MAX
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Smallest key strictly greater than `key` (`key` followed by `0x00`)
#[must_use]
pub fn key_after(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0);
    next
}

/// Exclusive upper bound of all keys starting with `prefix`.
///
/// Increments the last byte that is not `0xff` and truncates after it.
/// Returns an empty vec, meaning "no upper bound", when every byte is
/// `0xff` or the prefix is empty.
#[must_use]
pub fn prefix_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return end;
        }
    }
    end
}
