//! Placer Protocol - cluster metadata records
//!
//! The records are protobuf messages declared directly with `prost`
//! derives, so the wire format stays compatible with any reader built
//! against the same field tags. They also derive serde traits so a
//! non-protobuf codec can persist them.

pub mod metapb;
