//! Record codecs.
//!
//! The metadata store never touches a serialization library directly;
//! it goes through a `MetaCodec<T>` for every record kind. `ProstCodec`
//! writes the protobuf wire format and is the default. `BincodeCodec`
//! and `JsonCodec` cover serde types.

use placer_proto::metapb::{Cluster, Region, Store};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for encoding and decoding records
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("prost decode error: {0}")]
    Prost(#[from] prost::DecodeError),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed value: {0}")]
    Malformed(String),
}

/// Encode/decode pair for one record type
pub trait MetaCodec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// A codec able to persist every record kind the metadata store handles
pub trait RecordCodec: MetaCodec<Cluster> + MetaCodec<Store> + MetaCodec<Region> {}

impl<C> RecordCodec for C where C: MetaCodec<Cluster> + MetaCodec<Store> + MetaCodec<Region> {}

/// Protobuf wire format
#[derive(Clone, Copy, Debug, Default)]
pub struct ProstCodec;

impl<T: prost::Message + Default> MetaCodec<T> for ProstCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(value.encode_to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(T::decode(bytes)?)
    }
}

/// Bincode over the records' serde derives
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl<T: Serialize + DeserializeOwned> MetaCodec<T> for BincodeCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// JSON, used for human-editable documents such as the scheduling config
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> MetaCodec<T> for JsonCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Weights are stored as the shortest decimal text that round-trips the
/// `f64` exactly.
pub(crate) fn encode_weight(weight: f64) -> Vec<u8> {
    weight.to_string().into_bytes()
}

pub(crate) fn decode_weight(bytes: &[u8]) -> Result<f64, CodecError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| CodecError::Malformed(format!("weight {:?}", String::from_utf8_lossy(bytes))))
}

/// The safe point is stored as lowercase hex text
pub(crate) fn encode_safe_point(safe_point: u64) -> Vec<u8> {
    format!("{safe_point:x}").into_bytes()
}

pub(crate) fn decode_safe_point(bytes: &[u8]) -> Result<u64, CodecError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| u64::from_str_radix(s, 16).ok())
        .ok_or_else(|| {
            CodecError::Malformed(format!("safe point {:?}", String::from_utf8_lossy(bytes)))
        })
}
