//! Placer Common - shared configuration
//!
//! This crate provides the configuration types used by the metadata
//! store and the binaries built on top of it.

pub mod config;

pub use config::{BackendKind, Config, ConfigError, DEFAULT_RANGE_LIMIT};
