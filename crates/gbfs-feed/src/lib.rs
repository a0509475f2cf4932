//! Freshness-aware cache and refresh coordinator for GBFS station feeds.
//!
//! The upstream feed publishes two JSON documents -- mutable station
//! status and near-static station information -- that together describe a
//! bike-share network. This crate pulls both documents on demand, merges
//! them into a single keyed dataset, and serves complete-only snapshots to
//! readers while bounding how stale the served data can get.
//!
//! # Modules
//!
//! - [`client`] -- The [`FeedClient`] seam and the HTTP implementation
//! - [`config`] -- Typed configuration with YAML loading
//! - [`distance`] -- Great-circle distances between stations
//! - [`error`] -- Error taxonomy for retrievals and reads
//! - [`fetch`] -- Concurrent fan-out/join of the two feed pulls
//! - [`fixture`] -- File-backed source for tests and offline development
//! - [`merge`] -- Upsert of fetched records into the keyed dataset
//! - [`source`] -- The refresh coordinator and the [`StationSource`]
//!   contract
//! - [`store`] -- Dataset storage with freshness tracking

pub mod client;
pub mod config;
pub mod distance;
pub mod error;
pub mod fetch;
pub mod fixture;
pub mod merge;
pub mod source;
pub mod store;

// Re-export primary types at crate root.
pub use client::{FeedClient, HttpFeedClient};
pub use config::{ConfigError, FeedConfig};
pub use distance::distances_from;
pub use error::{ClientError, FeedError};
pub use fetch::fetch_both;
pub use fixture::{FixtureError, FixtureSource};
pub use merge::{PartialStation, merge_records};
pub use source::{LiveSource, StationSource};
pub use store::Store;
