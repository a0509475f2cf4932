//! Shared type definitions for the GBFS station feed cache.
//!
//! This crate is the single source of truth for the data model shared
//! between the feed cache core and its consumers (API and page handlers).
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrapper for upstream station identifiers
//! - [`records`] -- Wire-format records and feed envelopes for the two
//!   halves of the upstream feed
//! - [`station`] -- The complete station pairing and the served dataset

pub mod ids;
pub mod records;
pub mod station;

// Re-export all public types at crate root for convenience.
pub use ids::StationId;
pub use records::{Feed, FeedData, InfoFeed, InfoRecord, StatusFeed, StatusRecord};
pub use station::{Dataset, Station};
