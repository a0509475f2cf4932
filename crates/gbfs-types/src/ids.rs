//! Type-safe identifier for bike-share stations.
//!
//! The upstream feed keys both halves of its dataset by an opaque string
//! id. Wrapping it in a newtype keeps station ids from being mixed up with
//! other strings at compile time; the value itself is only ever compared,
//! hashed, and echoed back to consumers.

use serde::{Deserialize, Serialize};

/// Unique identifier for a physical bike-share station.
///
/// Stable across refreshes: the same physical station carries the same id
/// in both the status and the information half of the feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner [`String`].
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for StationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
