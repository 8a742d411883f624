//! Identifier types used throughout the meshsync core.
//!
//! Replica identity is supplied by the embedder (derived from a MAC address,
//! a keypair, or an allocation service) and must be globally unique across
//! every replica that will ever merge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a replica in the sync network.
///
/// The library never generates these; uniqueness is an embedder precondition.
/// Two replicas sharing an id lose the tie-break guarantee of [`crate::Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicaId(u64);

impl ReplicaId {
    /// Creates a replica id from a raw 64-bit value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying 64-bit value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parses a replica id from a decimal string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(s.parse()?))
    }
}

impl From<u64> for ReplicaId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReplicaId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
