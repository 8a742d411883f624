//! Core type definitions for meshsync.
//!
//! This crate defines the fundamental types shared by every replica:
//! - [`ReplicaId`] — the embedder-supplied identity of a replica
//! - [`Tag`] — a totally-ordered logical stamp used to order writes
//!
//! Everything that actually replicates (sets, registers, maps) lives in
//! `meshsync-crdt`; transport, persistence and replica-id provisioning
//! belong to the embedding system.

mod ids;
mod tag;

pub use ids::ReplicaId;
pub use tag::Tag;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid replica id: {0}")]
    InvalidReplicaId(#[from] std::num::ParseIntError),
}
