//! State-based CRDT implementations for meshsync.
//!
//! This crate provides Conflict-free Replicated Data Types whose only
//! synchronization primitive is `merge(&other)` over a peer's full state:
//!
//! - [`LWWRegister<V>`] — Last-Writer-Wins Register for single values
//! - [`ORSet<E>`] — Observed-Remove Set with add-wins semantics
//! - [`ORMap<K, V>`] — Map with add-wins keys and last-writer-wins values
//!
//! All CRDTs in this crate satisfy the following properties:
//! - **Commutative**: merge(a, b) == merge(b, a)
//! - **Associative**: merge(merge(a, b), c) == merge(a, merge(b, c))
//! - **Idempotent**: merge(a, a) == a
//!
//! These properties ensure that replicas converge to the same state
//! regardless of the order, grouping, or multiplicity of state exchanges.
//! Each replica applies local updates unilaterally; convergence only requires
//! that every pair of replicas eventually merge each other's state.
//!
//! Instances are single-threaded: the embedder serialises access to a replica
//! and ships read-only snapshots between replicas. Replica ids must be
//! globally unique — the tie-break in [`meshsync_types::Tag`] depends on it.

mod lww_register;
mod or_map;
mod orset;

pub use lww_register::LWWRegister;
pub use or_map::ORMap;
pub use orset::ORSet;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading CRDT state.
///
/// Both variants are caller errors; `merge` never fails for well-formed
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A register was read before any value was assigned to it.
    #[error("register has never been assigned a value")]
    Uninitialized,

    /// A map was read at a key that is not present.
    #[error("key not found")]
    NotFound,
}
