//! Logical stamps for ordering writes across replicas.
//!
//! A [`Tag`] is a replica-local logical clock reading: a monotonically
//! increasing sequence number paired with the id of the replica that produced
//! it. The pair gives a total order over all writes in the system without any
//! reference to wall-clock time.

use crate::ReplicaId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A totally-ordered logical stamp.
///
/// Consists of:
/// - `seq`: a monotonically increasing sequence number
/// - `uid`: the id of the replica that last advanced the stamp
/// - `replica`: the replica that owns this stamp (fixed at construction)
///
/// Two stamps compare by `(seq, uid)` lexicographically. Because every
/// [`update`](Tag::update) refreshes `uid` from the owning replica, stamps
/// produced by distinct replicas at the same sequence number still order
/// deterministically. As long as replica ids are unique, ties are impossible.
///
/// The owning replica id is carried for bookkeeping but takes part in neither
/// ordering nor equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tag {
    /// Monotonically increasing sequence number.
    seq: u64,
    /// Id of the replica that last advanced the stamp.
    uid: u64,
    /// The replica this stamp belongs to.
    replica: ReplicaId,
}

impl Tag {
    /// Creates a beginning-of-time stamp owned by the given replica.
    ///
    /// No write has happened yet: `seq` is zero and
    /// [`is_beginning_of_time`](Tag::is_beginning_of_time) returns true.
    #[must_use]
    pub const fn new(replica: ReplicaId) -> Self {
        Self {
            seq: 0,
            uid: replica.as_u64(),
            replica,
        }
    }

    /// Advances the stamp by one local event.
    ///
    /// Increments the sequence number and re-stamps `uid` with the owning
    /// replica's id, so the advanced stamp is attributed to this replica.
    ///
    /// # Panics
    ///
    /// Panics if the sequence number overflows `u64`. At one update per
    /// nanosecond that takes five centuries.
    pub fn update(&mut self) {
        self.seq = self.seq.checked_add(1).expect("sequence number overflow");
        self.uid = self.replica.as_u64();
    }

    /// Adopts another stamp's position in the global order.
    ///
    /// Copies `(seq, uid)` from `other`; the owning replica id is kept, so a
    /// later [`update`](Tag::update) is attributed to this replica again.
    pub fn copy_from(&mut self, other: &Tag) {
        self.seq = other.seq;
        self.uid = other.uid;
    }

    /// Returns true if no write has ever advanced this stamp.
    #[must_use]
    pub const fn is_beginning_of_time(&self) -> bool {
        self.seq == 0
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn sequence_number(&self) -> u64 {
        self.seq
    }

    /// Returns the id of the replica that last advanced the stamp.
    #[must_use]
    pub const fn unique_id(&self) -> u64 {
        self.uid
    }

    /// Returns the owning replica id.
    #[must_use]
    pub const fn replica_id(&self) -> ReplicaId {
        self.replica
    }
}

// Equality, hashing and ordering deliberately ignore the owning replica:
// stamps are positions in the global write order, and `(seq, uid)` is the
// whole position. A derive would drag `replica` into the comparison.

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq && self.uid == other.uid
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seq.hash(state);
        self.uid.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.seq.cmp(&other.seq) {
            Ordering::Equal => self.uid.cmp(&other.uid),
            other => other,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.seq, self.uid)
    }
}
