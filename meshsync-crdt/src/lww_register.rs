//! Last-Writer-Wins Register (LWW-Register).
//!
//! A CRDT that stores a single value. Concurrent writes are resolved by
//! comparing the logical stamps attached to them — the write with the
//! greatest stamp wins, and the stamp's uid component makes ties between
//! distinct replicas impossible.
//!
//! Use cases:
//! - Single-value properties (a title, a status, a configuration field)
//! - Any cell where "last write wins" semantics are acceptable

use crate::{Error, Result};
use meshsync_types::{ReplicaId, Tag};
use serde::{Deserialize, Serialize};

/// A Last-Writer-Wins Register.
///
/// Stores a value of type `V` along with the [`Tag`] of the write that
/// produced it. When two replicas hold different values, the one whose tag is
/// greater wins on merge.
///
/// A freshly constructed register has never been written: reading it returns
/// [`Error::Uninitialized`] until the first [`assign`](LWWRegister::assign).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LWWRegister<V> {
    /// The current value; `None` until the first assign.
    value: Option<V>,
    /// Stamp of the write that produced the current value.
    tag: Tag,
}

impl<V> LWWRegister<V> {
    /// Creates an unwritten register owned by the given replica.
    #[must_use]
    pub fn new(replica: ReplicaId) -> Self {
        Self {
            value: None,
            tag: Tag::new(replica),
        }
    }

    /// Returns a reference to the current value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] if the register has never been
    /// assigned.
    pub fn value(&self) -> Result<&V> {
        if self.tag.is_beginning_of_time() {
            return Err(Error::Uninitialized);
        }
        self.value.as_ref().ok_or(Error::Uninitialized)
    }

    /// Returns the stamp of the last write.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the replica that owns this register.
    #[must_use]
    pub fn replica_id(&self) -> ReplicaId {
        self.tag.replica_id()
    }

    /// Assigns a new value, advancing the register's stamp.
    pub fn assign(&mut self, value: V) {
        self.tag.update();
        self.value = Some(value);
    }
}

impl<V: Clone> LWWRegister<V> {
    /// Merges another register into this one.
    ///
    /// Adopts the other register's value and stamp iff the other stamp is
    /// strictly greater; otherwise this is a no-op. The adopted stamp keeps
    /// this replica as owner, so a later local assign is ordered after it.
    ///
    /// This operation is:
    /// - Commutative: merge(a, b) == merge(b, a)
    /// - Associative: merge(merge(a, b), c) == merge(a, merge(b, c))
    /// - Idempotent: merge(a, a) == a
    pub fn merge(&mut self, other: &Self) {
        if self.tag < other.tag {
            self.value = other.value.clone();
            self.tag.copy_from(&other.tag);
        }
    }

    /// Creates a new register that is the merge of this and another.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

impl<V: PartialEq> PartialEq for LWWRegister<V> {
    fn eq(&self, other: &Self) -> bool {
        // Two registers are equal if they hold the same value at the same
        // position in the write order.
        self.value == other.value && self.tag == other.tag
    }
}

impl<V: Eq> Eq for LWWRegister<V> {}
