//! Observed-Remove Set (OR-Set / Add-Wins Set).
//!
//! A CRDT set that supports both add and remove operations. Unlike naive
//! sets, a concurrent add and remove of the same element results in the
//! element being present (add-wins semantics).
//!
//! Each add stamps the element with the local replica's logical clock.
//! Removal deletes the element outright — there are no tombstones. What
//! distinguishes "never seen here" from "seen and removed" is the version
//! vector: a replica whose vector has moved past every add-stamp of an
//! element has observed the element and deliberately dropped it.
//!
//! Use cases:
//! - Membership lists
//! - Tags or labels on an entity
//! - The key set of [`crate::ORMap`]

use meshsync_types::{ReplicaId, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// An Observed-Remove Set (OR-Set).
///
/// Provides set semantics with add and remove operations that commute
/// properly. Add-wins: if an element is concurrently added and removed, it
/// remains in the set.
///
/// Internally the set tracks, for every present element, the most recent
/// stamp at which each replica added it (its *evidence*), plus a version
/// vector recording the highest stamp ever observed from each replica.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ORSet<E>
where
    E: Eq + Hash + Clone,
{
    /// Map from element to its per-replica add-stamps.
    elements: HashMap<E, HashMap<ReplicaId, Tag>>,
    /// Highest stamp produced locally or witnessed from each replica.
    versions: HashMap<ReplicaId, Tag>,
    /// The local replica.
    replica: ReplicaId,
}

impl<E> ORSet<E>
where
    E: Eq + Hash + Clone,
{
    /// Creates a new empty set owned by the given replica.
    #[must_use]
    pub fn new(replica: ReplicaId) -> Self {
        Self {
            elements: HashMap::new(),
            versions: HashMap::new(),
            replica,
        }
    }

    /// Returns the local replica id.
    #[must_use]
    pub fn replica_id(&self) -> ReplicaId {
        self.replica
    }

    /// Returns true if the set contains the element.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.elements.contains_key(element)
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the elements in the set.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.elements.keys()
    }

    /// Returns the set's version vector (for replication/debugging).
    pub fn versions(&self) -> impl Iterator<Item = (&ReplicaId, &Tag)> {
        self.versions.iter()
    }

    /// Adds an element to the set.
    ///
    /// Bumps the local version vector entry and stamps the element with it.
    /// Adding an element that is already present refreshes the local
    /// evidence, which is what lets a re-add win over an older remote remove.
    pub fn add(&mut self, element: E) {
        let stamp = self.bump_local_version();
        self.elements
            .entry(element)
            .or_default()
            .insert(self.replica, stamp);
    }

    /// Removes an element from the set.
    ///
    /// Deletes the element and all of its evidence; no tombstone is kept.
    /// The local version vector entry is bumped past the element's
    /// add-stamps, which is what peers later read as proof of a deliberate
    /// remove. Removing an absent element is a no-op.
    ///
    /// Returns true if the element was present.
    pub fn remove(&mut self, element: &E) -> bool {
        if self.elements.remove(element).is_none() {
            return false;
        }
        self.bump_local_version();
        true
    }

    /// Merges another OR-Set into this one.
    ///
    /// Applies, in order: the remote's removes, the remote's adds, and the
    /// remote's version vector. The first two phases judge freshness against
    /// the version vectors as they stood *before* the merge, so the third
    /// phase must run last.
    ///
    /// The resulting element set is the same regardless of which side merges
    /// first, and re-merging the same state is a no-op.
    pub fn merge(&mut self, other: &Self) {
        self.apply_remote_removes(other);
        self.apply_remote_adds(other);
        self.merge_versions(other);
    }

    /// Creates a new set that is the merge of this and another.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    /// Bumps the local version vector entry and returns the new stamp.
    fn bump_local_version(&mut self) -> Tag {
        let version = self
            .versions
            .entry(self.replica)
            .or_insert_with(|| Tag::new(self.replica));
        version.update();
        *version
    }

    /// Drops every local element the remote has observed and removed.
    ///
    /// An element absent from the remote is dropped only when both hold:
    /// 1. the remote's version vector covers every local add-stamp (no
    ///    concurrent or newer add exists — otherwise the add wins), and
    /// 2. some remote version entry has moved strictly past the evidence
    ///    here, or belongs to a replica with no evidence here at all, which
    ///    certifies the remote saw the element and dropped it rather than
    ///    never having seen it.
    fn apply_remote_removes(&mut self, other: &Self) {
        self.elements.retain(|element, stamps| {
            if other.elements.contains_key(element) {
                return true;
            }
            let covered = stamps
                .iter()
                .all(|(replica, stamp)| {
                    other.versions.get(replica).is_some_and(|seen| stamp <= seen)
                });
            if !covered {
                return true;
            }
            let removed = other
                .versions
                .iter()
                .any(|(replica, seen)| match stamps.get(replica) {
                    None => true,
                    Some(stamp) => stamp < seen,
                });
            !removed
        });
    }

    /// Absorbs the remote's elements, judged against the local version
    /// vector as it stood before this merge.
    ///
    /// For an element already present, each remote add-stamp not yet covered
    /// locally is taken over. For an element not present, the remote
    /// evidence is adopted wholesale — but only if at least one stamp is
    /// fresh; otherwise every add was already observed here and the element
    /// has since been removed locally, so resurrecting it would undo that
    /// remove.
    fn apply_remote_adds(&mut self, other: &Self) {
        let Self {
            elements, versions, ..
        } = self;
        let fresh = |replica: &ReplicaId, stamp: &Tag| match versions.get(replica) {
            None => true,
            Some(seen) => seen < stamp,
        };
        for (element, remote_stamps) in &other.elements {
            if let Some(local_stamps) = elements.get_mut(element) {
                for (replica, stamp) in remote_stamps {
                    if fresh(replica, stamp) {
                        local_stamps.insert(*replica, *stamp);
                    }
                }
            } else if remote_stamps.iter().any(|(replica, stamp)| fresh(replica, stamp)) {
                elements.insert(element.clone(), remote_stamps.clone());
            }
        }
    }

    /// Advances the local version vector to the entry-wise maximum.
    fn merge_versions(&mut self, other: &Self) {
        for (replica, remote) in &other.versions {
            match self.versions.get_mut(replica) {
                Some(local) => {
                    if *local < *remote {
                        local.copy_from(remote);
                    }
                }
                None => {
                    self.versions.insert(*replica, *remote);
                }
            }
        }
    }
}
