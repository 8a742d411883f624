//! Convergent map with add-wins keys and last-writer-wins values.
//!
//! [`ORMap`] composes an [`ORSet`] of keys with one [`LWWRegister`] per live
//! key. Key presence resolves like the set (concurrent put and remove of the
//! same key keeps the key); the value under a surviving key resolves like the
//! register (the write with the greatest stamp wins).
//!
//! Use cases:
//! - Replicated key-value state (settings, profiles, service catalogs)
//! - Any mapping where per-key last-writer-wins is acceptable

use crate::{Error, LWWRegister, ORSet, Result};
use meshsync_types::ReplicaId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// A convergent map: add-wins on keys, last-writer-wins on values.
///
/// Every live key has exactly one register holding its current value. A
/// register exists only while its key does; removing the key erases the
/// register, and the key set's merge decides which keys survive a sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ORMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Key presence, with add-wins conflict resolution.
    keys: ORSet<K>,
    /// The current value for each live key.
    registers: HashMap<K, LWWRegister<V>>,
}

impl<K, V> ORMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new empty map owned by the given replica.
    #[must_use]
    pub fn new(replica: ReplicaId) -> Self {
        Self {
            keys: ORSet::new(replica),
            registers: HashMap::new(),
        }
    }

    /// Returns the local replica id.
    #[must_use]
    pub fn replica_id(&self) -> ReplicaId {
        self.keys.replica_id()
    }

    /// Returns true if the map contains the key.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns an iterator over the live keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// Returns an iterator over the live key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.registers
            .iter()
            .filter(|(key, _)| self.keys.contains(*key))
            .filter_map(|(key, register)| register.value().ok().map(|value| (key, value)))
    }

    /// Returns a snapshot of the live key-value pairs.
    #[must_use]
    pub fn key_value_pairs(&self) -> HashMap<K, V> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Puts a key-value pair into the map.
    ///
    /// Adds the key to the key set and assigns the value to the key's
    /// register, creating the register on first use. The register is created
    /// lazily so that keys adopted from peers during a merge can bind their
    /// registers to this replica at that point instead.
    pub fn put(&mut self, key: K, value: V) {
        self.keys.add(key.clone());
        let replica = self.replica_id();
        self.registers
            .entry(key)
            .or_insert_with(|| LWWRegister::new(replica))
            .assign(value);
    }

    /// Gets the value of a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the key is not present.
    pub fn get(&self, key: &K) -> Result<&V> {
        if !self.contains(key) {
            return Err(Error::NotFound);
        }
        self.registers.get(key).ok_or(Error::NotFound)?.value()
    }

    /// Removes a key from the map, erasing its register.
    ///
    /// Returns true if the key was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.registers.remove(key);
        self.keys.remove(key)
    }

    /// Merges another map into this one.
    ///
    /// Key survival is decided by the key set's merge; registers of dropped
    /// keys are erased. Surviving keys then reconcile values: a key known on
    /// both sides merges register-to-register, while a key adopted from the
    /// remote gets a fresh local register seeded with the remote value and
    /// merged with the remote register. The seeding assign moves the new
    /// register past beginning-of-time; the concluding merge settles on
    /// whichever stamp is greater, and since the interim value equals the
    /// remote value either way, no caller can observe the difference.
    pub fn merge(&mut self, other: &Self) {
        let known_keys: Vec<K> = self.keys.iter().cloned().collect();

        self.keys.merge(&other.keys);

        // The key-set merge decided these were deliberately removed.
        for key in &known_keys {
            if !self.keys.contains(key) {
                self.registers.remove(key);
            }
        }

        for (key, remote_register) in &other.registers {
            match self.registers.get_mut(key) {
                Some(local_register) => local_register.merge(remote_register),
                None => {
                    if !self.keys.contains(key) {
                        continue;
                    }
                    let mut register = LWWRegister::new(self.keys.replica_id());
                    // Registers are always assigned before they are shared,
                    // so the value read cannot fail on well-formed input.
                    if let Ok(value) = remote_register.value() {
                        register.assign(value.clone());
                    }
                    register.merge(remote_register);
                    self.registers.insert(key.clone(), register);
                }
            }
        }
    }

    /// Creates a new map that is the merge of this and another.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}
