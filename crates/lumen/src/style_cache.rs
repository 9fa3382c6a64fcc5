//! Shared resolution caches.
//!
//! Nodes whose own style map and whose styled ancestors' style maps are the
//! same share one [`StyleCache`]. Inside it, one [`StyleCacheEntry`] exists
//! per combination of transition states and reference font.

use std::collections::HashMap;
use std::rc::Rc;

use lcss::{CalculatedValue, Font, Lookup, PseudoClassState};
use smallvec::SmallVec;

/// Style map ids of a node and its styled ancestors, leaf first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StyleCacheKey(SmallVec<[u64; 8]>);

impl StyleCacheKey {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn ids(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The key with the leaf id removed, i.e. what the parent's key should be.
    pub fn parent_ids(&self) -> &[u64] {
        self.0.get(1..).unwrap_or_default()
    }
}

/// Live pseudo-classes that matter for a node and its styled ancestors, leaf first.
pub type TransitionStates = SmallVec<[PseudoClassState; 8]>;

/// Addresses one entry inside a [`StyleCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleCacheEntryKey {
    pub states: TransitionStates,
    /// The reference font relative sizes were resolved against.
    pub font: Font,
}

impl StyleCacheEntryKey {
    pub fn new(states: TransitionStates, font: Font) -> Self {
        Self { states, font }
    }
}

/// Resolved values for one state and font.
///
/// `Lookup::NoStyle` is cached too, so a miss and a known absence are told
/// apart.
#[derive(Debug, Default)]
pub struct StyleCacheEntry {
    values: HashMap<String, Lookup<Rc<CalculatedValue>>>,
}

impl StyleCacheEntry {
    pub fn get(&self, property: &str) -> Option<&Lookup<Rc<CalculatedValue>>> {
        self.values.get(property)
    }

    pub fn put(&mut self, property: &str, value: Lookup<Rc<CalculatedValue>>) {
        self.values.insert(property.to_string(), value);
    }

    pub fn remove(&mut self, property: &str) {
        self.values.remove(property);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All entries for one [`StyleCacheKey`].
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: HashMap<StyleCacheEntryKey, StyleCacheEntry>,
}

impl StyleCache {
    pub fn entry(&self, key: &StyleCacheEntryKey) -> Option<&StyleCacheEntry> {
        self.entries.get(key)
    }

    /// The entry for `key`, created empty on first use.
    pub fn entry_mut(&mut self, key: &StyleCacheEntryKey) -> &mut StyleCacheEntry {
        self.entries.entry(key.clone()).or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
