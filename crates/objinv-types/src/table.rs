//! The in-memory inventory: object type → object name → [`Entry`].
//!
//! Both levels keep insertion order. Object types iterate in the order they
//! first appeared and names in the order they were first inserted; replacing
//! an existing name keeps its position. Writers rely on this to emit the same
//! bytes for the same sequence of insertions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::object_type::ObjectType;

/// Entries of a single object type, keyed by object name.
pub type TypeEntries = IndexMap<String, Entry>;

/// Two-level, insertion-ordered inventory table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryTable {
    types: IndexMap<ObjectType, TypeEntries>,
}

impl InventoryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced.
    ///
    /// A repeated `(object_type, name)` overwrites the earlier entry.
    pub fn insert(
        &mut self,
        object_type: ObjectType,
        name: impl Into<String>,
        entry: Entry,
    ) -> Option<Entry> {
        self.types
            .entry(object_type)
            .or_default()
            .insert(name.into(), entry)
    }

    /// Look up an entry by type and name.
    pub fn get(&self, object_type: &str, name: &str) -> Option<&Entry> {
        self.types.get(object_type)?.get(name)
    }

    /// Returns `true` if the table holds `(object_type, name)`.
    pub fn contains(&self, object_type: &str, name: &str) -> bool {
        self.get(object_type, name).is_some()
    }

    /// All entries of one object type.
    pub fn entries(&self, object_type: &str) -> Option<&TypeEntries> {
        self.types.get(object_type)
    }

    /// Object types in order of first appearance.
    pub fn object_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.keys()
    }

    /// Every `(type, name, entry)` triple, grouped by type, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectType, &str, &Entry)> {
        self.types.iter().flat_map(|(ty, entries)| {
            entries
                .iter()
                .map(move |(name, entry)| (ty, name.as_str(), entry))
        })
    }

    /// Total number of entries across all types.
    pub fn len(&self) -> usize {
        self.types.values().map(IndexMap::len).sum()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct object types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
