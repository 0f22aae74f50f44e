//! Known-invalid object cache

use crate::ir::{Configuration, ObjectId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Objects already found unconstructible or duplicate
///
/// Unconstructibility depends only on the object, so it is cached by id.
/// A duplicate only rejects an object in configurations that also contain
/// an object it coincides with.
#[derive(Debug, Clone, Default)]
pub struct InvalidObjectCache {
    unconstructible: FxHashSet<ObjectId>,
    duplicates: FxHashMap<ObjectId, FxHashSet<ObjectId>>,
}

impl InvalidObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_unconstructible(&mut self, id: ObjectId) {
        self.unconstructible.insert(id);
    }

    pub fn mark_duplicate(&mut self, newer: ObjectId, older: ObjectId) {
        self.duplicates.entry(newer).or_default().insert(older);
    }

    /// Whether `id` is known to be invalid when added to `configuration`
    pub fn is_known_invalid(&self, id: ObjectId, configuration: &Configuration) -> bool {
        if self.unconstructible.contains(&id) {
            return true;
        }
        self.duplicates
            .get(&id)
            .is_some_and(|olders| olders.iter().any(|&older| configuration.contains(older)))
    }

    pub fn len(&self) -> usize {
        self.unconstructible.len() + self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
