//! A single numeric realization of a configuration

use crate::error::{GenerationError, GenerationResult};
use crate::geometry::AnalyticObject;
use crate::ir::{ObjectId, ObjectKind};
use rustc_hash::FxHashMap;

/// Map from symbolic objects to their analytic values in one realization
///
/// Analytic values are pairwise distinct; objects found to coincide with an
/// existing value are kept in a separate duplicate table.
#[derive(Debug, Clone, Default)]
pub struct Picture {
    objects: Vec<(ObjectId, AnalyticObject)>,
    index: FxHashMap<ObjectId, usize>,
    duplicates: FxHashMap<ObjectId, ObjectId>,
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analytic value of a symbolic object
    pub fn get(&self, id: ObjectId) -> Option<&AnalyticObject> {
        self.index.get(&id).map(|&i| &self.objects[i].1)
    }

    /// Analytic value of a symbolic object, or a formal error
    pub fn require(&self, id: ObjectId) -> GenerationResult<AnalyticObject> {
        self.get(id).copied().ok_or(GenerationError::MissingRealization(id))
    }

    /// Symbolic object already realized with an equal value
    pub fn find(&self, value: &AnalyticObject) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, existing)| existing.approx_eq(value))
            .map(|(id, _)| *id)
    }

    /// Add a realized object
    ///
    /// Callers check [`Picture::find`] first; re-adding an id replaces its value.
    pub fn add(&mut self, id: ObjectId, value: AnalyticObject) {
        match self.index.get(&id) {
            Some(&i) => self.objects[i].1 = value,
            None => {
                self.index.insert(id, self.objects.len());
                self.objects.push((id, value));
            }
        }
    }

    /// Remember that `newer` has the same value as `older`
    pub fn mark_duplicate(&mut self, newer: ObjectId, older: ObjectId) {
        self.duplicates.insert(newer, older);
    }

    /// Earlier object a known duplicate coincides with
    pub fn duplicate_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.duplicates.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index.contains_key(&id)
    }

    /// Realized objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(ObjectId, AnalyticObject)> {
        self.objects.iter()
    }

    /// Realized points with their ids
    pub fn points(&self) -> impl Iterator<Item = (ObjectId, crate::geometry::Point2D)> + '_ {
        self.objects
            .iter()
            .filter_map(|(id, value)| value.as_point().map(|p| (*id, p)))
    }

    /// Number of realized objects of a kind
    pub fn count_of_kind(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|(_, v)| v.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2D;

    fn point(x: f64, y: f64) -> AnalyticObject {
        AnalyticObject::Point(Point2D::new(x, y))
    }

    #[test]
    fn test_add_and_find() {
        let mut picture = Picture::new();
        picture.add(ObjectId(0), point(1.0, 2.0));
        picture.add(ObjectId(1), point(3.0, 4.0));

        assert_eq!(picture.find(&point(1.0 + 1e-9, 2.0)), Some(ObjectId(0)));
        assert_eq!(picture.find(&point(5.0, 5.0)), None);
        assert_eq!(picture.len(), 2);
        assert_eq!(picture.count_of_kind(ObjectKind::Point), 2);
    }

    #[test]
    fn test_missing_realization() {
        let picture = Picture::new();
        assert!(matches!(
            picture.require(ObjectId(4)),
            Err(GenerationError::MissingRealization(ObjectId(4)))
        ));
    }

    #[test]
    fn test_duplicate_table() {
        let mut picture = Picture::new();
        picture.add(ObjectId(0), point(0.0, 0.0));
        picture.mark_duplicate(ObjectId(7), ObjectId(0));

        assert_eq!(picture.duplicate_of(ObjectId(7)), Some(ObjectId(0)));
        assert!(!picture.contains(ObjectId(7)));
        assert_eq!(picture.points().count(), 1);
    }
}
