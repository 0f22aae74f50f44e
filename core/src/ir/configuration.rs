//! Configurations: a loose-object layout plus constructed objects in
//! construction order

use super::layout::LooseObjectLayout;
use super::objects::{ConfigurationObject, ObjectId, ObjectKind};
use super::registry::ObjectRegistry;
use crate::error::{GenerationError, GenerationResult};
use rustc_hash::FxHashSet;

/// Existing objects of a configuration, partitioned by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPool {
    by_kind: [Vec<ObjectId>; 3],
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ObjectId, kind: ObjectKind) {
        self.by_kind[kind.index()].push(id);
    }

    /// Objects of one kind, in the order they were added
    pub fn of_kind(&self, kind: ObjectKind) -> &[ObjectId] {
        &self.by_kind[kind.index()]
    }

    pub fn len(&self) -> usize {
        self.by_kind.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A symbolic configuration
///
/// Every argument of a constructed object refers to a loose object or to an
/// earlier constructed object. The first `initial_len` constructed objects
/// belong to the initial configuration; everything after was generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    layout: LooseObjectLayout,
    loose_objects: Vec<ObjectId>,
    constructed: Vec<ObjectId>,
    initial_len: usize,
    newest_len: usize,
    pool: ObjectPool,
}

impl Configuration {
    /// Intern the layout's loose objects and build an initial configuration
    pub fn initial(
        layout: LooseObjectLayout,
        constructed: Vec<ObjectId>,
        registry: &ObjectRegistry,
    ) -> GenerationResult<Self> {
        let loose_objects = layout
            .kinds()
            .into_iter()
            .enumerate()
            .map(|(index, kind)| registry.intern_id(ConfigurationObject::loose(kind, index)))
            .collect::<GenerationResult<Vec<_>>>()?;

        let mut pool = ObjectPool::new();
        for (&id, kind) in loose_objects.iter().zip(layout.kinds()) {
            pool.add(id, kind);
        }

        let configuration = Self {
            layout,
            loose_objects,
            constructed: Vec::new(),
            initial_len: 0,
            newest_len: 0,
            pool,
        };
        let mut configuration = configuration.extended(&constructed, registry)?;
        configuration.initial_len = configuration.constructed.len();
        configuration.newest_len = 0;
        Ok(configuration)
    }

    /// A copy of this configuration with `objects` appended as its newest step
    ///
    /// Fails if an object is unknown, already present, or depends on an
    /// object that is not part of the configuration.
    pub fn extended(&self, objects: &[ObjectId], registry: &ObjectRegistry) -> GenerationResult<Self> {
        let mut next = self.clone();
        let mut present: FxHashSet<ObjectId> = self.objects().collect();

        for &id in objects {
            let object = registry.object(id)?;
            if object.is_loose() || !present.insert(id) {
                return Err(GenerationError::InvalidConfiguration(format!(
                    "object {id} is loose or already present"
                )));
            }
            if let Some(missing) = object.dependencies().into_iter().find(|d| !present.contains(d)) {
                return Err(GenerationError::UnknownObject(missing));
            }
            next.pool.add(id, registry.kind(id)?);
            next.constructed.push(id);
        }

        next.newest_len = objects.len();
        Ok(next)
    }

    pub fn layout(&self) -> LooseObjectLayout {
        self.layout
    }

    /// Loose objects, by layout slot
    pub fn loose_objects(&self) -> &[ObjectId] {
        &self.loose_objects
    }

    /// All constructed objects in construction order
    pub fn constructed_objects(&self) -> &[ObjectId] {
        &self.constructed
    }

    /// Constructed objects supplied with the initial configuration
    pub fn initial_objects(&self) -> &[ObjectId] {
        &self.constructed[..self.initial_len]
    }

    /// Constructed objects added by generation
    pub fn generated_objects(&self) -> &[ObjectId] {
        &self.constructed[self.initial_len..]
    }

    /// Objects added by the most recent construction step
    pub fn newest_objects(&self) -> &[ObjectId] {
        &self.constructed[self.constructed.len() - self.newest_len..]
    }

    /// Every object: loose first, then constructed
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.loose_objects.iter().chain(&self.constructed).copied()
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.loose_objects.contains(&id) || self.constructed.contains(&id)
    }

    /// Number of objects, loose included
    pub fn len(&self) -> usize {
        self.loose_objects.len() + self.constructed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializations of the constructed objects, in construction order
    pub fn serializations(&self, registry: &ObjectRegistry) -> GenerationResult<Vec<String>> {
        self.constructed
            .iter()
            .map(|&id| registry.serialization(id))
            .collect()
    }
}
