//! Configuration canonicalization
//!
//! The normal form of a configuration is the least tuple of serializations
//! of its generated objects, taken over every symmetry of the loose-object
//! layout that fixes the initial configuration and over every ordering of
//! construction steps that places each step after its dependencies. The
//! outputs of one construction call stay together as a single step. A
//! configuration is canonical iff its construction order already spells out
//! the normal form.
//!
//! Two implementations share this definition: [`RegistryCanonicalizer`]
//! remaps objects through the registry and memoizes remapped ids, while
//! [`RecomputingCanonicalizer`] rebuilds remapped serializations on every
//! call and never writes to the registry.

use crate::error::{GenerationError, GenerationResult};
use crate::ir::{
    format_constructed, Argument, Configuration, ConfigurationObject, LooseObjectLayout, ObjectId,
    ObjectRegistry,
};
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLock};

/// Acceptance gate for generated configurations
pub trait Canonicalizer: Send + Sync {
    /// Registry the configurations' objects are interned in
    fn registry(&self) -> &ObjectRegistry;

    /// Least serialization tuple of the generated objects
    fn normal_form(&self, configuration: &Configuration) -> GenerationResult<Vec<String>>;

    /// Whether the construction order equals the normal form
    fn is_canonical(&self, configuration: &Configuration) -> GenerationResult<bool> {
        let actual = configuration
            .generated_objects()
            .iter()
            .map(|&id| self.registry().serialization(id))
            .collect::<GenerationResult<Vec<_>>>()?;
        Ok(actual == self.normal_form(configuration)?)
    }
}

/// Minimizing choice found while computing a normal form
#[derive(Debug, Clone, PartialEq, Eq)]
struct LeastForm {
    mapping: usize,
    order: Vec<usize>,
    serializations: Vec<String>,
}

/// Generated objects grouped by construction call
///
/// The outputs of one call form a block, in output order. `dependencies[b]`
/// lists the blocks that block `b` builds on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Blocks {
    members: Vec<Vec<usize>>,
    dependencies: Vec<Vec<usize>>,
}

fn generated_blocks(configuration: &Configuration, registry: &ObjectRegistry) -> GenerationResult<Blocks> {
    let generated = configuration.generated_objects();
    let position: FxHashMap<ObjectId, usize> =
        generated.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut calls: FxHashMap<(String, Vec<Argument>), usize> = FxHashMap::default();
    let mut members: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut block_of = Vec::with_capacity(generated.len());
    let mut objects = Vec::with_capacity(generated.len());

    for (i, &id) in generated.iter().enumerate() {
        let object = registry.object(id)?;
        let block = match &object {
            ConfigurationObject::Constructed {
                construction,
                arguments,
                output,
            } => {
                let next = members.len();
                let block = *calls
                    .entry((construction.name().to_string(), arguments.clone()))
                    .or_insert(next);
                if block == next {
                    members.push(Vec::new());
                }
                members[block].push((*output, i));
                block
            }
            ConfigurationObject::Loose { .. } => {
                members.push(vec![(0, i)]);
                members.len() - 1
            }
        };
        block_of.push(block);
        objects.push(object);
    }

    let mut dependencies = vec![Vec::new(); members.len()];
    for (i, object) in objects.iter().enumerate() {
        for d in object.dependencies() {
            let Some(&j) = position.get(&d) else { continue };
            let (from, to) = (block_of[i], block_of[j]);
            if from != to && !dependencies[from].contains(&to) {
                dependencies[from].push(to);
            }
        }
    }

    let members = members
        .into_iter()
        .map(|mut block| {
            block.sort_unstable();
            block.into_iter().map(|(_, i)| i).collect()
        })
        .collect();
    Ok(Blocks { members, dependencies })
}

/// Lexicographically least dependency-respecting ordering of whole blocks
///
/// Always taking the block with the least serializations is exact: blocks
/// of distinct calls start with distinct objects, so they differ at their
/// first member.
fn least_ordering(serializations: &[String], blocks: &Blocks) -> Vec<usize> {
    let n = blocks.members.len();
    let key = move |b: usize| blocks.members[b].iter().map(move |&i| &serializations[i]);
    let mut placed = vec![false; n];
    let mut order = Vec::with_capacity(serializations.len());

    for _ in 0..n {
        let next = (0..n)
            .filter(|&b| !placed[b] && blocks.dependencies[b].iter().all(|&d| placed[d]))
            .min_by(|&a, &b| key(a).cmp(key(b)));
        let Some(b) = next else { break };
        placed[b] = true;
        order.extend_from_slice(&blocks.members[b]);
    }
    order
}

/// Search all admissible mappings for the least form
///
/// `remap` returns the serializations of every constructed object, in
/// construction order, under the given mapping.
fn least_form<F>(
    configuration: &Configuration,
    registry: &ObjectRegistry,
    mut remap: F,
) -> GenerationResult<LeastForm>
where
    F: FnMut(usize, &[usize]) -> GenerationResult<Vec<String>>,
{
    let initial_len = configuration.initial_objects().len();
    let blocks = generated_blocks(configuration, registry)?;

    let mut initial = configuration
        .initial_objects()
        .iter()
        .map(|&id| registry.serialization(id))
        .collect::<GenerationResult<Vec<_>>>()?;
    initial.sort();

    let mut best: Option<LeastForm> = None;
    for (index, mapping) in configuration.layout().symmetry_mappings().iter().enumerate() {
        let mut remapped = remap(index, mapping)?;
        let generated = remapped.split_off(initial_len);

        remapped.sort();
        if remapped != initial {
            continue;
        }

        let order = least_ordering(&generated, &blocks);
        let serializations: Vec<String> = order.iter().map(|&i| generated[i].clone()).collect();
        let better = best.as_ref().map_or(true, |b| serializations < b.serializations);
        if better {
            best = Some(LeastForm {
                mapping: index,
                order,
                serializations,
            });
        }
    }

    // The identity is always admissible
    best.ok_or_else(|| GenerationError::InvalidConfiguration("layout has no symmetry mappings".to_string()))
}

fn loose_image(configuration: &Configuration, mapping: &[usize], index: usize) -> GenerationResult<ObjectId> {
    mapping
        .get(index)
        .and_then(|&image| configuration.loose_objects().get(image))
        .copied()
        .ok_or_else(|| {
            GenerationError::InvalidConfiguration(format!("loose slot {index} is outside the layout"))
        })
}

/// Canonicalizer that interns remapped objects
///
/// Remapped ids are memoized per layout, mapping and object, so repeated
/// checks of configurations sharing a history only remap their new objects.
#[derive(Debug, Default)]
pub struct RegistryCanonicalizer {
    registry: ObjectRegistry,
    memo: RwLock<FxHashMap<(LooseObjectLayout, usize, ObjectId), ObjectId>>,
}

impl RegistryCanonicalizer {
    pub fn new(registry: ObjectRegistry) -> Self {
        Self {
            registry,
            memo: RwLock::new(FxHashMap::default()),
        }
    }

    /// Image of an object under a symmetry mapping
    pub fn remap(
        &self,
        configuration: &Configuration,
        index: usize,
        mapping: &[usize],
        id: ObjectId,
    ) -> GenerationResult<ObjectId> {
        let key = (configuration.layout(), index, id);
        if let Some(&hit) = self.memo.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(hit);
        }

        let image = match self.registry.object(id)? {
            ConfigurationObject::Loose { index: slot, .. } => loose_image(configuration, mapping, slot)?,
            ConfigurationObject::Constructed {
                construction,
                arguments,
                output,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|a| a.try_map_objects(&mut |d| self.remap(configuration, index, mapping, d)))
                    .collect::<GenerationResult<Vec<_>>>()?;
                self.registry
                    .intern_id(ConfigurationObject::constructed(construction, arguments, output))?
            }
        };

        self.memo
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, image);
        Ok(image)
    }

    fn least(&self, configuration: &Configuration) -> GenerationResult<LeastForm> {
        least_form(configuration, &self.registry, |index, mapping| {
            configuration
                .constructed_objects()
                .iter()
                .map(|&id| {
                    let image = self.remap(configuration, index, mapping, id)?;
                    self.registry.serialization(image)
                })
                .collect()
        })
    }

    /// The configuration rebuilt in normal-form order
    pub fn canonical_configuration(&self, configuration: &Configuration) -> GenerationResult<Configuration> {
        let least = self.least(configuration)?;
        let mappings = configuration.layout().symmetry_mappings();
        let mapping = &mappings[least.mapping];

        let initial = configuration
            .initial_objects()
            .iter()
            .map(|&id| self.remap(configuration, least.mapping, mapping, id))
            .collect::<GenerationResult<Vec<_>>>()?;
        let generated = configuration.generated_objects();
        let ordered = least
            .order
            .iter()
            .map(|&i| self.remap(configuration, least.mapping, mapping, generated[i]))
            .collect::<GenerationResult<Vec<_>>>()?;

        Configuration::initial(configuration.layout(), initial, &self.registry)?
            .extended(&ordered, &self.registry)
    }

    /// Apply a symmetry mapping to every constructed object, keeping order
    pub fn apply_symmetry(&self, configuration: &Configuration, index: usize) -> GenerationResult<Configuration> {
        let mappings = configuration.layout().symmetry_mappings();
        let mapping = mappings.get(index).ok_or_else(|| {
            GenerationError::InvalidConfiguration(format!("layout has no symmetry mapping {index}"))
        })?;
        let remap = |ids: &[ObjectId]| {
            ids.iter()
                .map(|&id| self.remap(configuration, index, mapping, id))
                .collect::<GenerationResult<Vec<_>>>()
        };

        let initial = remap(configuration.initial_objects())?;
        let generated = remap(configuration.generated_objects())?;
        Configuration::initial(configuration.layout(), initial, &self.registry)?
            .extended(&generated, &self.registry)
    }
}

impl Canonicalizer for RegistryCanonicalizer {
    fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    fn normal_form(&self, configuration: &Configuration) -> GenerationResult<Vec<String>> {
        Ok(self.least(configuration)?.serializations)
    }
}

/// Canonicalizer that recomputes remapped serializations
///
/// Keeps no state between calls and never registers remapped objects.
#[derive(Debug, Clone, Default)]
pub struct RecomputingCanonicalizer {
    registry: ObjectRegistry,
}

impl RecomputingCanonicalizer {
    pub fn new(registry: ObjectRegistry) -> Self {
        Self { registry }
    }

    fn serialize(
        &self,
        configuration: &Configuration,
        mapping: &[usize],
        id: ObjectId,
        cache: &mut FxHashMap<ObjectId, String>,
    ) -> GenerationResult<String> {
        if let Some(hit) = cache.get(&id) {
            return Ok(hit.clone());
        }

        let serialization = match self.registry.object(id)? {
            ConfigurationObject::Loose { index, .. } => {
                self.registry.serialization(loose_image(configuration, mapping, index)?)?
            }
            ConfigurationObject::Constructed {
                construction,
                arguments,
                output,
            } => {
                let parts = arguments
                    .iter()
                    .map(|a| self.serialize_argument(configuration, mapping, a, cache))
                    .collect::<GenerationResult<Vec<_>>>()?;
                format_constructed(construction.name(), &parts, output)
            }
        };

        cache.insert(id, serialization.clone());
        Ok(serialization)
    }

    fn serialize_argument(
        &self,
        configuration: &Configuration,
        mapping: &[usize],
        argument: &Argument,
        cache: &mut FxHashMap<ObjectId, String>,
    ) -> GenerationResult<String> {
        match argument {
            Argument::Object(id) => self.serialize(configuration, mapping, *id, cache),
            Argument::Set(members) => {
                let mut parts = members
                    .iter()
                    .map(|m| self.serialize_argument(configuration, mapping, m, cache))
                    .collect::<GenerationResult<Vec<_>>>()?;
                parts.sort();
                Ok(format!("{{{}}}", parts.join(",")))
            }
        }
    }
}

impl Canonicalizer for RecomputingCanonicalizer {
    fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    fn normal_form(&self, configuration: &Configuration) -> GenerationResult<Vec<String>> {
        let least = least_form(configuration, &self.registry, |_, mapping| {
            let mut cache = FxHashMap::default();
            configuration
                .constructed_objects()
                .iter()
                .map(|&id| self.serialize(configuration, mapping, id, &mut cache))
                .collect()
        })?;
        Ok(least.serializations)
    }
}
