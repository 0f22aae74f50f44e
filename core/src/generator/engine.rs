//! Breadth-first configuration generation
//!
//! Expands frontier after frontier: every construction is applied to every
//! distinct argument list of every configuration of the previous frontier.
//! Candidates pass symbolic deduplication, the invalid-object cache, the
//! geometry registrar and finally the canonicalizer.

use super::arguments::generate_arguments;
use super::cache::InvalidObjectCache;
use super::canonical::{Canonicalizer, RecomputingCanonicalizer, RegistryCanonicalizer};
use crate::error::{GenerationError, GenerationResult};
use crate::ir::{Configuration, ConfigurationObject, Construction, LooseObjectLayout, ObjectId, ObjectRegistry};
use crate::registrar::{ConstructionBatch, GeometryRegistrar, RegistrationVerdict};
use crate::settings::{CanonicalizerKind, GenerationSettings};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// An accepted configuration with the pictures that validated it
#[derive(Debug, Clone)]
pub struct GeneratedConfiguration {
    pub configuration: Configuration,
    pub registrar: GeometryRegistrar,

    /// Iteration that produced the configuration; 0 for the initial one
    pub iteration: usize,
}

impl GeneratedConfiguration {
    /// Objects added by the final construction step
    pub fn newest_objects(&self) -> &[ObjectId] {
        self.configuration.newest_objects()
    }
}

/// Counters collected while generating
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStatistics {
    pub argument_lists: usize,
    pub symbolic_duplicates: usize,
    pub invalid_cache_hits: usize,
    pub unconstructible: usize,
    pub duplicates: usize,
    pub inconsistencies_resolved: usize,

    /// Picture redraws, counting every attempt
    pub reconstructions: usize,
    pub non_canonical: usize,
    pub emitted: usize,

    /// Number of configurations accepted per iteration
    pub frontier_sizes: Vec<usize>,
}

/// Configuration generator
pub struct Generator {
    registry: ObjectRegistry,
    constructions: Vec<Construction>,
    settings: GenerationSettings,
    initial: GeneratedConfiguration,
    canonicalizer: Box<dyn Canonicalizer>,
}

impl Generator {
    /// Validate the initial configuration and prepare a generator
    ///
    /// Every initial constructed object must register as `Ok`; otherwise
    /// the initial configuration is rejected with an initialization error.
    pub fn new(
        registry: ObjectRegistry,
        initial: Configuration,
        constructions: Vec<Construction>,
        settings: GenerationSettings,
    ) -> GenerationResult<Self> {
        settings.validate()?;

        let mut names = FxHashSet::default();
        let constructions: Vec<Construction> = constructions
            .into_iter()
            .filter(|c| names.insert(c.name().to_string()))
            .collect();

        let mut registrar = GeometryRegistrar::new(initial.layout(), initial.loose_objects().to_vec(), &settings)?;
        for &id in initial.initial_objects() {
            let ConfigurationObject::Constructed {
                construction,
                arguments,
                output,
            } = registry.object(id)?
            else {
                return Err(GenerationError::Initialization(format!("{id} is not a constructed object")));
            };
            let batch = ConstructionBatch {
                construction,
                arguments,
                objects: vec![(output, id)],
            };

            let verdict = registrar.register(batch).map_err(|e| match e {
                GenerationError::InconsistencyLimit { attempts } => GenerationError::Initialization(format!(
                    "pictures stayed inconsistent after {attempts} attempts"
                )),
                other => other,
            })?;
            if !verdict.is_ok() {
                return Err(GenerationError::Initialization(format!(
                    "{} is {verdict:?}",
                    registry.serialization(id)?
                )));
            }
        }

        let canonicalizer: Box<dyn Canonicalizer> = match settings.canonicalizer {
            CanonicalizerKind::Registry => Box::new(RegistryCanonicalizer::new(registry.clone())),
            CanonicalizerKind::Recomputing => Box::new(RecomputingCanonicalizer::new(registry.clone())),
        };

        info!(
            layout = ?initial.layout(),
            initial_objects = initial.initial_objects().len(),
            constructions = constructions.len(),
            "generator ready"
        );

        Ok(Self {
            registry,
            constructions,
            settings,
            initial: GeneratedConfiguration {
                configuration: initial,
                registrar,
                iteration: 0,
            },
            canonicalizer,
        })
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn constructions(&self) -> &[Construction] {
        &self.constructions
    }

    /// The validated initial configuration
    pub fn initial(&self) -> &GeneratedConfiguration {
        &self.initial
    }

    /// Lazily generate configurations, frontier by frontier
    pub fn run(&self) -> Generation<'_> {
        Generation {
            generator: self,
            cache: InvalidObjectCache::new(),
            statistics: GenerationStatistics::default(),
            iteration: 0,
            frontier: Vec::new().into_iter(),
            next_frontier: vec![self.initial.clone()],
            yielded: 1,
            finished: false,
        }
    }

    /// Run to completion and collect every emitted configuration
    pub fn collect_output(&self) -> GenerationResult<GenerationOutput> {
        let mut generation = self.run();
        let mut configurations = Vec::new();
        for generated in generation.by_ref() {
            configurations.push(ConfigurationRecord::new(&generated?, &self.registry)?);
        }

        Ok(GenerationOutput {
            layout: self.initial.configuration.layout(),
            initial_objects: self.initial.configuration.serializations(&self.registry)?,
            configurations,
            statistics: generation.statistics().clone(),
        })
    }
}

/// Lazy iterator over generated configurations
///
/// Each parent configuration is expanded completely before its children are
/// yielded, so a consumer never sees a partially validated configuration.
/// After an error the iterator is exhausted.
pub struct Generation<'a> {
    generator: &'a Generator,
    cache: InvalidObjectCache,
    statistics: GenerationStatistics,
    iteration: usize,
    frontier: std::vec::IntoIter<GeneratedConfiguration>,
    next_frontier: Vec<GeneratedConfiguration>,
    yielded: usize,
    finished: bool,
}

impl Generation<'_> {
    pub fn statistics(&self) -> &GenerationStatistics {
        &self.statistics
    }

    /// Current iteration; 0 before the first frontier is expanded
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn expand(&mut self, parent: &mut GeneratedConfiguration) -> GenerationResult<Vec<GeneratedConfiguration>> {
        let generator = self.generator;
        let registry = &generator.registry;
        let mut children = Vec::new();

        for construction in &generator.constructions {
            let outputs = construction.output_kinds().len();
            let signature = construction.signature();

            for arguments in generate_arguments(parent.configuration.pool(), &signature) {
                self.statistics.argument_lists += 1;

                let objects = (0..outputs)
                    .map(|k| {
                        registry.intern_id(ConfigurationObject::constructed(
                            construction.clone(),
                            arguments.clone(),
                            k,
                        ))
                    })
                    .collect::<GenerationResult<Vec<_>>>()?;

                if objects.iter().any(|&id| parent.configuration.contains(id)) {
                    self.statistics.symbolic_duplicates += 1;
                    continue;
                }
                if objects
                    .iter()
                    .any(|&id| self.cache.is_known_invalid(id, &parent.configuration))
                {
                    self.statistics.invalid_cache_hits += 1;
                    continue;
                }

                let batch = ConstructionBatch {
                    construction: construction.clone(),
                    arguments,
                    objects: objects.iter().copied().enumerate().collect(),
                };
                let (resolved, redrawn) = (
                    parent.registrar.inconsistencies_resolved(),
                    parent.registrar.reconstructions(),
                );
                let (verdict, registrar) = parent.registrar.try_extend(&batch)?;
                self.statistics.inconsistencies_resolved += parent.registrar.inconsistencies_resolved() - resolved;
                self.statistics.reconstructions += parent.registrar.reconstructions() - redrawn;

                match (verdict, registrar) {
                    (RegistrationVerdict::Ok, Some(registrar)) => {
                        let configuration = parent.configuration.extended(&objects, registry)?;
                        if !generator.canonicalizer.is_canonical(&configuration)? {
                            self.statistics.non_canonical += 1;
                            continue;
                        }
                        self.statistics.emitted += 1;
                        children.push(GeneratedConfiguration {
                            configuration,
                            registrar,
                            iteration: self.iteration,
                        });
                    }
                    (RegistrationVerdict::Unconstructible, _) => {
                        self.statistics.unconstructible += 1;
                        for &id in &objects {
                            self.cache.mark_unconstructible(id);
                        }
                    }
                    (RegistrationVerdict::Duplicate(pairs), _) => {
                        self.statistics.duplicates += 1;
                        for (newer, older) in pairs {
                            self.cache.mark_duplicate(newer, older);
                        }
                    }
                    (RegistrationVerdict::Ok, None) => {}
                }
            }
        }

        debug!(
            iteration = self.iteration,
            parent_objects = parent.configuration.len(),
            children = children.len(),
            "configuration expanded"
        );
        Ok(children)
    }
}

impl Iterator for Generation<'_> {
    type Item = GenerationResult<GeneratedConfiguration>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.yielded < self.next_frontier.len() {
                self.yielded += 1;
                return Some(Ok(self.next_frontier[self.yielded - 1].clone()));
            }

            if let Some(mut parent) = self.frontier.next() {
                match self.expand(&mut parent) {
                    Ok(children) => self.next_frontier.extend(children),
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                }
                continue;
            }

            // Frontier exhausted
            if self.iteration > 0 {
                info!(
                    iteration = self.iteration,
                    configurations = self.next_frontier.len(),
                    "frontier complete"
                );
                self.statistics.frontier_sizes.push(self.next_frontier.len());
            }
            if self.iteration >= self.generator.settings.iterations
                || (self.iteration > 0 && self.next_frontier.is_empty())
            {
                self.finished = true;
                return None;
            }

            self.iteration += 1;
            self.frontier = std::mem::take(&mut self.next_frontier).into_iter();
            self.yielded = 0;
        }
    }
}

/// Analytic coordinates of a point in the first picture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub object: String,
    pub x: f64,
    pub y: f64,
}

/// Serializable view of a generated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub iteration: usize,

    /// Serializations of all constructed objects in construction order
    pub objects: Vec<String>,
    pub newest: Vec<String>,
    pub points: Vec<PointRecord>,
}

impl ConfigurationRecord {
    pub fn new(generated: &GeneratedConfiguration, registry: &ObjectRegistry) -> GenerationResult<Self> {
        let serialize = |ids: &[ObjectId]| {
            ids.iter()
                .map(|&id| registry.serialization(id))
                .collect::<GenerationResult<Vec<_>>>()
        };

        let points = match generated.registrar.pictures().first() {
            Some(picture) => picture
                .points()
                .map(|(id, p)| {
                    Ok(PointRecord {
                        object: registry.serialization(id)?,
                        x: p.x,
                        y: p.y,
                    })
                })
                .collect::<GenerationResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            iteration: generated.iteration,
            objects: serialize(generated.configuration.constructed_objects())?,
            newest: serialize(generated.newest_objects())?,
            points,
        })
    }
}

/// Everything a generation run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub layout: LooseObjectLayout,
    pub initial_objects: Vec<String>,
    pub configurations: Vec<ConfigurationRecord>,
    pub statistics: GenerationStatistics,
}

impl GenerationOutput {
    pub fn to_json(&self) -> GenerationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> GenerationResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Number of configurations emitted by one iteration
    pub fn count_in_iteration(&self, iteration: usize) -> usize {
        self.configurations
            .iter()
            .filter(|c| c.iteration == iteration)
            .count()
    }
}
