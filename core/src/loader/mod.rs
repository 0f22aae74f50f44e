//! Problem loader for generation runs
//!
//! Parses generation problems from JSON and turns them into a ready
//! [`Generator`].

pub mod json;

pub use json::{load_problem, load_problems};

use crate::error::GenerationError;
use crate::generator::Generator;
use crate::ir::{
    Argument, ComposedConstruction, Configuration, ConfigurationObject, Construction, ConstructionParameter,
    LooseObjectLayout, ObjectId, ObjectRegistry, PredefinedConstruction, TemplateStep,
};
use crate::settings::GenerationSettings;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Reference to an object of the initial configuration, or a set of them
///
/// Indices below the number of loose objects name layout slots; higher
/// indices name earlier initial objects in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentDefinition {
    Object(usize),
    Set(Vec<ArgumentDefinition>),
}

/// A constructed object of the initial configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    pub construction: String,
    pub arguments: Vec<ArgumentDefinition>,

    #[serde(default)]
    pub output: usize,
}

/// A composed construction as written in a problem file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedDefinition {
    pub name: String,
    pub signature: Vec<ConstructionParameter>,
    pub steps: Vec<TemplateStep>,
    pub outputs: Vec<usize>,
}

/// A generation problem: initial configuration, constructions and settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationProblem {
    /// Problem ID
    pub id: String,

    /// Problem description (natural language)
    #[serde(default)]
    pub description: String,

    pub layout: LooseObjectLayout,

    #[serde(default)]
    pub initial_objects: Vec<ObjectDefinition>,

    /// Names of the constructions available to generation
    pub constructions: Vec<String>,

    #[serde(default)]
    pub composed_constructions: Vec<ComposedDefinition>,

    #[serde(default)]
    pub settings: GenerationSettings,
}

impl GenerationProblem {
    /// Every construction the problem can name, predefined ones first
    fn construction_table(&self) -> LoadResult<FxHashMap<String, Construction>> {
        let mut table: FxHashMap<String, Construction> = PredefinedConstruction::ALL
            .iter()
            .map(|&c| (c.name().to_string(), Construction::from(c)))
            .collect();

        for definition in &self.composed_constructions {
            let composed = ComposedConstruction::new(
                definition.name.clone(),
                definition.signature.clone(),
                definition.steps.clone(),
                definition.outputs.clone(),
            )?;
            if table.contains_key(&definition.name) {
                return Err(LoadError::InvalidFormat(format!(
                    "construction {} is defined twice",
                    definition.name
                )));
            }
            table.insert(definition.name.clone(), Construction::Composed(Arc::new(composed)));
        }

        Ok(table)
    }

    fn lookup(table: &FxHashMap<String, Construction>, name: &str) -> LoadResult<Construction> {
        table
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::UnsupportedConstruction(name.to_string()))
    }

    /// Available constructions, resolved by name
    pub fn resolve_constructions(&self) -> LoadResult<Vec<Construction>> {
        let table = self.construction_table()?;
        self.constructions
            .iter()
            .map(|name| Self::lookup(&table, name))
            .collect()
    }

    /// Intern the initial objects and build the initial configuration
    pub fn initial_configuration(&self, registry: &ObjectRegistry) -> LoadResult<Configuration> {
        let table = self.construction_table()?;
        let base = Configuration::initial(self.layout, vec![], registry)?;
        let mut references: Vec<ObjectId> = base.loose_objects().to_vec();
        let mut constructed = Vec::with_capacity(self.initial_objects.len());

        for (i, definition) in self.initial_objects.iter().enumerate() {
            let construction = Self::lookup(&table, &definition.construction)?;
            let arguments = definition
                .arguments
                .iter()
                .map(|a| resolve_argument(a, &references))
                .collect::<LoadResult<Vec<_>>>()
                .map_err(|e| LoadError::InvalidFormat(format!("initial object {i}: {e}")))?;

            let id = registry.intern_id(ConfigurationObject::constructed(
                construction,
                arguments,
                definition.output,
            ))?;
            references.push(id);
            constructed.push(id);
        }

        Ok(Configuration::initial(self.layout, constructed, registry)?)
    }

    /// Build a generator with a fresh registry
    pub fn to_generator(&self) -> LoadResult<Generator> {
        let registry = ObjectRegistry::new();
        let initial = self.initial_configuration(&registry)?;
        let constructions = self.resolve_constructions()?;
        Ok(Generator::new(registry, initial, constructions, self.settings.clone())?)
    }
}

fn resolve_argument(definition: &ArgumentDefinition, references: &[ObjectId]) -> LoadResult<Argument> {
    match definition {
        ArgumentDefinition::Object(index) => references
            .get(*index)
            .map(|&id| Argument::Object(id))
            .ok_or_else(|| LoadError::InvalidFormat(format!("reference {index} is not defined yet"))),
        ArgumentDefinition::Set(members) => Ok(Argument::set(
            members
                .iter()
                .map(|m| resolve_argument(m, references))
                .collect::<LoadResult<Vec<_>>>()?,
        )),
    }
}

/// Problem loader result
pub type LoadResult<T> = Result<T, LoadError>;

/// Problem loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported construction: {0}")]
    UnsupportedConstruction(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
