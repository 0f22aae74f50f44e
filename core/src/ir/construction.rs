//! Constructions and their parameter signatures
//!
//! Constructions form a closed set: the predefined catalogue plus composed
//! constructions built from it. Each resolves to a realizer through
//! [`Construction::realize`].

use super::objects::{Argument, ObjectKind};
use crate::error::{GenerationError, GenerationResult};
use crate::geometry::{realize_predefined, AnalyticObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single parameter of a construction signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionParameter {
    /// One object of the given kind
    Object(ObjectKind),

    /// An unordered group of `count` arguments matching `parameter`
    Set {
        parameter: Box<ConstructionParameter>,
        count: usize,
    },
}

impl ConstructionParameter {
    /// An unordered group of `count` objects of one kind
    pub fn set_of(kind: ObjectKind, count: usize) -> Self {
        ConstructionParameter::Set {
            parameter: Box::new(ConstructionParameter::Object(kind)),
            count,
        }
    }

    /// Add the number of objects of each kind this parameter needs
    pub fn count_kinds(&self, counts: &mut [usize; 3]) {
        match self {
            ConstructionParameter::Object(kind) => counts[kind.index()] += 1,
            ConstructionParameter::Set { parameter, count } => {
                for _ in 0..*count {
                    parameter.count_kinds(counts);
                }
            }
        }
    }

    /// Kinds of the objects bound by this parameter, in flattened order
    pub fn flattened_kinds(&self, kinds: &mut Vec<ObjectKind>) {
        match self {
            ConstructionParameter::Object(kind) => kinds.push(*kind),
            ConstructionParameter::Set { parameter, count } => {
                for _ in 0..*count {
                    parameter.flattened_kinds(kinds);
                }
            }
        }
    }

    /// Check the shape of an argument against this parameter
    ///
    /// `kind_of` resolves object kinds. Returns a reason on mismatch.
    pub fn check<F>(&self, argument: &Argument, kind_of: &F) -> Result<(), String>
    where
        F: Fn(super::ObjectId) -> Option<ObjectKind>,
    {
        match (self, argument) {
            (ConstructionParameter::Object(kind), Argument::Object(id)) => match kind_of(*id) {
                Some(actual) if actual == *kind => Ok(()),
                Some(actual) => Err(format!("{id} is a {actual}, expected a {kind}")),
                None => Err(format!("{id} is not registered")),
            },
            (ConstructionParameter::Set { parameter, count }, Argument::Set(members)) => {
                if members.len() != *count {
                    return Err(format!("expected {count} set members, got {}", members.len()));
                }
                members.iter().try_for_each(|m| parameter.check(m, kind_of))
            }
            (ConstructionParameter::Object(_), Argument::Set(_)) => {
                Err("set supplied for a single-object parameter".to_string())
            }
            (ConstructionParameter::Set { .. }, Argument::Object(id)) => {
                Err(format!("single object {id} supplied for a set parameter"))
            }
        }
    }
}

impl fmt::Display for ConstructionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionParameter::Object(kind) => write!(f, "{kind}"),
            ConstructionParameter::Set { parameter, count } => write!(f, "{{{parameter} x{count}}}"),
        }
    }
}

/// Flattened object kinds of a whole signature
pub fn signature_kinds(signature: &[ConstructionParameter]) -> Vec<ObjectKind> {
    let mut kinds = Vec::new();
    for parameter in signature {
        parameter.flattened_kinds(&mut kinds);
    }
    kinds
}

/// The predefined construction catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PredefinedConstruction {
    LineFromPoints,
    Midpoint,
    PerpendicularBisector,
    Circumcircle,
    Circumcenter,
    Incenter,
    Centroid,
    IntersectionOfLines,
    PerpendicularProjection,
    PerpendicularLine,
    ParallelLine,
    ReflectionInLine,
    PointReflection,
    CenterOfCircle,
}

impl PredefinedConstruction {
    pub const ALL: [PredefinedConstruction; 14] = [
        PredefinedConstruction::LineFromPoints,
        PredefinedConstruction::Midpoint,
        PredefinedConstruction::PerpendicularBisector,
        PredefinedConstruction::Circumcircle,
        PredefinedConstruction::Circumcenter,
        PredefinedConstruction::Incenter,
        PredefinedConstruction::Centroid,
        PredefinedConstruction::IntersectionOfLines,
        PredefinedConstruction::PerpendicularProjection,
        PredefinedConstruction::PerpendicularLine,
        PredefinedConstruction::ParallelLine,
        PredefinedConstruction::ReflectionInLine,
        PredefinedConstruction::PointReflection,
        PredefinedConstruction::CenterOfCircle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PredefinedConstruction::LineFromPoints => "LineFromPoints",
            PredefinedConstruction::Midpoint => "Midpoint",
            PredefinedConstruction::PerpendicularBisector => "PerpendicularBisector",
            PredefinedConstruction::Circumcircle => "Circumcircle",
            PredefinedConstruction::Circumcenter => "Circumcenter",
            PredefinedConstruction::Incenter => "Incenter",
            PredefinedConstruction::Centroid => "Centroid",
            PredefinedConstruction::IntersectionOfLines => "IntersectionOfLines",
            PredefinedConstruction::PerpendicularProjection => "PerpendicularProjection",
            PredefinedConstruction::PerpendicularLine => "PerpendicularLine",
            PredefinedConstruction::ParallelLine => "ParallelLine",
            PredefinedConstruction::ReflectionInLine => "ReflectionInLine",
            PredefinedConstruction::PointReflection => "PointReflection",
            PredefinedConstruction::CenterOfCircle => "CenterOfCircle",
        }
    }

    /// Look up a predefined construction by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn signature(&self) -> Vec<ConstructionParameter> {
        use ConstructionParameter::Object;
        use ObjectKind::*;

        match self {
            PredefinedConstruction::LineFromPoints
            | PredefinedConstruction::Midpoint
            | PredefinedConstruction::PerpendicularBisector => {
                vec![ConstructionParameter::set_of(Point, 2)]
            }
            PredefinedConstruction::Circumcircle
            | PredefinedConstruction::Circumcenter
            | PredefinedConstruction::Incenter
            | PredefinedConstruction::Centroid => vec![ConstructionParameter::set_of(Point, 3)],
            PredefinedConstruction::IntersectionOfLines => {
                vec![ConstructionParameter::set_of(Line, 2)]
            }
            PredefinedConstruction::PerpendicularProjection
            | PredefinedConstruction::PerpendicularLine
            | PredefinedConstruction::ParallelLine
            | PredefinedConstruction::ReflectionInLine => vec![Object(Point), Object(Line)],
            PredefinedConstruction::PointReflection => vec![Object(Point), Object(Point)],
            PredefinedConstruction::CenterOfCircle => vec![Object(Circle)],
        }
    }

    pub fn output_kind(&self) -> ObjectKind {
        match self {
            PredefinedConstruction::LineFromPoints
            | PredefinedConstruction::PerpendicularBisector
            | PredefinedConstruction::PerpendicularLine
            | PredefinedConstruction::ParallelLine => ObjectKind::Line,
            PredefinedConstruction::Circumcircle => ObjectKind::Circle,
            _ => ObjectKind::Point,
        }
    }
}

/// One step of a composed construction template
///
/// `arguments` are slot indices in the template: the flattened parameters
/// first, then the output of each earlier step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateStep {
    pub construction: PredefinedConstruction,
    pub arguments: Vec<usize>,
}

/// A construction defined by a template of predefined steps
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ComposedConstruction {
    name: String,
    signature: Vec<ConstructionParameter>,
    steps: Vec<TemplateStep>,
    outputs: Vec<usize>,
}

impl ComposedConstruction {
    /// Create a composed construction, validating the template
    pub fn new(
        name: impl Into<String>,
        signature: Vec<ConstructionParameter>,
        steps: Vec<TemplateStep>,
        outputs: Vec<usize>,
    ) -> GenerationResult<Self> {
        let name = name.into();
        let invalid = |reason: String| GenerationError::InvalidComposedConstruction {
            name: name.clone(),
            reason,
        };

        if PredefinedConstruction::from_name(&name).is_some() {
            return Err(invalid("name clashes with a predefined construction".to_string()));
        }
        if outputs.is_empty() {
            return Err(invalid("no outputs".to_string()));
        }

        let mut slots = signature_kinds(&signature);
        for (i, step) in steps.iter().enumerate() {
            let expected = signature_kinds(&step.construction.signature());
            if expected.len() != step.arguments.len() {
                return Err(invalid(format!(
                    "step {i} passes {} arguments to {}, which takes {}",
                    step.arguments.len(),
                    step.construction.name(),
                    expected.len()
                )));
            }
            for (&slot, &kind) in step.arguments.iter().zip(&expected) {
                match slots.get(slot) {
                    Some(&actual) if actual == kind => {}
                    Some(&actual) => {
                        return Err(invalid(format!("step {i} slot {slot} is a {actual}, expected a {kind}")))
                    }
                    None => return Err(invalid(format!("step {i} refers to undefined slot {slot}"))),
                }
            }
            slots.push(step.construction.output_kind());
        }

        if let Some(&bad) = outputs.iter().find(|&&o| o >= slots.len()) {
            return Err(invalid(format!("output slot {bad} is undefined")));
        }

        Ok(Self {
            name,
            signature,
            steps,
            outputs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &[ConstructionParameter] {
        &self.signature
    }

    pub fn steps(&self) -> &[TemplateStep] {
        &self.steps
    }

    fn slot_kinds(&self) -> Vec<ObjectKind> {
        let mut slots = signature_kinds(&self.signature);
        slots.extend(self.steps.iter().map(|s| s.construction.output_kind()));
        slots
    }

    pub fn output_kinds(&self) -> Vec<ObjectKind> {
        let slots = self.slot_kinds();
        self.outputs.iter().map(|&o| slots[o]).collect()
    }

    /// Evaluate the template on realized inputs
    pub fn realize(&self, inputs: &[AnalyticObject]) -> Option<Vec<AnalyticObject>> {
        let mut slots: Vec<AnalyticObject> = inputs.to_vec();
        for step in &self.steps {
            let step_inputs: Vec<AnalyticObject> = step
                .arguments
                .iter()
                .map(|&slot| slots.get(slot).copied())
                .collect::<Option<_>>()?;
            slots.push(realize_predefined(step.construction, &step_inputs)?);
        }
        self.outputs.iter().map(|&o| slots.get(o).copied()).collect()
    }
}

/// A construction: predefined or composed
///
/// Identity is the construction name.
#[derive(Debug, Clone)]
pub enum Construction {
    Predefined(PredefinedConstruction),
    Composed(Arc<ComposedConstruction>),
}

impl Construction {
    /// Name used as the construction id in serializations
    pub fn name(&self) -> &str {
        match self {
            Construction::Predefined(c) => c.name(),
            Construction::Composed(c) => c.name(),
        }
    }

    pub fn signature(&self) -> Vec<ConstructionParameter> {
        match self {
            Construction::Predefined(c) => c.signature(),
            Construction::Composed(c) => c.signature().to_vec(),
        }
    }

    pub fn output_kinds(&self) -> Vec<ObjectKind> {
        match self {
            Construction::Predefined(c) => vec![c.output_kind()],
            Construction::Composed(c) => c.output_kinds(),
        }
    }

    /// Realize every output from flattened realized inputs
    ///
    /// Returns `None` if the construction is not possible for these inputs.
    pub fn realize(&self, inputs: &[AnalyticObject]) -> Option<Vec<AnalyticObject>> {
        match self {
            Construction::Predefined(c) => realize_predefined(*c, inputs).map(|o| vec![o]),
            Construction::Composed(c) => c.realize(inputs),
        }
    }
}

impl From<PredefinedConstruction> for Construction {
    fn from(construction: PredefinedConstruction) -> Self {
        Construction::Predefined(construction)
    }
}

impl PartialEq for Construction {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Construction {}

impl Hash for Construction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
