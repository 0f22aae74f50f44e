//! Symbolic configuration objects
//!
//! This module provides type-safe identifiers for symbolic objects, the
//! recursive argument trees bound to construction parameters, and the
//! object definitions themselves. Objects reference each other by id only.

use super::construction::Construction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a geometric object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Point,
    Line,
    Circle,
}

impl ObjectKind {
    /// All kinds, in a fixed order
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Point, ObjectKind::Line, ObjectKind::Circle];

    /// Position of this kind in [`ObjectKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ObjectKind::Point => 0,
            ObjectKind::Line => 1,
            ObjectKind::Circle => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Point => "point",
            ObjectKind::Line => "line",
            ObjectKind::Circle => "circle",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Newtype wrapper for symbolic object identifiers
///
/// Ids are assigned by [`super::ObjectRegistry`] on first registration and
/// are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Argument bound to a single construction parameter
///
/// A `Set` is unordered: its members are kept sorted, so derived equality
/// and hashing ignore the order in which members were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Argument {
    Object(ObjectId),
    Set(Vec<Argument>),
}

impl Argument {
    /// Create a set argument, normalizing member order
    pub fn set(members: Vec<Argument>) -> Self {
        let mut members: Vec<Argument> = members.into_iter().map(Argument::normalize).collect();
        members.sort();
        Argument::Set(members)
    }

    /// Recursively sort set members
    pub fn normalize(self) -> Self {
        match self {
            Argument::Object(id) => Argument::Object(id),
            Argument::Set(members) => Argument::set(members),
        }
    }

    /// Visit every object in this argument, depth first
    pub fn for_each_object<F: FnMut(ObjectId)>(&self, f: &mut F) {
        match self {
            Argument::Object(id) => f(*id),
            Argument::Set(members) => {
                for member in members {
                    member.for_each_object(f);
                }
            }
        }
    }

    /// All objects in this argument, in canonical order
    pub fn objects(&self) -> Vec<ObjectId> {
        let mut objects = Vec::new();
        self.for_each_object(&mut |id| objects.push(id));
        objects
    }

    /// Rebuild the argument with every object replaced through `f`
    ///
    /// Sets are re-sorted, since the replacement can change member order.
    pub fn try_map_objects<E, F>(&self, f: &mut F) -> Result<Argument, E>
    where
        F: FnMut(ObjectId) -> Result<ObjectId, E>,
    {
        match self {
            Argument::Object(id) => Ok(Argument::Object(f(*id)?)),
            Argument::Set(members) => {
                let mapped = members
                    .iter()
                    .map(|m| m.try_map_objects(f))
                    .collect::<Result<Vec<_>, E>>()?;
                Ok(Argument::set(mapped))
            }
        }
    }
}

/// Flatten an argument list into the objects it binds, in order
pub fn flatten_arguments(arguments: &[Argument]) -> Vec<ObjectId> {
    let mut objects = Vec::new();
    for argument in arguments {
        argument.for_each_object(&mut |id| objects.push(id));
    }
    objects
}

/// A symbolic object: either loose or the output of a construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigurationObject {
    /// A free object, identified by its slot in the loose-object layout
    Loose { kind: ObjectKind, index: usize },

    /// Output `output` of applying `construction` to `arguments`
    Constructed {
        construction: Construction,
        arguments: Vec<Argument>,
        output: usize,
    },
}

impl ConfigurationObject {
    pub fn loose(kind: ObjectKind, index: usize) -> Self {
        ConfigurationObject::Loose { kind, index }
    }

    /// Constructed object with normalized arguments
    pub fn constructed(construction: Construction, arguments: Vec<Argument>, output: usize) -> Self {
        ConfigurationObject::Constructed {
            construction,
            arguments: arguments.into_iter().map(Argument::normalize).collect(),
            output,
        }
    }

    /// Kind of this object, or `None` if the output index is out of range
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            ConfigurationObject::Loose { kind, .. } => Some(*kind),
            ConfigurationObject::Constructed {
                construction,
                output,
                ..
            } => construction.output_kinds().get(*output).copied(),
        }
    }

    pub fn is_loose(&self) -> bool {
        matches!(self, ConfigurationObject::Loose { .. })
    }

    /// Objects this object is directly defined from
    pub fn dependencies(&self) -> Vec<ObjectId> {
        match self {
            ConfigurationObject::Loose { .. } => Vec::new(),
            ConfigurationObject::Constructed { arguments, .. } => flatten_arguments(arguments),
        }
    }
}
