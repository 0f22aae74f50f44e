//! Object interning
//!
//! The registry assigns a stable [`ObjectId`] to every symbolic object based
//! on structural equality. Loose objects are keyed by kind and layout slot;
//! constructed objects by their canonical serialization, which is computed
//! once and cached.

use super::construction::Construction;
use super::objects::{Argument, ConfigurationObject, ObjectId, ObjectKind};
use crate::error::{GenerationError, GenerationResult};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe registry of symbolic objects
///
/// Clones share the same underlying table, so a registry can be handed to
/// every component of a generation run.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    loose_ids: FxHashMap<(ObjectKind, usize), ObjectId>,
    constructed_ids: FxHashMap<String, ObjectId>,
    entries: Vec<RegistryEntry>,
}

#[derive(Debug)]
struct RegistryEntry {
    object: ConfigurationObject,
    kind: ObjectKind,
    serialization: String,
}

impl RegistryInner {
    fn entry(&self, id: ObjectId) -> GenerationResult<&RegistryEntry> {
        self.entries
            .get(id.0 as usize)
            .ok_or(GenerationError::UnknownObject(id))
    }

    fn serialize_argument(&self, argument: &Argument) -> GenerationResult<String> {
        match argument {
            Argument::Object(id) => Ok(self.entry(*id)?.serialization.clone()),
            Argument::Set(members) => {
                let mut parts = members
                    .iter()
                    .map(|m| self.serialize_argument(m))
                    .collect::<GenerationResult<Vec<_>>>()?;
                parts.sort();
                Ok(format!("{{{}}}", parts.join(",")))
            }
        }
    }

    fn serialize_constructed(
        &self,
        construction: &Construction,
        arguments: &[Argument],
        output: usize,
    ) -> GenerationResult<String> {
        let parts = arguments
            .iter()
            .map(|a| self.serialize_argument(a))
            .collect::<GenerationResult<Vec<_>>>()?;
        Ok(format_constructed(construction.name(), &parts, output))
    }

    fn validate(
        &self,
        construction: &Construction,
        arguments: &[Argument],
        output: usize,
    ) -> GenerationResult<ObjectKind> {
        let kind = construction
            .output_kinds()
            .get(output)
            .copied()
            .ok_or_else(|| GenerationError::InvalidOutput {
                construction: construction.name().to_string(),
                output,
            })?;

        let signature = construction.signature();
        let mismatch = |reason: String| GenerationError::ArgumentMismatch {
            construction: construction.name().to_string(),
            reason,
        };
        if signature.len() != arguments.len() {
            return Err(mismatch(format!(
                "expected {} arguments, got {}",
                signature.len(),
                arguments.len()
            )));
        }
        let kind_of = |id: ObjectId| self.entries.get(id.0 as usize).map(|e| e.kind);
        for (parameter, argument) in signature.iter().zip(arguments) {
            parameter.check(argument, &kind_of).map_err(mismatch)?;
        }

        Ok(kind)
    }
}

/// Join serialized arguments into a constructed object's serialization
pub(crate) fn format_constructed(name: &str, arguments: &[String], output: usize) -> String {
    if output == 0 {
        format!("{}({})", name, arguments.join(","))
    } else {
        format!("{}({})[{}]", name, arguments.join(","), output)
    }
}

impl ObjectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        // Entries are append-only, so a poisoned table is still consistent.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Intern an object, returning its id and whether it was newly added
    ///
    /// Constructed objects are validated against their construction's
    /// signature; a mismatch is a formal error.
    pub fn intern(&self, object: ConfigurationObject) -> GenerationResult<(ObjectId, bool)> {
        let mut inner = self.write();
        let next = ObjectId(inner.entries.len() as u32);

        let (kind, serialization) = match &object {
            ConfigurationObject::Loose { kind, index } => {
                if let Some(&id) = inner.loose_ids.get(&(*kind, *index)) {
                    return Ok((id, false));
                }
                inner.loose_ids.insert((*kind, *index), next);
                (*kind, next.0.to_string())
            }
            ConfigurationObject::Constructed {
                construction,
                arguments,
                output,
            } => {
                let serialization = inner.serialize_constructed(construction, arguments, *output)?;
                if let Some(&id) = inner.constructed_ids.get(&serialization) {
                    return Ok((id, false));
                }
                let kind = inner.validate(construction, arguments, *output)?;
                inner.constructed_ids.insert(serialization.clone(), next);
                (kind, serialization)
            }
        };

        inner.entries.push(RegistryEntry {
            object,
            kind,
            serialization,
        });
        Ok((next, true))
    }

    /// Intern an object and return only its id
    pub fn intern_id(&self, object: ConfigurationObject) -> GenerationResult<ObjectId> {
        self.intern(object).map(|(id, _)| id)
    }

    /// Find an already interned object without registering it
    pub fn lookup(&self, object: &ConfigurationObject) -> GenerationResult<Option<ObjectId>> {
        let inner = self.read();
        match object {
            ConfigurationObject::Loose { kind, index } => {
                Ok(inner.loose_ids.get(&(*kind, *index)).copied())
            }
            ConfigurationObject::Constructed {
                construction,
                arguments,
                output,
            } => {
                let serialization = inner.serialize_constructed(construction, arguments, *output)?;
                Ok(inner.constructed_ids.get(&serialization).copied())
            }
        }
    }

    /// Canonical serialization of an interned object
    pub fn serialization(&self, id: ObjectId) -> GenerationResult<String> {
        Ok(self.read().entry(id)?.serialization.clone())
    }

    /// Definition of an interned object
    pub fn object(&self, id: ObjectId) -> GenerationResult<ConfigurationObject> {
        Ok(self.read().entry(id)?.object.clone())
    }

    /// Kind of an interned object
    pub fn kind(&self, id: ObjectId) -> GenerationResult<ObjectKind> {
        Ok(self.read().entry(id)?.kind)
    }

    /// Number of interned objects
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
