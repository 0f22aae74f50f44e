//! Generator module - Layered configuration generation
//!
//! Argument enumeration, canonicalization, the known-invalid cache and the
//! generation loop composing them with the geometry registrar.

pub mod arguments;
pub mod cache;
pub mod canonical;
pub mod engine;

pub use arguments::generate_arguments;
pub use cache::InvalidObjectCache;
pub use canonical::{Canonicalizer, RecomputingCanonicalizer, RegistryCanonicalizer};
pub use engine::{
    ConfigurationRecord, GeneratedConfiguration, Generation, GenerationOutput, GenerationStatistics, Generator,
    PointRecord,
};
