//! GeoGen Core
//!
//! Generation of geometric configurations: layered application of a
//! construction catalogue to loose objects, validated numerically and
//! deduplicated up to the symmetries of the loose-object layout

pub mod error;
pub mod ir;        // Symbolic representation (objects, constructions, registry, layouts, configurations)
pub mod geometry;  // Numeric geometry (analytic objects, realizers, random loose objects)
pub mod registrar; // Multi-picture validation of constructed objects
pub mod generator; // Argument enumeration, canonicalization and the generation loop
pub mod settings;
pub mod loader;    // Problem loaders (JSON)

pub use error::{GenerationError, GenerationResult};
pub use ir::*;
pub use geometry::{AnalyticObject, Circle2D, Line2D, Point2D, EPSILON};
pub use registrar::{ConstructionBatch, GeometryRegistrar, Picture, Pictures, RegistrationVerdict};
pub use generator::{
    generate_arguments, Canonicalizer, ConfigurationRecord, GeneratedConfiguration, Generation, GenerationOutput,
    GenerationStatistics, Generator, PointRecord, RecomputingCanonicalizer, RegistryCanonicalizer,
};
pub use settings::{CanonicalizerKind, GenerationSettings};
pub use loader::{GenerationProblem, LoadError, LoadResult};
