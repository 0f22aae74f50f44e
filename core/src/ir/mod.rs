//! Symbolic representation of configurations
//!
//! This module provides the core data structures of the generator:
//! - **objects**: Object kinds, ids, argument trees and object definitions
//! - **construction**: Construction signatures, the predefined catalogue and composed constructions
//! - **registry**: Interning of symbolic objects by structural equality
//! - **layout**: Loose-object layouts and their symmetry groups
//! - **configuration**: Configurations as ordered lists of constructed objects
//!
//! # Example
//!
//! ```rust
//! use geogen_core::ir::*;
//!
//! let registry = ObjectRegistry::new();
//! let triangle = Configuration::initial(LooseObjectLayout::Triangle, vec![], &registry).unwrap();
//! let (a, b) = (triangle.loose_objects()[0], triangle.loose_objects()[1]);
//!
//! let midpoint = registry
//!     .intern_id(ConfigurationObject::constructed(
//!         PredefinedConstruction::Midpoint.into(),
//!         vec![Argument::set(vec![Argument::Object(a), Argument::Object(b)])],
//!         0,
//!     ))
//!     .unwrap();
//!
//! let extended = triangle.extended(&[midpoint], &registry).unwrap();
//! assert_eq!(registry.serialization(midpoint).unwrap(), "Midpoint({0,1})");
//! assert_eq!(extended.newest_objects(), &[midpoint]);
//! ```

mod configuration;
mod construction;
mod layout;
mod objects;
mod registry;

// Re-export all public items for convenient access
pub use configuration::{Configuration, ObjectPool};
pub use construction::{
    signature_kinds, ComposedConstruction, Construction, ConstructionParameter, PredefinedConstruction,
    TemplateStep,
};
pub use layout::{all_permutations, LooseObjectLayout, SymmetryMapping};
pub use objects::{flatten_arguments, Argument, ConfigurationObject, ObjectId, ObjectKind};
pub use registry::ObjectRegistry;
pub(crate) use registry::format_constructed;
