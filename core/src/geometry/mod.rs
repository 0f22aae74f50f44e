//! Geometry module - Pure numeric geometry
//!
//! Analytic objects, the realizers of the predefined constructions and
//! random realization of loose objects. No symbolic reasoning here.

pub mod analytic;
pub mod constructions;
pub mod random;

pub use analytic::*;
pub use constructions::*;
pub use random::*;
