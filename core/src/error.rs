//! Error types for configuration generation
//!
//! Only formal errors (contract violations by a collaborator) and failed
//! initialization surface here. Unconstructible or duplicate objects are
//! ordinary verdicts, see [`crate::registrar::RegistrationVerdict`].

use crate::ir::{ObjectId, ObjectKind};
use thiserror::Error;

/// Errors that can occur while building or exploring configurations
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("unknown object id: {0}")]
    UnknownObject(ObjectId),

    #[error("object {object} has kind {actual}, expected {expected}")]
    KindMismatch {
        object: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("arguments do not match the signature of {construction}: {reason}")]
    ArgumentMismatch { construction: String, reason: String },

    #[error("construction {construction} has no output with index {output}")]
    InvalidOutput { construction: String, output: usize },

    #[error("invalid composed construction {name}: {reason}")]
    InvalidComposedConstruction { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("object {0} has no realization in the picture")]
    MissingRealization(ObjectId),

    #[error("pictures stayed inconsistent after {attempts} reconstruction attempts")]
    InconsistencyLimit { attempts: usize },

    #[error("initial configuration is invalid: {0}")]
    Initialization(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;
