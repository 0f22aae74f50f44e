//! Generation settings

use crate::error::{GenerationError, GenerationResult};
use serde::{Deserialize, Serialize};

/// Which canonicalizer implementation decides acceptance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalizerKind {
    /// Remaps through the object registry, memoizing remapped ids
    #[default]
    Registry,

    /// Recomputes remapped serializations without touching the registry
    Recomputing,
}

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Independent numeric realizations every batch is checked against
    pub number_of_pictures: usize,

    /// Picture reconstructions allowed per batch before giving up
    pub max_reconstruction_attempts: usize,

    /// Number of construction layers to generate
    pub iterations: usize,

    /// Seed of the registrar's random number generator
    pub seed: u64,

    pub canonicalizer: CanonicalizerKind,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            number_of_pictures: 5,
            max_reconstruction_attempts: 100,
            iterations: 2,
            seed: 0,
            canonicalizer: CanonicalizerKind::Registry,
        }
    }
}

impl GenerationSettings {
    /// Reject settings no generation can run with
    pub fn validate(&self) -> GenerationResult<()> {
        if self.number_of_pictures == 0 {
            return Err(GenerationError::Initialization(
                "number_of_pictures must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: GenerationSettings =
            serde_json::from_str(r#"{"iterations": 3, "canonicalizer": "recomputing"}"#).unwrap();

        assert_eq!(settings.iterations, 3);
        assert_eq!(settings.canonicalizer, CanonicalizerKind::Recomputing);
        assert_eq!(settings.number_of_pictures, 5);
        assert_eq!(settings.max_reconstruction_attempts, 100);
    }

    #[test]
    fn test_zero_pictures_rejected() {
        let settings = GenerationSettings {
            number_of_pictures: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert!(GenerationSettings::default().validate().is_ok());
    }
}
