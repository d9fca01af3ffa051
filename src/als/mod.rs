//! Alternating least squares over implicit play-time feedback.
//!
//! This module factorizes the sparse user-by-game play-time matrix into
//! low-rank user and item factors. Each pass solves every user's ridge
//! normal equations against the fixed item factors, then every item's
//! against the fixed user factors, in parallel across entities.

pub mod model;
pub mod solver;
pub mod trainer;

pub use model::*;
pub use solver::*;
pub use trainer::*;

use serde::{Deserialize, Serialize};

use crate::error::{GamerecError, Result};

/// Configuration for ALS training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlsConfig {
    /// Number of latent factors (the rank of the factorization).
    pub factors: usize,
    /// Number of alternating passes over the observation set.
    pub iterations: usize,
    /// Ridge regularization added to every per-entity solve.
    pub regularization: f32,
    /// Confidence scaling for implicit feedback.
    ///
    /// When set, an observation with weight `w` is treated as a unit
    /// preference held with confidence `1 + alpha * w`. When unset, the raw
    /// weight itself is the regression target with unit confidence.
    pub implicit_alpha: Option<f32>,
    /// Seed for factor initialization. Fixing it makes runs reproducible.
    pub seed: Option<u64>,
}

impl Default for AlsConfig {
    fn default() -> Self {
        Self {
            factors: 10,
            iterations: 10,
            regularization: 0.1,
            implicit_alpha: None,
            seed: None,
        }
    }
}

impl AlsConfig {
    /// Validates the configuration before any training work starts.
    pub fn validate(&self) -> Result<()> {
        if self.factors == 0 {
            return Err(GamerecError::invalid_config("factors must be positive"));
        }
        if self.iterations == 0 {
            return Err(GamerecError::invalid_config("iterations must be positive"));
        }
        if !(self.regularization >= 0.0) || !self.regularization.is_finite() {
            return Err(GamerecError::invalid_config(
                "regularization must be a non-negative finite number",
            ));
        }
        if let Some(alpha) = self.implicit_alpha
            && (!(alpha >= 0.0) || !alpha.is_finite())
        {
            return Err(GamerecError::invalid_config(
                "implicit_alpha must be a non-negative finite number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_als_config_default() {
        let config = AlsConfig::default();
        assert_eq!(config.factors, 10);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.regularization, 0.1);
        assert_eq!(config.implicit_alpha, None);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_als_config_rejects_zero_rank() {
        let config = AlsConfig {
            factors: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GamerecError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_als_config_rejects_zero_iterations() {
        let config = AlsConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_als_config_rejects_negative_regularization() {
        let config = AlsConfig {
            regularization: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AlsConfig {
            regularization: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_als_config_rejects_negative_alpha() {
        let config = AlsConfig {
            implicit_alpha: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AlsConfig {
            implicit_alpha: Some(40.0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
