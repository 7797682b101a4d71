//! Rating engine configuration

use crate::error::Result;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Tunable constants of the pairwise Elo update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rate constant applied to every pairwise score difference
    pub k_factor: f64,
    /// Exponent of the intra-team weighting
    pub alpha: f64,
    /// Rating difference that shifts the expected score tenfold
    pub elo_scale: f64,
    /// Ratings below this are treated as this when weighting
    pub weight_floor: f64,
    /// Ratings never drop below this
    pub min_rating: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: 4.0,
            alpha: 0.6,
            elo_scale: 400.0,
            weight_floor: 1e-6,
            min_rating: 0.0,
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.k_factor.is_finite() && self.k_factor > 0.0) {
            return Err(anyhow!("K factor must be positive, got {}", self.k_factor));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(anyhow!("Alpha must be non-negative, got {}", self.alpha));
        }
        if !(self.elo_scale.is_finite() && self.elo_scale > 0.0) {
            return Err(anyhow!("Elo scale must be positive, got {}", self.elo_scale));
        }
        if !(self.weight_floor.is_finite() && self.weight_floor > 0.0) {
            return Err(anyhow!(
                "Weight floor must be positive, got {}",
                self.weight_floor
            ));
        }
        if !(self.min_rating.is_finite() && self.min_rating >= 0.0) {
            return Err(anyhow!(
                "Minimum rating must be non-negative, got {}",
                self.min_rating
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RatingConfig::default();
        assert_eq!(config.k_factor, 4.0);
        assert_eq!(config.alpha, 0.6);
        assert_eq!(config.elo_scale, 400.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = RatingConfig::default();
        config.k_factor = 0.0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.elo_scale = f64::NAN;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.min_rating = -1.0;
        assert!(config.validate().is_err());
    }
}
