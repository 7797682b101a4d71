//! Splitting a team's delta among its members
//!
//! Gains favour the team's weaker members and losses fall harder on its
//! stronger members: weights are `rating^-alpha` for a net-positive team and
//! `rating^alpha` for a net-negative one.

use crate::config::RatingConfig;
use crate::error::RatingError;

/// Per-member share of `team_delta`, in the order of `ratings`
pub fn member_deltas(
    ratings: &[f64],
    team_delta: f64,
    team_total: f64,
    config: &RatingConfig,
) -> Result<Vec<f64>, RatingError> {
    if ratings.is_empty() {
        return Ok(Vec::new());
    }

    if team_total <= config.weight_floor {
        let even = team_delta / ratings.len() as f64;
        return Ok(vec![even; ratings.len()]);
    }

    let exponent = if team_delta > 0.0 {
        -config.alpha
    } else {
        config.alpha
    };

    let mut weights = Vec::with_capacity(ratings.len());
    for &rating in ratings {
        let weight = rating.max(config.weight_floor).powf(exponent);
        if !weight.is_finite() {
            return Err(RatingError::NumericInstability {
                reason: format!("weight for rating {} is not finite", rating),
            });
        }
        weights.push(weight);
    }

    let normalizer: f64 = weights.iter().sum();
    if !normalizer.is_finite() || normalizer <= 0.0 {
        return Err(RatingError::NumericInstability {
            reason: format!("weight sum {} is not positive", normalizer),
        });
    }

    Ok(weights
        .into_iter()
        .map(|w| team_delta * (w / normalizer))
        .collect())
}
