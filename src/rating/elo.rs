//! Pairwise Elo between teams
//!
//! Every unordered pair of teams plays a virtual Elo game. A team's net
//! delta is the sum over its pairs, so the deltas of one match always cancel.

use crate::config::RatingConfig;
use std::collections::BTreeSet;

/// Logistic expected score of a side rated `rating` against `opponent`
pub fn expected_score(rating: f64, opponent: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / scale))
}

/// Actual scores of a pair: a lone winner takes 1, otherwise both draw
pub fn pair_scores(first_won: bool, second_won: bool) -> (f64, f64) {
    match (first_won, second_won) {
        (true, false) => (1.0, 0.0),
        (false, true) => (0.0, 1.0),
        _ => (0.5, 0.5),
    }
}

/// Net delta for each team given team strengths and the winning indices
pub fn team_deltas(strengths: &[f64], winners: &BTreeSet<usize>, config: &RatingConfig) -> Vec<f64> {
    let n = strengths.len();
    let mut deltas = vec![0.0; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let expected_i = expected_score(strengths[i], strengths[j], config.elo_scale);
            let expected_j = 1.0 - expected_i;
            let (actual_i, actual_j) = pair_scores(winners.contains(&i), winners.contains(&j));

            deltas[i] += config.k_factor * (actual_i - expected_i);
            deltas[j] += config.k_factor * (actual_j - expected_j);
        }
    }

    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_curve() {
        assert_eq!(expected_score(1000.0, 1000.0, 400.0), 0.5);
        let favourite = expected_score(1400.0, 1000.0, 400.0);
        assert!((favourite - 10.0 / 11.0).abs() < 1e-12);
        assert!((favourite + expected_score(1000.0, 1400.0, 400.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_match_single_winner() {
        let deltas = team_deltas(&[1000.0, 1000.0], &BTreeSet::from([0]), &RatingConfig::default());
        assert_eq!(deltas, vec![2.0, -2.0]);
    }

    #[test]
    fn test_deltas_cancel_out() {
        let config = RatingConfig::default();
        let strengths = [2300.0, 1850.0, 2075.5, 990.0];
        for winners in [
            BTreeSet::new(),
            BTreeSet::from([2]),
            BTreeSet::from([0, 3]),
            BTreeSet::from([0, 1, 2, 3]),
        ] {
            let sum: f64 = team_deltas(&strengths, &winners, &config).iter().sum();
            assert!(sum.abs() < 1e-9, "winners {:?} sum {}", winners, sum);
        }
    }

    #[test]
    fn test_full_tie_is_nearly_neutral() {
        let config = RatingConfig::default();
        let deltas = team_deltas(&[2000.0, 2000.0, 2000.0], &BTreeSet::from([0, 1, 2]), &config);
        assert!(deltas.iter().all(|d| d.abs() < 1e-12));

        // Unequal teams drift by less than half the rate constant per pair
        let deltas = team_deltas(&[2100.0, 1900.0], &BTreeSet::from([0, 1]), &config);
        assert!(deltas[0] < 0.0 && deltas[0].abs() < config.k_factor / 2.0);
    }

    #[test]
    fn test_upset_pays_more() {
        let config = RatingConfig::default();
        let expected_win = team_deltas(&[1400.0, 1000.0], &BTreeSet::from([0]), &config);
        let upset = team_deltas(&[1400.0, 1000.0], &BTreeSet::from([1]), &config);
        assert!(upset[1] > expected_win[0]);
    }
}
