//! Exact branch-and-bound search for the minimum-spread assignment
//!
//! The solver works on a rating vector that is already sorted in descending
//! order. It seeds the incumbent with a greedy assignment, then explores
//! placements depth-first, pruning any subtree whose lower bound cannot beat
//! the incumbent. Teams with the same total and the same emptiness lead to
//! mirror-image subtrees, so only one of them is branched into.
//!
//! An optional node limit caps the search; when it is hit the incumbent is
//! returned and the solution is marked incomplete.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::utils::{min_max, spread_of};

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior nodes expanded
    pub nodes: u64,
    /// Subtrees cut by the lower bound
    pub pruned: u64,
    /// Complete assignments evaluated
    pub leaves: u64,
    /// Times a strictly better assignment replaced the incumbent
    pub improvements: u64,
}

/// Result of a search
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Team index for each rating, in input order
    pub assignment: Vec<usize>,
    pub spread: f64,
    /// Spread of the greedy starting point
    pub greedy_spread: f64,
    pub stats: SearchStats,
    /// False when the node limit stopped the search before optimality was proven
    pub complete: bool,
}

/// Branch-and-bound state for one call
pub struct Solver<'r, R: Rng + ?Sized> {
    ratings: &'r [f64],
    team_count: usize,
    /// suffix[k] = rating mass of positions k..n
    suffix: Vec<f64>,
    epsilon: f64,
    node_limit: u64,
    rng: &'r mut R,

    totals: Vec<f64>,
    counts: Vec<usize>,
    current: Vec<usize>,

    best: Vec<usize>,
    best_spread: f64,
    stats: SearchStats,
    exhausted: bool,
    /// Reused buffer for the water-fill bound
    levels: Vec<f64>,
}

impl<'r, R: Rng + ?Sized> Solver<'r, R> {
    /// `ratings` must be non-empty, sorted descending and at least `team_count` long
    pub fn new(ratings: &'r [f64], team_count: usize, epsilon: f64, rng: &'r mut R) -> Self {
        let n = ratings.len();
        let mut suffix = vec![0.0; n + 1];
        for k in (0..n).rev() {
            suffix[k] = suffix[k + 1] + ratings[k];
        }

        Self {
            ratings,
            team_count,
            suffix,
            epsilon,
            node_limit: u64::MAX,
            rng,
            totals: vec![0.0; team_count],
            counts: vec![0; team_count],
            current: vec![0; n],
            best: Vec::new(),
            best_spread: f64::INFINITY,
            stats: SearchStats::default(),
            exhausted: false,
            levels: Vec::with_capacity(team_count),
        }
    }

    /// Stop expanding after `limit` interior nodes
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn solve(mut self) -> Solution {
        let (greedy, greedy_spread) = self.greedy();
        self.best = greedy;
        self.best_spread = greedy_spread;

        self.search(0);

        Solution {
            assignment: self.best,
            spread: self.best_spread,
            greedy_spread,
            stats: self.stats,
            complete: !self.exhausted,
        }
    }

    /// Place each rating where the resulting spread is smallest, breaking ties at random
    fn greedy(&mut self) -> (Vec<usize>, f64) {
        let ratings = self.ratings;
        let n = ratings.len();
        let mut totals = vec![0.0; self.team_count];
        let mut counts = vec![0usize; self.team_count];
        let mut assignment = Vec::with_capacity(n);

        for (k, &rating) in ratings.iter().enumerate() {
            let empty = counts.iter().filter(|&&c| c == 0).count();
            let only_empty = empty > 0 && n - k == empty;

            let mut best_team = None;
            let mut best_cost = f64::INFINITY;
            for team in 0..self.team_count {
                if only_empty && counts[team] != 0 {
                    continue;
                }

                let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
                for (j, &total) in totals.iter().enumerate() {
                    let value = if j == team { total + rating } else { total };
                    lo = lo.min(value);
                    hi = hi.max(value);
                }
                let cost = hi - lo;

                if best_team.is_none() || cost < best_cost {
                    best_cost = cost;
                    best_team = Some(team);
                } else if cost == best_cost && self.rng.gen_bool(0.5) {
                    best_team = Some(team);
                }
            }

            // At least one candidate always exists: every team, or every empty team
            let team = best_team.unwrap_or(0);
            totals[team] += rating;
            counts[team] += 1;
            assignment.push(team);
        }

        (assignment, spread_of(&totals))
    }

    /// Smallest spread any completion of the first `k` placements can reach
    ///
    /// Totals only grow, so the final maximum is at least the current one.
    /// The final minimum is at most the level reached by pouring the unplaced
    /// mass into the lowest teams as if it were divisible. That level never
    /// exceeds the mean or the current minimum plus everything unplaced.
    fn lower_bound(&mut self, k: usize) -> f64 {
        let (_, max) = min_max(&self.totals);
        let level = self.water_level(self.suffix[k]);
        (max - level).max(0.0)
    }

    fn water_level(&mut self, mut remaining: f64) -> f64 {
        self.levels.clear();
        self.levels.extend_from_slice(&self.totals);
        self.levels.sort_by(f64::total_cmp);

        let mut level = self.levels[0];
        for i in 0..self.levels.len() {
            let width = (i + 1) as f64;
            let next = self.levels.get(i + 1).copied().unwrap_or(f64::INFINITY);
            let room = (next - level) * width;
            if remaining <= room {
                return level + remaining / width;
            }
            remaining -= room;
            level = next;
        }
        level
    }

    fn empty_teams(&self) -> Vec<usize> {
        (0..self.team_count)
            .filter(|&t| self.counts[t] == 0)
            .collect()
    }

    /// Candidate teams for position `k`
    fn branch_order(&mut self, k: usize) -> Vec<usize> {
        let empty = self.empty_teams();
        let left = self.ratings.len() - k;

        // Every remaining rating must open an empty team; empty teams are interchangeable
        if !empty.is_empty() && left == empty.len() {
            return empty.choose(&mut *self.rng).copied().into_iter().collect();
        }

        let totals = &self.totals;
        let counts = &self.counts;
        let mut order: Vec<usize> = (0..self.team_count).collect();
        order.sort_by(|&a, &b| totals[a].total_cmp(&totals[b]).then(counts[a].cmp(&counts[b])));
        order.dedup_by(|later, kept| {
            totals[*later] == totals[*kept] && (counts[*later] == 0) == (counts[*kept] == 0)
        });
        order
    }

    fn search(&mut self, k: usize) {
        if k == self.ratings.len() {
            self.evaluate_leaf();
            return;
        }

        if self.exhausted {
            return;
        }
        if self.lower_bound(k) >= self.best_spread - self.epsilon {
            self.stats.pruned += 1;
            return;
        }
        if self.stats.nodes >= self.node_limit {
            self.exhausted = true;
            return;
        }
        self.stats.nodes += 1;

        let rating = self.ratings[k];
        for team in self.branch_order(k) {
            // Restore the saved total so backtracking does not accumulate rounding
            let before = self.totals[team];
            self.totals[team] += rating;
            self.counts[team] += 1;
            self.current[k] = team;

            self.search(k + 1);

            self.counts[team] -= 1;
            self.totals[team] = before;
        }
    }

    fn evaluate_leaf(&mut self) {
        self.stats.leaves += 1;
        if self.counts.iter().any(|&c| c == 0) {
            return;
        }

        let spread = spread_of(&self.totals);
        if spread < self.best_spread - self.epsilon {
            self.best_spread = spread;
            self.best.clone_from(&self.current);
            self.stats.improvements += 1;
        } else if (spread - self.best_spread).abs() <= self.epsilon && self.rng.gen_bool(0.5) {
            self.best.clone_from(&self.current);
        }
    }
}
