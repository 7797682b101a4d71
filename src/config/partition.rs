//! Team partitioner configuration

use crate::error::Result;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Spreads closer than this are considered equal
    pub tie_epsilon: f64,
    /// Largest selection the league will hand to the solver
    pub max_participants: usize,
    /// Team count used when the caller does not choose one
    pub default_team_count: usize,
    /// Interior search nodes expanded before settling for the best split found
    pub max_search_nodes: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: 1e-12,
            max_participants: 25,
            default_team_count: 2,
            max_search_nodes: 500_000,
        }
    }
}

impl PartitionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tie_epsilon.is_finite() && self.tie_epsilon >= 0.0) {
            return Err(anyhow!(
                "Tie epsilon must be non-negative, got {}",
                self.tie_epsilon
            ));
        }
        if self.max_participants == 0 {
            return Err(anyhow!("Max participants must be greater than 0"));
        }
        if self.default_team_count == 0 {
            return Err(anyhow!("Default team count must be greater than 0"));
        }
        if self.max_search_nodes == 0 {
            return Err(anyhow!("Max search nodes must be greater than 0"));
        }
        Ok(())
    }
}
