use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::config::{Validate, ensure_range};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Try the most promising candidates first.
    pub move_ordering: bool,
    /// Cache positions by zobrist fingerprint for the duration of one search.
    pub transposition_table: bool,
    pub transposition_capacity: usize,
    /// Wall-clock budget for Expert.
    pub expert_budget_ms: u64,
    /// Upper bound on the iterative deepening loop.
    pub expert_max_depth: u8,
    /// Candidates are empty cells at most this far from an existing stone.
    pub candidate_radius: usize,
    /// Branching cap applied after ordering. 0 keeps every candidate.
    pub max_candidates: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            move_ordering: true,
            transposition_table: true,
            transposition_capacity: 1 << 18,
            expert_budget_ms: 5000,
            expert_max_depth: 16,
            candidate_radius: 2,
            max_candidates: 24,
        }
    }
}

impl SearchConfig {
    pub fn expert_budget(&self) -> Duration {
        Duration::from_millis(self.expert_budget_ms)
    }
}

impl Validate for SearchConfig {
    fn validate(&self) -> Result<(), String> {
        ensure_range("expert_budget_ms", self.expert_budget_ms, 1, 60_000)?;
        ensure_range("expert_max_depth", self.expert_max_depth, 1, 64)?;
        ensure_range("candidate_radius", self.candidate_radius, 1, 4)?;
        if self.transposition_table && self.transposition_capacity == 0 {
            return Err("transposition_capacity must be positive when the table is enabled".to_string());
        }
        Ok(())
    }
}
