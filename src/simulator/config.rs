//! Simulation configuration.

use crate::core::constants::{
    DEFAULT_AGENT_COUNT, DEFAULT_ENTRY_COST, DEFAULT_ROUND_COUNT, DEFAULT_TURN_CAP,
};
use crate::error::{ConfigError, Result};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of independent vault rounds
    pub num_rounds: u32,

    /// Master seed; round `i` is seeded with `seed + i` (None = OS entropy)
    pub seed: Option<u64>,

    /// Participants per vault, including the distinguished agent
    pub agent_count: usize,

    /// Turns before a vault closes without a winner
    pub turn_cap: u64,

    /// Worker threads (0 = one per core, 1 = run on the calling thread)
    pub workers: usize,

    /// Gold spent per turn, used only for reporting
    pub entry_cost: u64,

    /// Keep every round's acquisition list for row output. Off by default;
    /// the aggregate report does not need them.
    pub keep_rows: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_rounds: DEFAULT_ROUND_COUNT,
            seed: None,
            agent_count: DEFAULT_AGENT_COUNT,
            turn_cap: DEFAULT_TURN_CAP,
            workers: 0,
            entry_cost: DEFAULT_ENTRY_COST,
            keep_rows: false,
        }
    }
}

impl SimConfig {
    /// Small vault for tests and what-if runs
    pub fn small_vault(agent_count: usize, num_rounds: u32, seed: u64) -> Self {
        Self {
            num_rounds,
            seed: Some(seed),
            agent_count,
            workers: 1,
            ..Default::default()
        }
    }

    pub fn is_sequential(&self) -> bool {
        self.workers == 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.agent_count == 0 {
            return Err(ConfigError::InvalidAgentCount.into());
        }
        if self.turn_cap == 0 {
            return Err(ConfigError::InvalidTurnCap.into());
        }
        if self.num_rounds == 0 {
            return Err(ConfigError::InvalidRoundCount.into());
        }
        Ok(())
    }
}
