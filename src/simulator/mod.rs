//! Vault simulator for Monte Carlo analysis.
//!
//! Runs thousands of independent vault rounds to estimate:
//! - How many turns the distinguished agent takes before the vault closes
//! - How often anyone (or the distinguished agent) collects every memento
//! - Which prizes the distinguished agent ends up with

mod config;
pub mod random;
mod report;
mod round;
mod runner;

pub use config::SimConfig;
pub use random::{RandomSource, ScriptedSource};
pub use report::SimReport;
pub use round::{RoundResult, RoundSimulator, RoundState};
pub use runner::{round_rng, run_simulation, MonteCarloDriver, Rounds};
