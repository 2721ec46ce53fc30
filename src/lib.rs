//! Vault Sim - Monte Carlo simulation of a multi-player prize vault.
//!
//! Up to 1,500 agents take turns drawing weighted prizes from a shared
//! catalog with finite-supply slots. The first agent to collect every
//! unlimited "memento" prize closes the vault. This crate estimates how many
//! turns agent 0 takes per vault and what it walks away with.

pub mod agents;
pub mod build_info;
pub mod catalog;
pub mod core;
pub mod error;
pub mod simulator;

pub use catalog::{CatalogTemplate, ProbabilityCatalog, Quantity, TemplateEntry, VaultKind};
pub use error::{ConfigError, Result, SimError};
pub use simulator::{run_simulation, MonteCarloDriver, RoundResult, SimConfig, SimReport};
