//! Vault participants.

pub mod tracker;

pub use tracker::AgentTracker;
