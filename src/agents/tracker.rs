//! Per-agent acquisitions and the win condition.
//!
//! Tracking is asymmetric. The distinguished agent (id 0) keeps its full
//! ordered acquisition list, which is the reported result. Every other agent
//! only keeps a bitmask of the mementos it holds.

use crate::catalog::types::{slot_bit, MementoSet};
use crate::core::constants::DISTINGUISHED_AGENT;

#[derive(Debug, Clone)]
pub struct AgentTracker {
    mementos: MementoSet,
    holdings: Vec<u64>,
    distinguished: Vec<usize>,
}

impl AgentTracker {
    pub fn new(agent_count: usize, mementos: MementoSet) -> Self {
        Self {
            mementos,
            holdings: vec![0; agent_count],
            distinguished: Vec::new(),
        }
    }

    /// Forgets every acquisition, keeping allocations for the next round.
    pub fn reset(&mut self, agent_count: usize, mementos: MementoSet) {
        self.mementos = mementos;
        self.holdings.clear();
        self.holdings.resize(agent_count, 0);
        self.distinguished.clear();
    }

    pub fn agent_count(&self) -> usize {
        self.holdings.len()
    }

    pub fn record(&mut self, agent: usize, slot: usize) {
        if agent == DISTINGUISHED_AGENT {
            self.distinguished.push(slot);
        }
        if self.mementos.contains(slot) {
            if let Some(held) = self.holdings.get_mut(agent) {
                *held |= slot_bit(slot);
            }
        }
    }

    pub fn has_won(&self, agent: usize) -> bool {
        self.holdings
            .get(agent)
            .is_some_and(|&held| self.mementos.satisfied_by(held))
    }

    /// Mementos held by `agent`, as a slot bitmask.
    pub fn holdings(&self, agent: usize) -> u64 {
        self.holdings.get(agent).copied().unwrap_or(0)
    }

    pub fn distinguished_acquisitions(&self) -> &[usize] {
        &self.distinguished
    }

    pub fn distinguished_turns(&self) -> u64 {
        self.distinguished.len() as u64
    }

    pub fn take_distinguished_acquisitions(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.distinguished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{CatalogTemplate, TemplateEntry};

    fn mementos() -> MementoSet {
        CatalogTemplate::new(
            "t",
            vec![
                TemplateEntry::limited("A", 10, 0.5),
                TemplateEntry::unlimited("M1", 0.3),
                TemplateEntry::unlimited("M2", 0.2),
            ],
        )
        .unwrap()
        .mementos()
    }

    #[test]
    fn test_distinguished_agent_keeps_everything_in_order() {
        let mut tracker = AgentTracker::new(3, mementos());
        tracker.record(0, 0);
        tracker.record(0, 2);
        tracker.record(0, 0);
        assert_eq!(tracker.distinguished_acquisitions(), &[0, 2, 0]);
        assert_eq!(tracker.distinguished_turns(), 3);
    }

    #[test]
    fn test_other_agents_only_track_mementos() {
        let mut tracker = AgentTracker::new(3, mementos());
        tracker.record(1, 0);
        assert_eq!(tracker.holdings(1), 0);
        tracker.record(1, 1);
        assert_eq!(tracker.holdings(1), slot_bit(1));
        assert!(tracker.distinguished_acquisitions().is_empty());
    }

    #[test]
    fn test_win_requires_every_memento() {
        let mut tracker = AgentTracker::new(3, mementos());
        tracker.record(2, 1);
        tracker.record(2, 1);
        assert!(!tracker.has_won(2));
        tracker.record(2, 2);
        assert!(tracker.has_won(2));
        assert!(!tracker.has_won(1));
    }

    #[test]
    fn test_distinguished_agent_can_win() {
        let mut tracker = AgentTracker::new(2, mementos());
        tracker.record(0, 2);
        tracker.record(0, 0);
        tracker.record(0, 1);
        assert!(tracker.has_won(0));
    }

    #[test]
    fn test_empty_memento_set_never_wins() {
        let mut tracker = AgentTracker::new(2, MementoSet::default());
        tracker.record(0, 0);
        tracker.record(1, 0);
        assert!(!tracker.has_won(0));
        assert!(!tracker.has_won(1));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut tracker = AgentTracker::new(2, mementos());
        tracker.record(0, 1);
        tracker.record(1, 2);
        tracker.reset(4, mementos());
        assert_eq!(tracker.agent_count(), 4);
        assert_eq!(tracker.holdings(1), 0);
        assert_eq!(tracker.distinguished_turns(), 0);
    }
}
