//! One vault race from a fresh catalog to a winner or the turn cap.
//!
//! Every turn the whole agent list is reshuffled, then each agent draws once
//! in that order against the shared catalog. Draws are applied one at a time
//! so every depletion is visible to the next agent. The first agent in
//! shuffle order to complete the memento set ends the round on the spot.

use super::random::RandomSource;
use crate::agents::AgentTracker;
use crate::catalog::draw::draw_slot;
use crate::catalog::table::ProbabilityCatalog;
use crate::catalog::types::CatalogTemplate;
use crate::core::constants::{DISTINGUISHED_AGENT, NO_WINNER_SENTINEL};
use crate::error::{ConfigError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Running,
    /// `turns` is the distinguished agent's acquisition count at the win.
    Won { agent: usize, turns: u64 },
    Exhausted,
}

/// What the distinguished agent experienced in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub round_index: u64,
    /// `None` when nobody won before the turn cap.
    pub winner: Option<usize>,
    pub distinguished_turns: u64,
    /// Slot indices acquired by agent 0, in draw order.
    pub acquisitions: Vec<usize>,
    pub turns_elapsed: u64,
    pub numeric_anomalies: u64,
}

impl RoundResult {
    pub fn is_won(&self) -> bool {
        self.winner.is_some()
    }

    pub fn distinguished_won(&self) -> bool {
        self.winner == Some(DISTINGUISHED_AGENT)
    }

    /// Winner id, or -1 for an exhausted round.
    pub fn winner_id(&self) -> i64 {
        self.winner.map_or(NO_WINNER_SENTINEL, |w| w as i64)
    }

    /// `winner,turns,"slot,slot,..."`
    pub fn to_row(&self) -> String {
        let slots: Vec<String> = self.acquisitions.iter().map(|s| s.to_string()).collect();
        format!(
            "{},{},\"{}\"",
            self.winner_id(),
            self.distinguished_turns,
            slots.join(",")
        )
    }

    /// How many times agent 0 acquired each slot.
    pub fn slot_counts(&self, slot_count: usize) -> Vec<u64> {
        let mut counts = vec![0u64; slot_count];
        for &slot in &self.acquisitions {
            if let Some(c) = counts.get_mut(slot) {
                *c += 1;
            }
        }
        counts
    }
}

pub(crate) fn validate_race(agent_count: usize, turn_cap: u64) -> Result<()> {
    if agent_count == 0 {
        return Err(ConfigError::InvalidAgentCount.into());
    }
    if turn_cap == 0 {
        return Err(ConfigError::InvalidTurnCap.into());
    }
    Ok(())
}

/// Reusable round runner. Catalog, tracker and turn order are reset at the
/// start of every round; nothing carries over between rounds.
#[derive(Debug, Clone)]
pub struct RoundSimulator<'a> {
    template: &'a CatalogTemplate,
    agent_count: usize,
    turn_cap: u64,
    catalog: ProbabilityCatalog,
    tracker: AgentTracker,
    order: Vec<usize>,
}

impl<'a> RoundSimulator<'a> {
    pub fn new(template: &'a CatalogTemplate, agent_count: usize, turn_cap: u64) -> Result<Self> {
        validate_race(agent_count, turn_cap)?;
        template.validate()?;
        Ok(Self::with_validated(template, agent_count, turn_cap))
    }

    pub(crate) fn with_validated(
        template: &'a CatalogTemplate,
        agent_count: usize,
        turn_cap: u64,
    ) -> Self {
        Self {
            template,
            agent_count,
            turn_cap,
            catalog: ProbabilityCatalog::default(),
            tracker: AgentTracker::new(agent_count, template.mementos()),
            order: Vec::with_capacity(agent_count),
        }
    }

    pub fn play<S: RandomSource + ?Sized>(
        &mut self,
        round_index: u64,
        source: &mut S,
    ) -> Result<RoundResult> {
        self.catalog.reset(self.template)?;
        self.tracker
            .reset(self.agent_count, self.template.mementos());
        self.order.clear();
        self.order.extend(0..self.agent_count);

        let mut state = RoundState::Running;
        let mut turns_elapsed = 0u64;

        while state == RoundState::Running {
            if turns_elapsed >= self.turn_cap {
                state = RoundState::Exhausted;
                continue;
            }
            turns_elapsed += 1;
            state = self.play_turn(source)?;
        }

        let (winner, distinguished_turns) = match state {
            RoundState::Won { agent, turns } => (Some(agent), turns),
            _ => (None, self.tracker.distinguished_turns()),
        };

        tracing::debug!(
            round_index,
            ?winner,
            distinguished_turns,
            turns_elapsed,
            "round finished"
        );

        Ok(RoundResult {
            round_index,
            winner,
            distinguished_turns,
            acquisitions: self.tracker.take_distinguished_acquisitions(),
            turns_elapsed,
            numeric_anomalies: self.catalog.anomaly_count(),
        })
    }

    fn play_turn<S: RandomSource + ?Sized>(&mut self, source: &mut S) -> Result<RoundState> {
        let Self {
            catalog,
            tracker,
            order,
            ..
        } = self;

        source.shuffle(order)?;

        for &agent in order.iter() {
            let roll = source.next_unit()?;
            let Some(slot) = draw_slot(catalog, roll)? else {
                // Every limited prize is gone and there are no mementos
                return Ok(RoundState::Exhausted);
            };

            tracker.record(agent, slot);
            if tracker.has_won(agent) {
                return Ok(RoundState::Won {
                    agent,
                    turns: tracker.distinguished_turns(),
                });
            }
        }

        Ok(RoundState::Running)
    }
}
