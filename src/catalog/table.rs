//! Round-scoped prize table with live quantities and probabilities.
//!
//! Invariant: at the start of every draw, the probabilities of all eligible
//! slots sum to 1.0 within
//! [`PROBABILITY_TOLERANCE`](crate::core::constants::PROBABILITY_TOLERANCE). Depleting a limited
//! slot moves its share onto the remaining eligible slots proportionally.

use super::types::{CatalogTemplate, Quantity};
use crate::core::constants::DEGENERATE_MASS;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrizeSlot {
    pub remaining: Quantity,
    pub probability: f64,
}

impl PrizeSlot {
    pub fn is_eligible(&self) -> bool {
        self.remaining.is_eligible()
    }
}

/// Live slots for one round. Only draws and resets change them:
///
/// ```compile_fail
/// let template = vault_sim::catalog::ctp_vault().unwrap();
/// let mut catalog = vault_sim::ProbabilityCatalog::from_template(&template).unwrap();
/// catalog.slots_mut()[0].probability = 0.5;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProbabilityCatalog {
    slots: Vec<PrizeSlot>,
    anomalies: u64,
}

impl ProbabilityCatalog {
    pub fn from_template(template: &CatalogTemplate) -> Result<Self> {
        let mut catalog = Self::default();
        catalog.reset(template)?;
        Ok(catalog)
    }

    /// Restores every slot to the template's quantity and probability.
    /// The existing allocation is reused between rounds.
    pub fn reset(&mut self, template: &CatalogTemplate) -> Result<()> {
        template.validate()?;
        self.slots.clear();
        self.slots
            .extend(template.slots().iter().map(|entry| PrizeSlot {
                remaining: entry.quantity,
                probability: entry.probability,
            }));
        self.anomalies = 0;
        Ok(())
    }

    /// Zeroes a slot whose limited supply just ran out and rescales the
    /// remaining eligible slots by `1 / (1 - drawn_probability)`.
    ///
    /// `drawn_probability` is the slot's probability before it was zeroed.
    pub fn apply_depletion(&mut self, slot: usize, drawn_probability: f64) -> Result<()> {
        let remaining_mass = 1.0 - drawn_probability;

        if let Some(depleted) = self.slots.get_mut(slot) {
            depleted.probability = 0.0;
        }

        let others_eligible = self
            .slots
            .iter()
            .enumerate()
            .any(|(i, s)| i != slot && s.is_eligible());

        if remaining_mass <= DEGENERATE_MASS {
            if others_eligible {
                return Err(SimError::DegenerateRenormalization {
                    slot,
                    remaining_mass,
                });
            }
            return Ok(());
        }

        let correction = 1.0 / remaining_mass;
        for (i, s) in self.slots.iter_mut().enumerate() {
            if i == slot || !s.is_eligible() {
                continue;
            }
            s.probability *= correction;
            if s.probability < 0.0 {
                tracing::warn!(
                    slot = i,
                    probability = s.probability,
                    "negative probability after renormalization, clamping to zero"
                );
                s.probability = 0.0;
                self.anomalies += 1;
            }
        }

        tracing::debug!(slot, drawn_probability, correction, "slot depleted");
        Ok(())
    }

    pub fn slots(&self) -> &[PrizeSlot] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [PrizeSlot] {
        &mut self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sum of probabilities over slots that can still be drawn.
    pub fn eligible_mass(&self) -> f64 {
        self.slots
            .iter()
            .filter(|s| s.is_eligible())
            .map(|s| s.probability)
            .sum()
    }

    pub fn has_eligible(&self) -> bool {
        self.slots.iter().any(|s| s.is_eligible())
    }

    /// Probabilities clamped back to zero since the last reset.
    pub fn anomaly_count(&self) -> u64 {
        self.anomalies
    }
}
