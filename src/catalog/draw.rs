//! Weighted draws against a live catalog.

use super::table::{PrizeSlot, ProbabilityCatalog};
use crate::error::{Result, SimError};

/// Cumulative-distribution inversion over slots in catalog order.
///
/// The first slot with `roll < running_sum + probability` wins, so a roll
/// landing exactly on a boundary goes to the next slot. If rounding leaves
/// the roll above the total mass, the last slot with positive probability
/// is chosen. Returns `None` only when no slot has positive probability.
pub fn select_slot(slots: &[PrizeSlot], roll: f64) -> Option<usize> {
    let mut running_sum = 0.0;
    for (i, slot) in slots.iter().enumerate() {
        if roll < running_sum + slot.probability {
            return Some(i);
        }
        running_sum += slot.probability;
    }
    slots.iter().rposition(|s| s.probability > 0.0)
}

/// Draws one prize, takes one unit of its supply, and renormalizes the
/// catalog if that emptied a limited slot.
///
/// `Ok(None)` means nothing is left to draw.
pub fn draw_slot(catalog: &mut ProbabilityCatalog, roll: f64) -> Result<Option<usize>> {
    if !(0.0..1.0).contains(&roll) {
        return Err(SimError::RandomSource(format!(
            "roll {roll} outside [0, 1)"
        )));
    }

    let Some(index) = select_slot(catalog.slots(), roll) else {
        return Ok(None);
    };

    let slot = &mut catalog.slots_mut()[index];
    let drawn_probability = slot.probability;
    if slot.remaining.take_one() {
        catalog.apply_depletion(index, drawn_probability)?;
    }

    Ok(Some(index))
}
