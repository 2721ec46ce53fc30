//! Injectable randomness for draws and turn order.
//!
//! Any `rand::RngCore` works as a source. Entropy failures surface as
//! [`SimError::RandomSource`] instead of panicking. [`ScriptedSource`]
//! replays a fixed roll sequence for deterministic tests.

use crate::error::{Result, SimError};
use rand::RngCore;

pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> Result<f64>;

    /// Uniform index in `0..bound`. `bound` must be positive.
    fn next_index(&mut self, bound: usize) -> Result<usize> {
        let index = (self.next_unit()? * bound as f64) as usize;
        Ok(index.min(bound.saturating_sub(1)))
    }

    /// Fisher-Yates shuffle in place.
    fn shuffle(&mut self, items: &mut [usize]) -> Result<()> {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1)?;
            items.swap(i, j);
        }
        Ok(())
    }
}

fn try_next_u64<R: RngCore + ?Sized>(rng: &mut R) -> Result<u64> {
    let mut bytes = [0u8; 8];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

// Built on `try_fill_bytes` rather than `gen`/`gen_range`, which panic
// when the generator fails.
impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> Result<f64> {
        // 53 random mantissa bits
        let bits = try_next_u64(self)? >> 11;
        Ok(bits as f64 * (1.0 / (1u64 << 53) as f64))
    }

    fn next_index(&mut self, bound: usize) -> Result<usize> {
        let range = bound.max(1) as u64;
        let zone = u64::MAX - (u64::MAX - range + 1) % range;
        loop {
            let v = try_next_u64(self)?;
            if v <= zone {
                return Ok((v % range) as usize);
            }
        }
    }
}

/// Replays a fixed list of rolls.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    rolls: Vec<f64>,
    cursor: usize,
    cycle: bool,
}

impl ScriptedSource {
    /// Fails with a random source error once the rolls run out.
    pub fn new(rolls: Vec<f64>) -> Self {
        Self {
            rolls,
            cursor: 0,
            cycle: false,
        }
    }

    /// Starts over from the first roll after the last one.
    pub fn cycling(rolls: Vec<f64>) -> Self {
        Self {
            rolls,
            cursor: 0,
            cycle: true,
        }
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> Result<f64> {
        if self.rolls.is_empty() {
            return Err(SimError::RandomSource("no scripted rolls".to_string()));
        }
        let index = if self.cycle {
            self.cursor % self.rolls.len()
        } else {
            self.cursor
        };
        let roll = self.rolls.get(index).copied().ok_or_else(|| {
            SimError::RandomSource(format!("scripted rolls exhausted after {}", self.cursor))
        })?;
        self.cursor += 1;
        Ok(roll)
    }
}
