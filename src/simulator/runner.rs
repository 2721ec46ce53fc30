//! Monte Carlo driver: many independent vault rounds.
//!
//! Rounds share nothing but the immutable template, so `run_simulation`
//! spreads them over a rayon pool. Round `i` always gets its own generator
//! seeded from `master_seed + i`, which makes sequential and parallel runs
//! with the same master seed produce identical results.

use super::config::SimConfig;
use super::random::RandomSource;
use super::report::{RoundTally, SimReport};
use super::round::{validate_race, RoundResult, RoundSimulator};
use crate::catalog::types::CatalogTemplate;
use crate::error::{Result, SimError};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Runs rounds one after another against a single random source.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloDriver<'a> {
    template: &'a CatalogTemplate,
    agent_count: usize,
    turn_cap: u64,
}

impl<'a> MonteCarloDriver<'a> {
    pub fn new(template: &'a CatalogTemplate, agent_count: usize, turn_cap: u64) -> Result<Self> {
        validate_race(agent_count, turn_cap)?;
        template.validate()?;
        Ok(Self {
            template,
            agent_count,
            turn_cap,
        })
    }

    /// Lazy sequence of `round_count` results. Stops after the first error.
    ///
    /// Reproducibility is up to the caller: pass a freshly seeded source to
    /// replay the same sequence.
    pub fn rounds<S: RandomSource>(&self, round_count: u64, source: S) -> Rounds<'a, S> {
        Rounds {
            simulator: RoundSimulator::with_validated(self.template, self.agent_count, self.turn_cap),
            source,
            next_index: 0,
            round_count,
            failed: false,
        }
    }
}

pub struct Rounds<'a, S> {
    simulator: RoundSimulator<'a>,
    source: S,
    next_index: u64,
    round_count: u64,
    failed: bool,
}

impl<S: RandomSource> Iterator for Rounds<'_, S> {
    type Item = Result<RoundResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_index >= self.round_count {
            return None;
        }
        let result = self.simulator.play(self.next_index, &mut self.source);
        self.failed = result.is_err();
        self.next_index += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let left = usize::try_from(self.round_count - self.next_index).unwrap_or(usize::MAX);
        (0, Some(left))
    }
}

/// Generator for one round of a seeded batch.
pub fn round_rng(master_seed: u64, round_index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(master_seed.wrapping_add(round_index))
}

fn entropy_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, template: &CatalogTemplate) -> Result<SimReport> {
    config.validate()?;
    template.validate()?;

    let master_seed = match config.seed {
        Some(seed) => seed,
        None => entropy_seed()?,
    };

    tracing::info!(
        vault = template.name(),
        rounds = config.num_rounds,
        agents = config.agent_count,
        turn_cap = config.turn_cap,
        workers = config.workers,
        master_seed,
        "starting simulation"
    );

    let tally = if config.is_sequential() {
        run_sequential(config, template, master_seed)?
    } else {
        run_parallel(config, template, master_seed)?
    };

    let report = SimReport::from_tally(tally, config, template, master_seed);

    tracing::info!(
        rounds_won = report.rounds_won,
        rounds_exhausted = report.rounds_exhausted,
        avg_turns = report.avg_turns,
        "simulation finished"
    );

    Ok(report)
}

fn run_sequential(
    config: &SimConfig,
    template: &CatalogTemplate,
    master_seed: u64,
) -> Result<RoundTally> {
    let mut simulator = RoundSimulator::with_validated(template, config.agent_count, config.turn_cap);
    let mut tally = RoundTally::new(template.len(), config.keep_rows);
    for i in 0..config.num_rounds {
        let round_index = u64::from(i);
        let mut rng = round_rng(master_seed, round_index);
        tally.add(simulator.play(round_index, &mut rng)?);
    }
    Ok(tally)
}

fn run_parallel(
    config: &SimConfig,
    template: &CatalogTemplate,
    master_seed: u64,
) -> Result<RoundTally> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    let empty = || RoundTally::new(template.len(), config.keep_rows);

    pool.install(|| {
        (0..config.num_rounds)
            .into_par_iter()
            .map_init(
                || RoundSimulator::with_validated(template, config.agent_count, config.turn_cap),
                |simulator, i| {
                    let round_index = u64::from(i);
                    let mut rng = round_rng(master_seed, round_index);
                    simulator.play(round_index, &mut rng)
                },
            )
            .try_fold(empty, |mut tally, round| {
                tally.add(round?);
                Ok::<_, SimError>(tally)
            })
            .try_reduce(empty, |a, b| Ok(a.merge(b)))
    })
}
