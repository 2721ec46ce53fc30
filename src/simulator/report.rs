//! Simulation report generation.

use super::config::SimConfig;
use super::round::RoundResult;
use crate::catalog::types::CatalogTemplate;
use serde::Serialize;
use std::io::{self, Write};

/// Aggregated results from many vault rounds.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub vault_name: String,
    pub slot_labels: Vec<String>,
    pub memento_slots: Vec<usize>,
    pub num_rounds: u32,
    pub agent_count: usize,
    pub turn_cap: u64,
    pub master_seed: u64,
    pub entry_cost: u64,

    // Outcomes
    pub rounds_won: u32,
    pub rounds_exhausted: u32,
    pub distinguished_wins: u32,

    // Distinguished agent turns per round
    pub avg_turns: f64,
    pub min_turns: u64,
    pub median_turns: u64,
    pub p90_turns: u64,
    pub max_turns: u64,
    pub avg_spend: f64,
    pub avg_turns_elapsed: f64,

    // Per-slot acquisitions by the distinguished agent
    pub avg_slot_counts: Vec<f64>,
    pub slot_hit_rate: Vec<f64>,

    pub numeric_anomalies: u64,

    // Individual rounds for row output; empty unless `keep_rows` was set
    #[serde(skip)]
    pub rounds: Vec<RoundResult>,
}

/// Running totals over finished rounds.
///
/// Folds one round at a time so a batch never holds every acquisition list.
/// Tallies from different workers merge in any order; the report built from
/// them does not depend on it.
#[derive(Debug, Clone)]
pub(crate) struct RoundTally {
    num_rounds: u32,
    rounds_won: u32,
    distinguished_wins: u32,
    turns: Vec<u64>,
    turns_elapsed_total: u64,
    slot_totals: Vec<u64>,
    slot_rounds: Vec<u32>,
    numeric_anomalies: u64,
    rows: Option<Vec<RoundResult>>,
}

impl RoundTally {
    pub(crate) fn new(slot_count: usize, keep_rows: bool) -> Self {
        Self {
            num_rounds: 0,
            rounds_won: 0,
            distinguished_wins: 0,
            turns: Vec::new(),
            turns_elapsed_total: 0,
            slot_totals: vec![0; slot_count],
            slot_rounds: vec![0; slot_count],
            numeric_anomalies: 0,
            rows: keep_rows.then(Vec::new),
        }
    }

    pub(crate) fn add(&mut self, round: RoundResult) {
        self.num_rounds += 1;
        if round.is_won() {
            self.rounds_won += 1;
        }
        if round.distinguished_won() {
            self.distinguished_wins += 1;
        }
        self.turns.push(round.distinguished_turns);
        self.turns_elapsed_total += round.turns_elapsed;
        self.numeric_anomalies += round.numeric_anomalies;

        let counts = round.slot_counts(self.slot_totals.len());
        for (slot, count) in counts.into_iter().enumerate() {
            self.slot_totals[slot] += count;
            if count > 0 {
                self.slot_rounds[slot] += 1;
            }
        }

        if let Some(rows) = &mut self.rows {
            rows.push(round);
        }
    }

    pub(crate) fn merge(mut self, other: Self) -> Self {
        self.num_rounds += other.num_rounds;
        self.rounds_won += other.rounds_won;
        self.distinguished_wins += other.distinguished_wins;
        self.turns.extend(other.turns);
        self.turns_elapsed_total += other.turns_elapsed_total;
        self.numeric_anomalies += other.numeric_anomalies;
        for (total, n) in self.slot_totals.iter_mut().zip(other.slot_totals) {
            *total += n;
        }
        for (hits, n) in self.slot_rounds.iter_mut().zip(other.slot_rounds) {
            *hits += n;
        }
        if let (Some(rows), Some(more)) = (&mut self.rows, other.rows) {
            rows.extend(more);
        }
        self
    }
}

impl SimReport {
    pub(crate) fn from_tally(
        tally: RoundTally,
        config: &SimConfig,
        template: &CatalogTemplate,
        master_seed: u64,
    ) -> Self {
        let RoundTally {
            num_rounds,
            rounds_won,
            distinguished_wins,
            mut turns,
            turns_elapsed_total,
            slot_totals,
            slot_rounds,
            numeric_anomalies,
            rows,
        } = tally;
        let divisor = num_rounds.max(1) as f64;

        turns.sort_unstable();
        let avg_turns = turns.iter().sum::<u64>() as f64 / divisor;

        let mut rounds = rows.unwrap_or_default();
        rounds.sort_by_key(|r| r.round_index);

        Self {
            vault_name: template.name().to_string(),
            slot_labels: template.slots().iter().map(|e| e.label.clone()).collect(),
            memento_slots: template.mementos().iter().collect(),
            num_rounds,
            agent_count: config.agent_count,
            turn_cap: config.turn_cap,
            master_seed,
            entry_cost: config.entry_cost,
            rounds_won,
            rounds_exhausted: num_rounds - rounds_won,
            distinguished_wins,
            avg_turns,
            min_turns: turns.first().copied().unwrap_or(0),
            median_turns: turns.get(turns.len() / 2).copied().unwrap_or(0),
            p90_turns: percentile(&turns, 0.9),
            max_turns: turns.last().copied().unwrap_or(0),
            avg_spend: avg_turns * config.entry_cost as f64,
            avg_turns_elapsed: turns_elapsed_total as f64 / divisor,
            avg_slot_counts: slot_totals.iter().map(|&t| t as f64 / divisor).collect(),
            slot_hit_rate: slot_rounds.iter().map(|&n| n as f64 / divisor).collect(),
            numeric_anomalies,
            rounds,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    VAULT SIMULATION REPORT\n");
        report.push_str(&format!("  {}\n", self.vault_name));
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Rounds: {} total, {} won, {} closed without a winner\n",
            self.num_rounds, self.rounds_won, self.rounds_exhausted
        ));
        report.push_str(&format!(
            "Agents: {}   Turn cap: {}   Seed: {}\n\n",
            self.agent_count, self.turn_cap, self.master_seed
        ));

        report.push_str("── YOUR TURNS ───────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Turns:       {:.1}\n", self.avg_turns));
        report.push_str(&format!("  Min Turns:       {}\n", self.min_turns));
        report.push_str(&format!("  Median Turns:    {}\n", self.median_turns));
        report.push_str(&format!("  90th Pct Turns:  {}\n", self.p90_turns));
        report.push_str(&format!("  Max Turns:       {}\n", self.max_turns));
        report.push_str(&format!(
            "  Avg Spend:       {:.0} gold ({} per turn)\n",
            self.avg_spend, self.entry_cost
        ));
        report.push_str(&format!(
            "  Vault Length:    {:.1} turns on average\n",
            self.avg_turns_elapsed
        ));
        report.push_str(&format!(
            "  You Won:         {} rounds ({:.3}%)\n\n",
            self.distinguished_wins,
            self.distinguished_win_rate() * 100.0
        ));

        report.push_str("── YOUR PRIZES ──────────────────────────────────────────────────\n");
        report.push_str("  Slot  Avg/Round  Rounds Hit  Prize\n");
        report.push_str("  ────  ─────────  ──────────  ─────\n");
        for (slot, label) in self.slot_labels.iter().enumerate() {
            let marker = if self.memento_slots.contains(&slot) {
                " *"
            } else {
                ""
            };
            report.push_str(&format!(
                "  {:4}  {:9.3}  {:9.2}%  {}{}\n",
                slot,
                self.avg_slot_counts[slot],
                self.slot_hit_rate[slot] * 100.0,
                label,
                marker
            ));
        }
        report.push_str("  (* memento)\n");

        if self.numeric_anomalies > 0 {
            report.push_str(&format!(
                "\n  ⚠️  {} probabilities clamped to zero during renormalization\n",
                self.numeric_anomalies
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// One `winner,turns,"slots"` line per round, in round order.
    pub fn write_rows<W: Write>(&self, out: &mut W, header: bool) -> io::Result<()> {
        if header {
            writeln!(out, "winner,turns,items")?;
        }
        for round in &self.rounds {
            writeln!(out, "{}", round.to_row())?;
        }
        Ok(())
    }

    pub fn distinguished_win_rate(&self) -> f64 {
        self.distinguished_wins as f64 / self.num_rounds.max(1) as f64
    }
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
