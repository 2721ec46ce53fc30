//! Vault Sim command-line runner
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]
//!
//! Logging: set `RUST_LOG=vault_sim=debug` (or pass `-v`/`-vv`) to see
//! per-round logs on stderr.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vault_sim::build_info::LONG_VERSION;
use vault_sim::core::constants::{
    DEFAULT_AGENT_COUNT, DEFAULT_ENTRY_COST, DEFAULT_ROUND_COUNT, DEFAULT_TURN_CAP,
};
use vault_sim::{run_simulation, CatalogTemplate, SimConfig, SimReport, VaultKind};

#[derive(Parser, Debug)]
#[command(name = "vault-sim", version = LONG_VERSION, about = "Simulate a shared prize vault")]
struct Cli {
    /// Built-in vault to simulate
    #[arg(long, value_enum, default_value = "ctp")]
    vault: VaultKind,

    /// JSON prize table to use instead of a built-in vault
    #[arg(long, conflicts_with = "vault")]
    catalog: Option<PathBuf>,

    /// Participants per vault, including you (agent 0)
    #[arg(long, default_value_t = DEFAULT_AGENT_COUNT)]
    agents: usize,

    /// Turns before the vault closes without a winner
    #[arg(long, default_value_t = DEFAULT_TURN_CAP)]
    turn_cap: u64,

    /// Number of vault rounds to simulate
    #[arg(long, default_value_t = DEFAULT_ROUND_COUNT)]
    rounds: u32,

    /// Master seed for reproducible runs (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 = one per core, 1 = sequential)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Gold per turn, for spend estimates
    #[arg(long, default_value_t = DEFAULT_ENTRY_COST)]
    entry_cost: u64,

    /// Write per-round rows to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print per-round rows to stdout before the report
    #[arg(long)]
    rows: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            num_rounds: self.rounds,
            seed: self.seed,
            agent_count: self.agents,
            turn_cap: self.turn_cap,
            workers: self.workers,
            entry_cost: self.entry_cost,
            keep_rows: self.rows || self.csv.is_some(),
        }
    }

    fn template(&self) -> vault_sim::Result<CatalogTemplate> {
        match &self.catalog {
            Some(path) => CatalogTemplate::load(path),
            None => self.vault.template(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "vault_sim=warn",
            1 => "vault_sim=info",
            _ => "vault_sim=debug",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn write_outputs(cli: &Cli, report: &SimReport) -> io::Result<()> {
    if let Some(path) = &cli.csv {
        let mut file = BufWriter::new(File::create(path)?);
        report.write_rows(&mut file, true)?;
        file.flush()?;
        tracing::info!(path = %path.display(), "wrote round rows");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.rows {
        report.write_rows(&mut out, false)?;
    }
    if cli.json {
        writeln!(out, "{}", report.to_json())?;
    } else {
        write!(out, "{}", report.to_text())?;
    }
    out.flush()
}

fn run(cli: &Cli) -> vault_sim::Result<()> {
    let template = cli.template()?;
    let report = run_simulation(&cli.sim_config(), &template)?;
    write_outputs(cli, &report)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "simulation failed");
            eprintln!("vault-sim: {err}");
            ExitCode::FAILURE
        }
    }
}
