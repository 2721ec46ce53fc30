// Vault population and timing
pub const DEFAULT_AGENT_COUNT: usize = 1500;
/// One hour at 100 draws per second per agent.
pub const DEFAULT_TURN_CAP: u64 = 3600 * 100;
pub const DEFAULT_ROUND_COUNT: u32 = 100_000;
pub const DEFAULT_ENTRY_COST: u64 = 25_000;

// The participant whose outcomes are reported
pub const DISTINGUISHED_AGENT: usize = 0;

// Probability bookkeeping
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;
pub const DEGENERATE_MASS: f64 = 1e-12;

// Memento membership is a u64 bitmask
pub const MAX_CATALOG_SLOTS: usize = 64;

// Row output sentinel for "no winner within the turn cap"
pub const NO_WINNER_SENTINEL: i64 = -1;
