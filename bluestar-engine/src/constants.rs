//! Balance and tuning constants for the Bluestar economy engine.
//!
//! Default math for the drop algorithm and the statistics runner; runtime
//! overrides go through [`crate::drop::DropTuning`].

// Drop algorithm tuning ----------------------------------------------------
pub(crate) const GAP_BASE: f64 = 1.5;
pub(crate) const STREAK_DECAY_SHARED: f64 = 0.6;
pub(crate) const STREAK_DECAY_UNIQUE: f64 = 0.3;
pub(crate) const COLOR_STREAK_DECAY: f64 = 0.6;
pub(crate) const HERO_STREAK_DECAY: f64 = 0.3;

/// Phase-2 unique selection draws from the N lowest-level unlocked heroes.
pub(crate) const UNIQUE_POOL_SIZE: usize = 10;

// Level caps ---------------------------------------------------------------
pub(crate) const DEFAULT_MAX_SHARED_LEVEL: u32 = 100;
pub(crate) const DEFAULT_MAX_UNIQUE_LEVEL: u32 = 10;

/// Normalization divisors for progression scores. Independent of the
/// configured level caps; a lowered cap leaves scores comparable.
pub(crate) const SHARED_PROGRESSION_DIVISOR: f64 = 100.0;
pub(crate) const UNIQUE_PROGRESSION_DIVISOR: f64 = 10.0;

// Monte Carlo runner -------------------------------------------------------
pub(crate) const MC_HARD_RUN_CAP: u32 = 500;
pub(crate) const MC_SOFT_RUN_CAP: u32 = 200;
pub(crate) const DEFAULT_Z_SCORE: f64 = 1.96;

// Validation ---------------------------------------------------------------
pub(crate) const RATE_SUM_TOLERANCE: f64 = 1e-9;
