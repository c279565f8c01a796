//! Error taxonomy for the engine.
//!
//! Resource exhaustion (not enough duplicates or coins for an upgrade) is a
//! normal ineligibility outcome and deliberately has no variant here.

use thiserror::Error;

/// Failures surfaced synchronously to the caller; nothing is retried
/// internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed or inconsistent lookup tables, detected before any
    /// simulation work begins.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unique-only gating logic invoked on a shared card.
    #[error("card '{card_id}' is not a unique card")]
    NotUnique { card_id: String },

    /// Run parameters rejected before any simulation work begins.
    #[error("run budget violation: {0}")]
    RunBudget(String),

    /// A ledger spend failed after affordability was checked in the same
    /// scan. Indicates a bug in the upgrade engine, never a player state.
    #[error("coin spend failed after affordability check for card '{card_id}'")]
    LedgerContract { card_id: String },
}
