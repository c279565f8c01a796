//! Greedy upgrade engine: repeatedly applies the single best-priority
//! eligible upgrade until no card qualifies.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::card::{Card, CardCategory};
use crate::config::SimConfig;
use crate::economy::upgrade_cost;
use crate::error::EngineError;
use crate::progression::{avg_shared_progression, can_upgrade_unique, lookup_unique_gate};
use crate::state::GameState;

/// Record of one executed upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeEvent {
    pub card_id: String,
    pub old_level: u32,
    pub new_level: u32,
    pub dupes_spent: u32,
    pub coins_spent: u64,
    pub bluestars_earned: u64,
    pub day: u32,
}

/// Upgrade events for one day, inline up to the common small case.
pub type UpgradeList = SmallVec<[UpgradeEvent; 4]>;

/// Candidate indices in priority order: unique first, then gold, then blue,
/// lowest level first within each category (catch-up).
#[must_use]
pub fn upgrade_candidates(cards: &[Card]) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..cards.len()).collect();
    candidates.sort_by_key(|&index| {
        let card = &cards[index];
        let priority = match card.category {
            CardCategory::Unique => 0u8,
            CardCategory::GoldShared => 1,
            CardCategory::BlueShared => 2,
        };
        (priority, card.level)
    });
    candidates
}

/// Run the greedy loop to fixpoint. The candidate scan restarts after every
/// applied upgrade because priority ordering and the unique gate can both
/// shift. A card may upgrade several times in one invocation.
///
/// # Errors
///
/// Returns `EngineError::LedgerContract` if a spend fails after the same
/// scan verified affordability, and propagates gating misuse errors.
pub fn attempt_upgrades(
    state: &mut GameState,
    config: &SimConfig,
) -> Result<UpgradeList, EngineError> {
    let mut events = UpgradeList::new();
    loop {
        let candidates = upgrade_candidates(&state.cards);
        let mut applied = false;
        for index in candidates {
            if is_eligible(state, config, index)? {
                events.push(execute_upgrade(state, config, index)?);
                applied = true;
                break;
            }
        }
        if !applied {
            return Ok(events);
        }
    }
}

/// All four eligibility conditions: below the category cap, enough banked
/// duplicates, an affordable coin cost, and (unique only) headroom under the
/// gate. The gate is recomputed fresh for every scan since shared
/// progression may have moved during this same pass.
fn is_eligible(state: &GameState, config: &SimConfig, index: usize) -> Result<bool, EngineError> {
    let card = &state.cards[index];
    if card.is_maxed(config.max_level_for(card.category)) {
        return Ok(false);
    }
    let Some(table) = config.upgrade_tables.get(&card.category) else {
        return Ok(false);
    };
    let (dupe_cost, coin_cost) = upgrade_cost(card, table);
    if card.duplicates < dupe_cost || state.ledger.balance() < coin_cost {
        return Ok(false);
    }
    if card.category == CardCategory::Unique {
        let avg_shared_level = avg_shared_progression(&state.cards) * 100.0;
        let gate = lookup_unique_gate(avg_shared_level, &config.progression_mapping);
        if !can_upgrade_unique(card, gate)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Apply one upgrade: deduct duplicates and coins atomically, bump the
/// level, award bluestars. The reward table is indexed by the pre-upgrade
/// level itself, one past the cost tables' `level - 1`.
fn execute_upgrade(
    state: &mut GameState,
    config: &SimConfig,
    index: usize,
) -> Result<UpgradeEvent, EngineError> {
    let card = &state.cards[index];
    let table = &config.upgrade_tables[&card.category];
    let (dupe_cost, coin_cost) = upgrade_cost(card, table);
    let old_level = card.level;
    let card_id = card.id.clone();
    let bluestars = table
        .bluestar_rewards
        .get(old_level as usize)
        .copied()
        .unwrap_or(0);

    // Spend coins before touching the card so a failed spend leaves no
    // partial mutation observable.
    if !state.ledger.spend(coin_cost, &card_id, state.day) {
        return Err(EngineError::LedgerContract { card_id });
    }
    let card = &mut state.cards[index];
    card.duplicates -= dupe_cost;
    card.level += 1;
    state.total_bluestars += bluestars;

    Ok(UpgradeEvent {
        card_id,
        old_level,
        new_level: old_level + 1,
        dupes_spent: dupe_cost,
        coins_spent: coin_cost,
        bluestars_earned: bluestars,
        day: state.day,
    })
}
