//! Progression scores, unique-level gating, and the unlock schedule.
//!
//! Pure functions over card slices; nothing in this module mutates state.

use std::collections::HashMap;

use crate::card::{Card, CardCategory};
use crate::config::ProgressionMapping;
use crate::constants::{SHARED_PROGRESSION_DIVISOR, UNIQUE_PROGRESSION_DIVISOR};
use crate::error::EngineError;
use crate::numbers;

/// Normalized progression score for one card, clamped to `[0, 1]`.
/// Shared cards normalize against level 100, unique cards against level 10.
#[must_use]
pub fn progression_score(card: &Card) -> f64 {
    let divisor = if card.category.is_shared() {
        SHARED_PROGRESSION_DIVISOR
    } else {
        UNIQUE_PROGRESSION_DIVISOR
    };
    (f64::from(card.level) / divisor).min(1.0)
}

/// Average progression score across one category, or 0.0 when the category
/// has no cards.
#[must_use]
pub fn compute_category_progression(cards: &[Card], category: CardCategory) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for card in cards.iter().filter(|c| c.category == category) {
        total += progression_score(card);
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / numbers::usize_to_f64(count)
    }
}

/// Average of the gold and blue progression scores, still normalized `[0, 1]`.
/// Gating callers scale by 100 before the floor lookup.
#[must_use]
pub fn avg_shared_progression(cards: &[Card]) -> f64 {
    let gold = compute_category_progression(cards, CardCategory::GoldShared);
    let blue = compute_category_progression(cards, CardCategory::BlueShared);
    (gold + blue) / 2.0
}

/// Floor lookup of the unique-level gate: the `unique_levels` entry paired
/// with the largest `shared_levels` threshold not exceeding
/// `avg_shared_level`. Below the first threshold the first entry applies,
/// never an undefined result.
#[must_use]
pub fn lookup_unique_gate(avg_shared_level: f64, mapping: &ProgressionMapping) -> u32 {
    if mapping.shared_levels.is_empty() || mapping.unique_levels.is_empty() {
        return 1;
    }
    let mut gate = mapping.unique_levels[0];
    for (threshold, unique_level) in mapping.shared_levels.iter().zip(&mapping.unique_levels) {
        if f64::from(*threshold) <= avg_shared_level {
            gate = *unique_level;
        } else {
            break;
        }
    }
    gate
}

/// Whether a unique card may still level up under the current gate. Strict
/// comparison: a card exactly at the gate waits for the gate to advance.
///
/// # Errors
///
/// Returns `EngineError::NotUnique` when called on a shared card.
pub fn can_upgrade_unique(card: &Card, gate: u32) -> Result<bool, EngineError> {
    if card.category != CardCategory::Unique {
        return Err(EngineError::NotUnique {
            card_id: card.id.clone(),
        });
    }
    Ok(card.level < gate)
}

/// Total unique cards unlocked by `day`: the sum of all schedule entries
/// whose key is on or before that day. Order-independent, 0 for an empty
/// schedule.
#[must_use]
pub fn accumulate_unlock_schedule(day: u32, schedule: &HashMap<u32, u32>) -> u32 {
    schedule
        .iter()
        .filter(|(unlock_day, _)| **unlock_day <= day)
        .map(|(_, count)| *count)
        .sum()
}
