//! Pack system: converts a day's configured open rates into a flat ordered
//! list of draw events.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::sampler::RandomnessSource;

/// Lightweight draw-event marker. Carries no card reference; the drop
/// algorithm decides the card later. `pull_index` is 1-indexed within its
/// day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPull {
    pub pack_name: String,
    pub pull_index: u32,
}

/// Build the day's pulls in pack-definition order.
///
/// Per pack type the open count is the sampler's realization of the
/// configured rate (round-half-to-even in deterministic mode, Poisson in
/// Monte Carlo mode), and each open yields the card-types count found by a
/// floor lookup keyed by the currently unlocked unique card count.
#[must_use]
pub fn pulls_for_day(
    config: &SimConfig,
    day: u32,
    unlocked_unique: u32,
    sampler: &mut dyn RandomnessSource,
) -> Vec<CardPull> {
    let rates = config.day_pack_counts(day);
    let mut pulls = Vec::new();
    let mut pull_index = 0u32;

    for pack in &config.packs {
        let Some(rate) = rates.get(&pack.name) else {
            continue;
        };
        let opened = sampler.pack_count(*rate);
        let card_types = u64::from(pack.card_types_for(unlocked_unique));
        for _ in 0..opened.saturating_mul(card_types) {
            pull_index += 1;
            pulls.push(CardPull {
                pack_name: pack.name.clone(),
                pull_index,
            });
        }
    }
    pulls
}
