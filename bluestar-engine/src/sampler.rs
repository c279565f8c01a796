//! Randomness capability seam for deterministic vs Monte Carlo runs.
//!
//! Callers select a mode by injecting a strategy value rather than passing
//! an optional generator: [`Deterministic`] collapses every decision to its
//! expectation, [`SeededSampler`] draws from a reproducible ChaCha20 stream.
//! [`SamplerBundle`] groups the two streams a run needs (pack sampling and
//! drop decisions), both derived from one run seed with domain separation.

use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::numbers;

/// Every stochastic decision the engine makes, as a capability interface.
pub trait RandomnessSource {
    /// Shared-vs-unique rarity pick given the normalized shared probability.
    fn pick_shared(&mut self, prob_shared: f64) -> bool;

    /// Pick an index from a slice of non-negative weights. Callers supply a
    /// non-empty slice.
    fn pick_weighted(&mut self, weights: &[f64]) -> usize;

    /// Number of packs opened given the expected open rate.
    fn pack_count(&mut self, mean: f64) -> u64;

    /// Duplicate reward percentile within `[min_pct, max_pct]`.
    fn duplicate_pct(&mut self, min_pct: f64, max_pct: f64) -> f64;
}

/// Expectation-collapsing source for the deterministic mode: majority rarity
/// (shared wins ties), maximum weight (first occurrence on ties),
/// round-half-to-even pack counts, percentile midpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deterministic;

impl RandomnessSource for Deterministic {
    fn pick_shared(&mut self, prob_shared: f64) -> bool {
        prob_shared >= 0.5
    }

    fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        let mut best = 0;
        for (index, weight) in weights.iter().enumerate() {
            if *weight > weights[best] {
                best = index;
            }
        }
        best
    }

    fn pack_count(&mut self, mean: f64) -> u64 {
        numbers::round_half_even_u64(mean)
    }

    fn duplicate_pct(&mut self, min_pct: f64, max_pct: f64) -> f64 {
        (min_pct + max_pct) / 2.0
    }
}

/// Reproducibly seeded source for Monte Carlo runs.
#[derive(Debug, Clone)]
pub struct SeededSampler {
    rng: ChaCha20Rng,
}

impl SeededSampler {
    /// Seed a stream for one simulation domain, derived from the run seed.
    #[must_use]
    pub fn from_stream(run_seed: u64, domain_tag: &[u8]) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(run_seed, domain_tag)),
        }
    }
}

impl RandomnessSource for SeededSampler {
    fn pick_shared(&mut self, prob_shared: f64) -> bool {
        self.rng.r#gen::<f64>() < prob_shared
    }

    fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return 0;
        }
        let mut roll = self.rng.r#gen::<f64>() * total;
        for (index, weight) in weights.iter().enumerate() {
            if roll < *weight {
                return index;
            }
            roll -= weight;
        }
        weights.len() - 1
    }

    fn pack_count(&mut self, mean: f64) -> u64 {
        if !mean.is_finite() || mean <= 0.0 {
            return 0;
        }
        // Knuth's Poisson sampler; pack rates are small so the loop is short.
        let limit = (-mean).exp();
        let mut count = 0u64;
        let mut product = 1.0;
        loop {
            product *= self.rng.r#gen::<f64>();
            if product <= limit {
                return count;
            }
            count += 1;
        }
    }

    fn duplicate_pct(&mut self, min_pct: f64, max_pct: f64) -> f64 {
        if max_pct <= min_pct {
            return min_pct;
        }
        self.rng.gen_range(min_pct..=max_pct)
    }
}

/// The two sampler streams one run owns, segregated by simulation domain so
/// changing pack volume never perturbs drop decisions.
pub struct SamplerBundle {
    packs: Box<dyn RandomnessSource>,
    drops: Box<dyn RandomnessSource>,
}

impl SamplerBundle {
    /// Bundle for the deterministic mode.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            packs: Box::new(Deterministic),
            drops: Box::new(Deterministic),
        }
    }

    /// Bundle for a Monte Carlo run; both streams derive from the same run
    /// seed so a run is fully reproducible from one number.
    #[must_use]
    pub fn seeded(run_seed: u64) -> Self {
        Self {
            packs: Box::new(SeededSampler::from_stream(run_seed, b"packs")),
            drops: Box::new(SeededSampler::from_stream(run_seed, b"drops")),
        }
    }

    /// Stream used by the pack system.
    pub fn packs(&mut self) -> &mut dyn RandomnessSource {
        self.packs.as_mut()
    }

    /// Stream used by the drop algorithm.
    pub fn drops(&mut self) -> &mut dyn RandomnessSource {
        self.drops.as_mut()
    }
}

fn derive_stream_seed(run_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&run_seed.to_le_bytes())
        .expect("64-bit seed is a valid HMAC key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_prefers_majority_and_first_max() {
        let mut sampler = Deterministic;
        assert!(sampler.pick_shared(0.5));
        assert!(sampler.pick_shared(0.7));
        assert!(!sampler.pick_shared(0.49));
        assert_eq!(sampler.pick_weighted(&[0.2, 0.5, 0.5, 0.1]), 1);
        assert_eq!(sampler.pack_count(2.5), 2);
        assert!((sampler.duplicate_pct(0.4, 0.8) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn stream_derivation_separates_domains() {
        assert_ne!(
            derive_stream_seed(42, b"packs"),
            derive_stream_seed(42, b"drops")
        );
        assert_eq!(
            derive_stream_seed(42, b"packs"),
            derive_stream_seed(42, b"packs")
        );
        assert_ne!(
            derive_stream_seed(42, b"packs"),
            derive_stream_seed(43, b"packs")
        );
    }

    #[test]
    fn seeded_streams_replay_identically() {
        let mut a = SeededSampler::from_stream(7, b"drops");
        let mut b = SeededSampler::from_stream(7, b"drops");
        for _ in 0..32 {
            assert_eq!(
                a.pick_weighted(&[1.0, 2.0, 3.0]),
                b.pick_weighted(&[1.0, 2.0, 3.0])
            );
        }
    }

    #[test]
    fn poisson_mean_is_close_to_rate() {
        let mut sampler = SeededSampler::from_stream(1337, b"packs");
        let samples = 20_000;
        let total: u64 = (0..samples).map(|_| sampler.pack_count(3.0)).sum();
        let mean = numbers::u64_to_f64(total) / f64::from(samples);
        assert!((mean - 3.0).abs() < 0.1, "poisson mean drifted: {mean}");
    }

    #[test]
    fn weighted_draw_respects_weights() {
        let mut sampler = SeededSampler::from_stream(9, b"drops");
        let mut hits = [0u32; 2];
        for _ in 0..10_000 {
            hits[sampler.pick_weighted(&[3.0, 1.0])] += 1;
        }
        let ratio = f64::from(hits[0]) / 10_000.0;
        assert!((0.72..0.78).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn zero_rate_opens_no_packs() {
        let mut sampler = SeededSampler::from_stream(5, b"packs");
        assert_eq!(sampler.pack_count(0.0), 0);
        assert_eq!(Deterministic.pack_count(0.0), 0);
    }
}
