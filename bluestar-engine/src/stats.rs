//! Online mean/variance accumulation (Welford). Folds one value at a time
//! so Monte Carlo memory stays independent of run count.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_Z_SCORE;

/// Running count, mean, and sum of squared deviations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnlineStats {
    count: u64,
    mean: f64,
    m2: f64,
}

/// Point-in-time readout of an accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub count: u64,
    pub mean: f64,
    pub std_dev: f64,
    /// Confidence half-width at the z-score the summary was taken with.
    pub ci_half_width: f64,
}

impl OnlineStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance `m2 / (count - 1)`, zero below two observations.
    #[must_use]
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    /// Confidence half-width `z * std / sqrt(count)`.
    #[must_use]
    pub fn half_width(&self, z_score: f64) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            z_score * self.std_dev() / (self.count as f64).sqrt()
        }
    }

    /// Summary at the default 95% confidence z-score.
    #[must_use]
    pub fn summary(&self) -> StatSummary {
        self.summary_at(DEFAULT_Z_SCORE)
    }

    #[must_use]
    pub fn summary_at(&self, z_score: f64) -> StatSummary {
        StatSummary {
            count: self.count,
            mean: self.mean,
            std_dev: self.std_dev(),
            ci_half_width: self.half_width(z_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sample_matches_direct_computation() {
        let mut stats = OnlineStats::new();
        for value in [3.0, 5.0, 7.0] {
            stats.push(value);
        }
        assert_eq!(stats.count(), 3);
        assert!((stats.mean() - 5.0).abs() < 1e-12);
        assert!((stats.sample_variance() - 4.0).abs() < 1e-12);
        assert!((stats.std_dev() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn half_width_uses_z_over_sqrt_n() {
        let mut stats = OnlineStats::new();
        for value in [3.0, 5.0, 7.0] {
            stats.push(value);
        }
        let expected = 1.96 * 2.0 / 3.0_f64.sqrt();
        assert!((stats.half_width(1.96) - expected).abs() < 1e-12);
        assert!((stats.summary().ci_half_width - expected).abs() < 1e-12);
    }

    #[test]
    fn degenerate_counts_report_zero_spread() {
        let mut stats = OnlineStats::new();
        assert_eq!(stats.half_width(1.96), 0.0);
        stats.push(42.0);
        assert_eq!(stats.mean(), 42.0);
        assert_eq!(stats.sample_variance(), 0.0);
    }

    #[test]
    fn mean_is_stable_for_constant_stream() {
        let mut stats = OnlineStats::new();
        for _ in 0..10_000 {
            stats.push(0.1);
        }
        assert!((stats.mean() - 0.1).abs() < 1e-12);
        assert!(stats.sample_variance().abs() < 1e-12);
    }
}
