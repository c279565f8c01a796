//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to the nearest integer with ties going to the even neighbor,
/// clamped to the u64 range. Non-finite or negative values round to 0.
#[must_use]
pub fn round_half_even_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let rounded = value.clamp(0.0, max).round_ties_even();
    cast::<f64, u64>(rounded).unwrap_or(0)
}

/// Round a f64 to the nearest integer with ties going to the even neighbor,
/// clamped to the u32 range. Non-finite or negative values round to 0.
#[must_use]
pub fn round_half_even_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.clamp(0.0, max).round_ties_even()).unwrap_or(0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_even_rounds_ties_to_even() {
        assert_eq!(round_half_even_u64(0.5), 0);
        assert_eq!(round_half_even_u64(1.5), 2);
        assert_eq!(round_half_even_u64(2.5), 2);
        assert_eq!(round_half_even_u64(3.5), 4);
        assert_eq!(round_half_even_u64(2.4), 2);
        assert_eq!(round_half_even_u64(2.6), 3);
    }

    #[test]
    fn half_even_handles_non_finite_and_negative() {
        assert_eq!(round_half_even_u64(f64::NAN), 0);
        assert_eq!(round_half_even_u64(f64::INFINITY), 0);
        assert_eq!(round_half_even_u64(-3.0), 0);
        assert_eq!(round_half_even_u32(-0.4), 0);
        assert_eq!(round_half_even_u32(f64::NAN), 0);
    }

    #[test]
    fn widening_casts_cover_ranges() {
        assert!((u64_to_f64(12) - 12.0).abs() < f64::EPSILON);
        assert!((usize_to_f64(3) - 3.0).abs() < f64::EPSILON);
    }
}
