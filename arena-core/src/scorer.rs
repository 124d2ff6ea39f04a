//! Score normalization
//!
//! Every score entering the system passes through `NormalizedScore`, the
//! single chokepoint guaranteeing a valid bounded integer no matter which
//! strategy produced the raw value.

/// An integer score clamped to 0-100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedScore {
    value: u32,
}

impl NormalizedScore {
    /// Round and clamp a raw scoring result. Non-finite input maps to 0.
    pub fn new(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self { value: 0 };
        }
        let clamped = raw.round().clamp(0.0, 100.0);
        Self {
            value: clamped as u32,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_and_clamps() {
        assert_eq!(NormalizedScore::new(49.4).value(), 49);
        assert_eq!(NormalizedScore::new(49.5).value(), 50);
        assert_eq!(NormalizedScore::new(100.0).value(), 100);
        assert_eq!(NormalizedScore::new(250.0).value(), 100);
        assert_eq!(NormalizedScore::new(-10.0).value(), 0);
        assert_eq!(NormalizedScore::new(0.0).value(), 0);
    }

    #[test]
    fn test_non_finite_maps_to_zero() {
        assert_eq!(NormalizedScore::new(f64::NAN).value(), 0);
        assert_eq!(NormalizedScore::new(f64::INFINITY).value(), 0);
        assert_eq!(NormalizedScore::new(f64::NEG_INFINITY).value(), 0);
    }

    #[test]
    fn test_all_finite_inputs_stay_in_bounds() {
        for raw in [-1e18, -1.0, 0.3, 50.5, 99.9, 1e18] {
            let score = NormalizedScore::new(raw).value();
            assert!(score <= 100, "score {} out of bounds for raw {}", score, raw);
        }
    }
}
