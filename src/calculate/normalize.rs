//! Score normalization and delta tone.
//!
//! Raw seed values are mapped into the display range with a single affine
//! transform followed by a clamp:
//!
//! ```text
//! ratio  = (raw - seed.min) / (seed.max - seed.min)     (0.5 if seed.min == seed.max)
//! scaled = display.min + ratio * (display.max - display.min)
//! score  = round(clamp(scaled, display))
//! ```
//!
//! Rounding is half away from zero (`f64::round`), so `82.5` becomes `83`.

use serde::{Deserialize, Serialize};

use crate::models::{ScoreRange, Tone};

/// How a scaled score is turned into an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Nearest integer, halves away from zero
    #[default]
    Round,
    Floor,
    Ceil,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Round => value.round(),
            Rounding::Floor => value.floor(),
            Rounding::Ceil => value.ceil(),
        }
    }
}

/// Maps raw values from a seed range into a bounded display range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreNormalizer {
    seed: ScoreRange,
    display: ScoreRange,
    rounding: Rounding,
}

impl ScoreNormalizer {
    pub fn new(seed: ScoreRange, display: ScoreRange) -> Self {
        Self {
            seed,
            display,
            rounding: Rounding::default(),
        }
    }

    /// Normalizer for coach seed scores (55–95 into 70–95).
    pub fn coach() -> Self {
        Self::new(ScoreRange::coach_seed(), ScoreRange::coach_display())
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn seed(&self) -> ScoreRange {
        self.seed
    }

    pub fn display(&self) -> ScoreRange {
        self.display
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// The same display range and rounding over a different seed range.
    pub fn with_seed(mut self, seed: ScoreRange) -> Self {
        self.seed = seed;
        self
    }

    /// Position of `raw` within the seed range; 0.5 for a zero-width range.
    pub fn ratio(&self, raw: f64) -> f64 {
        if self.seed.is_degenerate() {
            0.5
        } else {
            (raw - self.seed.min) / self.seed.span()
        }
    }

    /// Scaled and clamped score before rounding.
    pub fn scale(&self, raw: f64) -> f64 {
        let scaled = self.display.min + self.ratio(raw) * self.display.span();
        // NaN input, or an infinite ratio over a zero-width display range
        let scaled = if scaled.is_nan() {
            self.display.midpoint()
        } else {
            scaled
        };
        let (lo, hi) = self.display.bounds();
        scaled.max(lo).min(hi)
    }

    /// Normalize a raw value into an integer display score.
    ///
    /// Never fails: the result always lies within the display range.
    pub fn normalize(&self, raw: f64) -> i32 {
        let rounded = self.rounding.apply(self.scale(raw));

        // Fractional display bounds could round outside the range
        let (lo, hi) = self.display.bounds();
        let (lo, hi) = (lo.ceil(), hi.floor());
        let bounded = if lo <= hi {
            rounded.max(lo).min(hi)
        } else {
            rounded
        };
        bounded as i32
    }
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self::coach()
    }
}

/// Normalize `raw` from `seed` into `display` with default rounding.
pub fn normalize(raw: f64, seed: ScoreRange, display: ScoreRange) -> i32 {
    ScoreNormalizer::new(seed, display).normalize(raw)
}

/// Classify a period-over-period change.
pub fn classify_tone(delta: i32) -> Tone {
    match delta.signum() {
        1 => Tone::Up,
        -1 => Tone::Down,
        _ => Tone::Flat,
    }
}

/// Format a delta for display: `▲ +n`, `▼ n` or `± 0`.
pub fn format_delta(delta: i32) -> String {
    match classify_tone(delta) {
        Tone::Up => format!("▲ +{}", delta),
        Tone::Down => format!("▼ {}", delta.unsigned_abs()),
        Tone::Flat => "± 0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_with_offset_input() {
        // seed 83 with offset -1 -> 82 -> ratio 0.675 -> 86.875
        assert_eq!(
            normalize(82.0, ScoreRange::coach_seed(), ScoreRange::coach_display()),
            87
        );
    }

    #[test]
    fn test_normalize_bounds() {
        let n = ScoreNormalizer::coach();
        assert_eq!(n.normalize(55.0), 70);
        assert_eq!(n.normalize(95.0), 95);
    }

    #[test]
    fn test_normalize_clamps_outside_seed_range() {
        let n = ScoreNormalizer::coach();
        assert_eq!(n.normalize(20.0), 70);
        assert_eq!(n.normalize(140.0), 95);
        assert_eq!(n.normalize(f64::INFINITY), 95);
        assert_eq!(n.normalize(f64::NEG_INFINITY), 70);
    }

    #[test]
    fn test_normalize_degenerate_seed_range() {
        let seed = ScoreRange::new(60.0, 60.0);
        let display = ScoreRange::coach_display();
        // 70 + 0.5 * 25 = 82.5, rounded half away from zero
        assert_eq!(normalize(12.0, seed, display), 83);
        assert_eq!(normalize(60.0, seed, display), 83);
    }

    #[test]
    fn test_normalize_nan_is_midpoint() {
        assert_eq!(ScoreNormalizer::coach().normalize(f64::NAN), 83);
    }

    #[test]
    fn test_normalize_reversed_seed_range() {
        // Lower raw values score higher
        let n = ScoreNormalizer::new(ScoreRange::new(6.0, 4.0), ScoreRange::new(70.0, 95.0));
        assert_eq!(n.normalize(4.0), 95);
        assert_eq!(n.normalize(6.0), 70);
        assert_eq!(n.normalize(5.0), 83);
    }

    #[test]
    fn test_normalize_reversed_display_range_does_not_panic() {
        let n = ScoreNormalizer::new(ScoreRange::coach_seed(), ScoreRange::new(95.0, 70.0));
        let score = n.normalize(75.0);
        assert!((70..=95).contains(&score));
    }

    #[test]
    fn test_rounding_modes() {
        let n = ScoreNormalizer::coach();
        assert!((n.scale(82.0) - 86.875).abs() < 1e-9);
        assert_eq!(n.with_rounding(Rounding::Floor).normalize(82.0), 86);
        assert_eq!(n.with_rounding(Rounding::Ceil).normalize(82.0), 87);
    }

    #[test]
    fn test_fractional_display_bounds() {
        let n = ScoreNormalizer::new(ScoreRange::new(0.0, 1.0), ScoreRange::new(0.4, 9.6));
        assert_eq!(n.normalize(0.0), 1);
        assert_eq!(n.normalize(1.0), 9);
    }

    #[test]
    fn test_classify_tone() {
        assert_eq!(classify_tone(5), Tone::Up);
        assert_eq!(classify_tone(-3), Tone::Down);
        assert_eq!(classify_tone(0), Tone::Flat);
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(22), "▲ +22");
        assert_eq!(format_delta(-3), "▼ 3");
        assert_eq!(format_delta(0), "± 0");
        assert_eq!(format_delta(i32::MIN), "▼ 2147483648");
    }

    #[test]
    fn test_rounding_serialization() {
        assert_eq!(serde_json::to_string(&Rounding::Ceil).unwrap(), "\"ceil\"");
        let parsed: Rounding = serde_json::from_str("\"floor\"").unwrap();
        assert_eq!(parsed, Rounding::Floor);
    }

    proptest! {
        #[test]
        fn prop_normalize_stays_in_display_range(
            raw in -1.0e6f64..1.0e6,
            seed_min in -1000.0f64..1000.0,
            seed_width in 0.001f64..1000.0,
            display_min in -100i32..100,
            display_width in 0i32..200,
        ) {
            let seed = ScoreRange::new(seed_min, seed_min + seed_width);
            let display = ScoreRange::new(display_min as f64, (display_min + display_width) as f64);
            let score = normalize(raw, seed, display);
            prop_assert!(score >= display_min && score <= display_min + display_width);
        }
    }
}
