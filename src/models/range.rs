//! Numeric score ranges.

use serde::{Deserialize, Serialize};

/// An inclusive numeric span, used both for seed (input) and display
/// (output) ranges.
///
/// `min` may exceed `max`: a reversed seed range maps high raw values to
/// low scores, which is how "lower is better" metrics are scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// Create a new range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Seed range used by the coach view (raw seed scores).
    pub const fn coach_seed() -> Self {
        Self::new(55.0, 95.0)
    }

    /// Display range shown to coaches.
    pub const fn coach_display() -> Self {
        Self::new(70.0, 95.0)
    }

    /// Width of the range (`max - min`), negative for reversed ranges.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        self.min + 0.5 * self.span()
    }

    /// Returns true when the range has zero width.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Lower and upper bound, regardless of orientation.
    pub fn bounds(&self) -> (f64, f64) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }

    /// The same span with its ends swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.max, self.min)
    }

    /// Returns true when both ends are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self::coach_display()
    }
}
