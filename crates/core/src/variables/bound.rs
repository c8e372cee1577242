#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lower and upper limit on one variable or constraint row.
///
/// Equal limits express an equality.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    /// Unbounded in both directions.
    pub const NO_BOUND: Self = Self::new(f64::NEG_INFINITY, f64::INFINITY);

    /// Fixed at zero, the usual bound of an equality constraint.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Zero or greater.
    pub const NON_NEGATIVE: Self = Self::new(0.0, f64::INFINITY);

    #[must_use]
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Returns true if `value` lies within the limits, inclusive.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::NO_BOUND
    }
}
