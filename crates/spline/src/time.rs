use std::fmt;

use thiserror::Error;
use uom::{
    Conversion,
    si::{f64::Time, time},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unit-safe, strictly positive duration of one spline segment.
///
/// # Construction
///
/// From a concrete [`uom`] unit:
///
/// ```
/// use strider_spline::SegmentDuration;
/// use uom::si::time::millisecond;
///
/// let d = SegmentDuration::new::<millisecond>(250.0).unwrap();
/// assert!((d.seconds() - 0.25).abs() < 1e-12);
/// ```
///
/// Or from plain seconds with [`SegmentDuration::from_seconds`].
///
/// # Enforcement
///
/// - Durations must be finite and strictly positive.
/// - Zero, negative, or NaN values result in
///   [`SegmentDurationError::NotPositive`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentDuration(Time);

/// Error returned when constructing an invalid [`SegmentDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SegmentDurationError {
    #[error("segment duration must be greater than zero, got {0} s")]
    NotPositive(f64),

    #[error("segment duration must be finite, got {0} s")]
    NotFinite(f64),
}

impl SegmentDuration {
    /// Constructs a duration from a numeric value and unit.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite or not strictly positive.
    pub fn new<U>(value: f64) -> Result<Self, SegmentDurationError>
    where
        U: time::Unit + Conversion<f64, T = f64>,
    {
        Self::from_time(Time::new::<U>(value))
    }

    /// Constructs a duration from an existing [`Time`] value.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is not finite or not strictly positive.
    pub fn from_time(time: Time) -> Result<Self, SegmentDurationError> {
        let seconds = time.get::<time::second>();
        if seconds.is_infinite() {
            Err(SegmentDurationError::NotFinite(seconds))
        } else if seconds > 0.0 {
            Ok(Self(time))
        } else {
            Err(SegmentDurationError::NotPositive(seconds))
        }
    }

    /// Constructs a duration from seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is not finite or not strictly positive.
    pub fn from_seconds(seconds: f64) -> Result<Self, SegmentDurationError> {
        Self::new::<time::second>(seconds)
    }

    /// The duration in seconds.
    #[must_use]
    pub fn seconds(self) -> f64 {
        self.0.get::<time::second>()
    }

    /// Consumes the duration and returns the underlying [`Time`].
    #[must_use]
    pub fn into_inner(self) -> Time {
        self.0
    }
}

impl TryFrom<Time> for SegmentDuration {
    type Error = SegmentDurationError;

    fn try_from(time: Time) -> Result<Self, Self::Error> {
        Self::from_time(time)
    }
}

impl fmt::Display for SegmentDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.seconds())
    }
}

/// Time elapsed since the start of one spline segment, in seconds.
///
/// Not interchangeable with a global time or a [`PolynomialId`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalTime(pub f64);

impl LocalTime {
    /// The start of a segment.
    pub const START: Self = Self(0.0);

    #[must_use]
    pub fn seconds(self) -> f64 {
        self.0
    }
}

/// Position of a segment within a spline, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolynomialId(pub usize);

impl fmt::Display for PolynomialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "polynomial {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::{millisecond, second};

    #[test]
    fn accepts_positive_durations() {
        let d = SegmentDuration::new::<second>(0.4).unwrap();
        assert_relative_eq!(d.seconds(), 0.4);

        let d = SegmentDuration::try_from(Time::new::<millisecond>(100.0)).unwrap();
        assert_relative_eq!(d.seconds(), 0.1);
        assert_relative_eq!(d.into_inner().get::<millisecond>(), 100.0);
    }

    #[test]
    fn rejects_degenerate_durations() {
        assert_eq!(
            SegmentDuration::from_seconds(0.0),
            Err(SegmentDurationError::NotPositive(0.0))
        );
        assert_eq!(
            SegmentDuration::from_seconds(-1.0),
            Err(SegmentDurationError::NotPositive(-1.0))
        );
        assert!(SegmentDuration::from_seconds(f64::NAN).is_err());
        assert_eq!(
            SegmentDuration::from_seconds(f64::INFINITY),
            Err(SegmentDurationError::NotFinite(f64::INFINITY))
        );
    }

    #[test]
    fn displays_seconds() {
        let d = SegmentDuration::from_seconds(0.5).unwrap();
        assert_eq!(d.to_string(), "0.5 s");
        assert_eq!(PolynomialId(3).to_string(), "polynomial 3");
    }
}
