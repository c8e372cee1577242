use thiserror::Error;

use crate::SegmentDurationError;

/// Errors that can occur when building or filling a spline.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SplineError {
    #[error("invalid segment duration: {0}")]
    InvalidDuration(#[from] SegmentDurationError),

    #[error("horizon must be finite and positive, got {0} s")]
    InvalidHorizon(f64),

    #[error("spline has {expected} coefficients, got {got}")]
    CoefficientCount { expected: usize, got: usize },
}
