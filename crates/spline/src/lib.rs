//! Polynomial splines for center-of-mass motion.
//!
//! A [`ComSpline`] strings [`PolynomialXd`] segments together over a planning
//! horizon. Its coefficients form one flat optimization vector, and every
//! position, velocity, or acceleration sample comes with a sparse Jacobian
//! row against that vector.
//!
//! # Modules
//!
//! - [`polynomial`]: single-dimension segments ([`LinearPolynomial`],
//!   [`CubicPolynomial`], [`QuinticPolynomial`])
//! - [`PolynomialXd`]: one polynomial per planar dimension sharing a duration
//! - [`ComSpline`]: the full-horizon spline
//!
//! Segment-local times and segment ids are distinct types ([`LocalTime`],
//! [`PolynomialId`]), so per-segment accessors cannot be called with the two
//! swapped.

mod com_spline;
mod config;
mod error;
pub mod polynomial;
mod polynomial_xd;
mod time;

pub use com_spline::ComSpline;
pub use config::{ConfigError, SplineConfig};
pub use error::SplineError;
pub use polynomial::{
    CubicPolynomial, LinearPolynomial, Polynomial, PolynomialCoeff, QuinticPolynomial,
};
pub use polynomial_xd::PolynomialXd;
pub use time::{LocalTime, PolynomialId, SegmentDuration, SegmentDurationError};
