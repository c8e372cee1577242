//! Planar dynamics models for legged base motion.
//!
//! The [`LinearInvertedPendulum`] relates the horizontal CoM acceleration to
//! the center of pressure of the contact loads. Every quantity comes with
//! analytic derivatives so constraints can linearize the dynamics against the
//! base motion, the loads, and the contact positions.

mod config;
mod linear_inverted_pendulum;

pub use config::{ConfigError, PendulumConfig, STANDARD_GRAVITY};
pub use linear_inverted_pendulum::LinearInvertedPendulum;
