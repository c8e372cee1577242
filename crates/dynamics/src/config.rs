use thiserror::Error;
use uom::si::{acceleration::meter_per_second_squared, f64::Acceleration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Configuration for a [`LinearInvertedPendulum`](crate::LinearInvertedPendulum).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PendulumConfig {
    gravity: f64,
}

/// Errors that can occur when validating a pendulum config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("gravity must be finite and positive, got {0} m/s²")]
    NonPositiveGravity(f64),
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
        }
    }
}

impl PendulumConfig {
    /// Creates a config with a validated gravitational acceleration.
    ///
    /// # Errors
    ///
    /// Returns an error if `gravity` is not finite or not positive.
    pub fn new(gravity: Acceleration) -> Result<Self, ConfigError> {
        let gravity = gravity.get::<meter_per_second_squared>();
        if !gravity.is_finite() || gravity <= 0.0 {
            return Err(ConfigError::NonPositiveGravity(gravity));
        }
        Ok(Self { gravity })
    }

    /// Gravitational acceleration in m/s².
    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::acceleration::standard_gravity;

    #[test]
    fn defaults_to_standard_gravity() {
        assert_eq!(PendulumConfig::default().gravity(), STANDARD_GRAVITY);

        let moon = PendulumConfig::new(Acceleration::new::<meter_per_second_squared>(1.62));
        assert!((moon.unwrap().gravity() - 1.62).abs() < 1e-12);

        let earth = PendulumConfig::new(Acceleration::new::<standard_gravity>(1.0)).unwrap();
        assert!((earth.gravity() - STANDARD_GRAVITY).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_gravity() {
        let zero = Acceleration::new::<meter_per_second_squared>(0.0);
        assert_eq!(
            PendulumConfig::new(zero),
            Err(ConfigError::NonPositiveGravity(0.0))
        );

        let down = Acceleration::new::<meter_per_second_squared>(-9.8);
        assert!(PendulumConfig::new(down).is_err());
    }
}
