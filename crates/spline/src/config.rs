use thiserror::Error;
use uom::si::{f64::Length, length::meter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`ComSpline`](crate::ComSpline).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplineConfig {
    com_height: f64,
}

/// Errors that can occur when validating a spline config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("CoM height must be finite and positive, got {0} m")]
    ComHeight(f64),
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self { com_height: 0.58 }
    }
}

impl SplineConfig {
    /// Creates a config with a validated CoM height.
    ///
    /// # Errors
    ///
    /// Returns an error if the height is not finite or not positive.
    pub fn new(com_height: Length) -> Result<Self, ConfigError> {
        let com_height = com_height.get::<meter>();
        if !com_height.is_finite() || com_height <= 0.0 {
            return Err(ConfigError::ComHeight(com_height));
        }
        Ok(Self { com_height })
    }

    /// Height of the CoM above ground in meters, reported as the vertical
    /// position of every spline sample.
    #[must_use]
    pub fn com_height(&self) -> f64 {
        self.com_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::length::centimeter;

    #[test]
    fn validates_com_height() {
        let config = SplineConfig::new(Length::new::<centimeter>(50.0)).unwrap();
        assert!((config.com_height() - 0.5).abs() < 1e-12);

        assert_eq!(
            SplineConfig::new(Length::new::<meter>(0.0)),
            Err(ConfigError::ComHeight(0.0))
        );
        assert!(SplineConfig::new(Length::new::<meter>(f64::NAN)).is_err());
    }

    #[test]
    fn default_height() {
        assert_eq!(SplineConfig::default().com_height(), 0.58);
    }
}
