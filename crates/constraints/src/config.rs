use strider_core::MotionDerivative;
use thiserror::Error;
use uom::si::{f64::Time, time::second};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slack when counting samples, so a horizon that is an exact multiple of
/// the sample interval keeps its final sample.
const SAMPLE_TOLERANCE: f64 = 1e-9;

/// Errors that can occur when validating a constraint config.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("average swing duration must be finite and positive, got {0} s")]
    SwingDuration(f64),

    #[error("sample interval must be finite and positive, got {0} s")]
    SampleInterval(f64),

    #[error("junction constraint needs at least one derivative")]
    NoDerivatives,

    #[error("derivative {0:?} listed more than once")]
    DuplicateDerivative(MotionDerivative),
}

fn positive_seconds(time: Time) -> Option<f64> {
    let seconds = time.get::<second>();
    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}

/// Configuration for a [`SwingConstraint`](crate::SwingConstraint).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwingConfig {
    t_swing_avg: f64,
    node_start: usize,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            t_swing_avg: 0.3,
            node_start: 1,
        }
    }
}

impl SwingConfig {
    /// Creates a config with a validated swing duration.
    ///
    /// # Errors
    ///
    /// Returns an error if `t_swing_avg` is not finite and positive.
    pub fn new(t_swing_avg: Time, node_start: usize) -> Result<Self, ConfigError> {
        let t_swing_avg = positive_seconds(t_swing_avg)
            .ok_or(ConfigError::SwingDuration(t_swing_avg.get::<second>()))?;
        Ok(Self {
            t_swing_avg,
            node_start,
        })
    }

    /// Average swing duration in seconds, used to estimate node velocities.
    #[must_use]
    pub fn t_swing_avg(&self) -> f64 {
        self.t_swing_avg
    }

    /// Index of the first node that may be constrained.
    #[must_use]
    pub fn node_start(&self) -> usize {
        self.node_start
    }
}

/// Configuration for a
/// [`SplineJunctionConstraint`](crate::SplineJunctionConstraint).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JunctionConfig {
    derivatives: Vec<MotionDerivative>,
}

impl Default for JunctionConfig {
    /// Position and velocity continuity.
    fn default() -> Self {
        Self {
            derivatives: vec![MotionDerivative::Pos, MotionDerivative::Vel],
        }
    }
}

impl JunctionConfig {
    /// Creates a config that joins segments in every listed derivative.
    ///
    /// # Errors
    ///
    /// Returns an error if no derivative is listed, or one is listed twice.
    pub fn new(
        derivatives: impl IntoIterator<Item = MotionDerivative>,
    ) -> Result<Self, ConfigError> {
        let mut unique = Vec::new();
        for dxdt in derivatives {
            if unique.contains(&dxdt) {
                return Err(ConfigError::DuplicateDerivative(dxdt));
            }
            unique.push(dxdt);
        }
        if unique.is_empty() {
            return Err(ConfigError::NoDerivatives);
        }
        Ok(Self {
            derivatives: unique,
        })
    }

    /// Joined derivatives, in the order their rows are laid out.
    #[must_use]
    pub fn derivatives(&self) -> &[MotionDerivative] {
        &self.derivatives
    }
}

/// Configuration for a [`DynamicConstraint`](crate::DynamicConstraint).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DynamicConfig {
    dt: f64,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self { dt: 0.1 }
    }
}

impl DynamicConfig {
    /// Creates a config with a validated sample interval.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive.
    pub fn new(dt: Time) -> Result<Self, ConfigError> {
        let dt = positive_seconds(dt).ok_or(ConfigError::SampleInterval(dt.get::<second>()))?;
        Ok(Self { dt })
    }

    /// Interval between dynamics samples in seconds.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of samples `0, dt, 2·dt, …` within `[0, total_time]`.
    #[must_use]
    pub fn sample_count(&self, total_time: f64) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let intervals = (total_time.max(0.0) / self.dt + SAMPLE_TOLERANCE).floor() as usize;
        intervals + 1
    }

    /// Sample times within `[0, total_time]`, starting at zero.
    #[must_use]
    pub fn sample_times(&self, total_time: f64) -> Vec<f64> {
        let dt = self.dt;
        (0..self.sample_count(total_time))
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let t = k as f64 * dt;
                t.min(total_time)
            })
            .collect()
    }
}
