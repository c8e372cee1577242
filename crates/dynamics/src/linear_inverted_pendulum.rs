use nalgebra::{Vector2, Vector3};
use tracing::trace;

use strider_core::{
    BaseMotion, Coords2D, EndeffectorId, EndeffectorLoads, EndeffectorPositions, JacobianRow,
    MotionDerivative,
};

use crate::PendulumConfig;

/// A point mass at constant height balanced over the center of pressure.
///
/// The horizontal CoM acceleration is
///
/// ```text
/// a = g / h · (p − u)
/// ```
///
/// with `p` the planar CoM position, `h` its height, and `u` the center of
/// pressure: the load-weighted mean of the planar endeffector positions.
///
/// The pendulum only models support phases, so every query that involves the
/// center of pressure requires a positive total load.
#[derive(Debug, Clone)]
pub struct LinearInvertedPendulum {
    config: PendulumConfig,
    pos: Vector2<f64>,
    height: f64,
    ee_load: EndeffectorLoads,
    ee_pos: EndeffectorPositions,
}

impl LinearInvertedPendulum {
    /// Creates a pendulum with no contacts, unit height, at the origin.
    ///
    /// Call [`set_current`](Self::set_current) before querying it.
    #[must_use]
    pub fn new(config: PendulumConfig) -> Self {
        Self {
            config,
            pos: Vector2::zeros(),
            height: 1.0,
            ee_load: EndeffectorLoads::new(),
            ee_pos: EndeffectorPositions::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PendulumConfig {
        &self.config
    }

    /// Replaces the CoM position and all contact loads and positions.
    ///
    /// # Panics
    ///
    /// Panics if the CoM height `com_pos.z` is not positive.
    pub fn set_current(
        &mut self,
        com_pos: &Vector3<f64>,
        ee_load: EndeffectorLoads,
        ee_pos: EndeffectorPositions,
    ) {
        assert!(com_pos.z > 0.0, "CoM height must be positive, got {}", com_pos.z);

        self.pos = com_pos.xy();
        self.height = com_pos.z;
        self.ee_load = ee_load;
        self.ee_pos = ee_pos;
        trace!(height = self.height, contacts = self.ee_load.len(), "pendulum state set");
    }

    /// Horizontal CoM acceleration.
    #[must_use]
    pub fn acceleration(&self) -> Vector2<f64> {
        self.g_over_h() * (self.pos - self.calculate_cop())
    }

    /// Jacobian of the acceleration along `dim` at `t` with respect to the
    /// coefficients of `motion`.
    ///
    /// Assumes `motion` is the base motion whose position this pendulum was
    /// last set to.
    #[must_use]
    pub fn jacobian_of_acc_wrt_base<M>(&self, motion: &M, t: f64, dim: Coords2D) -> JacobianRow
    where
        M: BaseMotion + ?Sized,
    {
        motion.jacobian(t, MotionDerivative::Pos, dim) * self.g_over_h()
    }

    /// Derivative of the acceleration along `dim` with respect to the load
    /// of `ee`.
    ///
    /// # Panics
    ///
    /// Panics if the total load is not positive or `ee` is unknown.
    #[must_use]
    pub fn derivative_of_acc_wrt_load(&self, ee: EndeffectorId, dim: Coords2D) -> f64 {
        -self.g_over_h() * self.derivative_of_cop_wrt_load(ee)[dim.index()]
    }

    /// Derivative of the acceleration along either planar axis with respect
    /// to the position of `ee` along the same axis.
    ///
    /// # Panics
    ///
    /// Panics if the total load is not positive or `ee` is unknown.
    #[must_use]
    pub fn derivative_of_acc_wrt_ee_pos(&self, ee: EndeffectorId) -> f64 {
        -self.g_over_h() * self.derivative_of_cop_wrt_ee_pos(ee)
    }

    /// # Panics
    ///
    /// Panics if the total load is not positive or `ee` is unknown.
    #[must_use]
    pub fn derivative_of_cop_wrt_load(&self, ee: EndeffectorId) -> Vector2<f64> {
        let p = self.ee_pos.at(ee).xy();
        (p - self.calculate_cop()) / self.load_sum()
    }

    /// # Panics
    ///
    /// Panics if the total load is not positive or `ee` is unknown.
    #[must_use]
    pub fn derivative_of_cop_wrt_ee_pos(&self, ee: EndeffectorId) -> f64 {
        self.ee_load.at(ee) / self.load_sum()
    }

    /// Center of pressure of the current contacts.
    ///
    /// # Panics
    ///
    /// Panics if the total load is not positive, or if an endeffector with a
    /// position carries no load.
    #[must_use]
    pub fn calculate_cop(&self) -> Vector2<f64> {
        let sum = self.load_sum();
        self.ee_pos.iter().fold(Vector2::zeros(), |cop, (ee, pos)| {
            cop + self.ee_load.at(ee) / sum * pos.xy()
        })
    }

    /// Total load over all endeffectors.
    ///
    /// # Panics
    ///
    /// Panics if the sum is not positive.
    #[must_use]
    pub fn load_sum(&self) -> f64 {
        let sum: f64 = self.ee_load.values().sum();
        assert!(sum > 0.0, "total contact load must be positive, got {sum}");
        sum
    }

    fn g_over_h(&self) -> f64 {
        self.config.gravity() / self.height
    }
}
