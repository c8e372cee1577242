//! Shared fixtures for cross-crate tests.

use nalgebra::{DVector, Vector2, Vector3};
use strider_constraints::{
    ConstraintError, ContactLoads, DynamicConfig, DynamicConstraint, EEMotionNodes, Footholds,
    JunctionConfig, MotionNode, SplineJunctionConstraint, SwingConfig, SwingConstraint,
};
use strider_core::{Problem, VariableComponent};
use strider_dynamics::PendulumConfig;
use strider_spline::{ComSpline, SplineConfig};
use uom::si::{f64::Time, time::second};

pub const SPLINE: &str = "com";
pub const LOADS: &str = "loads";
pub const FOOTHOLDS: &str = "footholds";
pub const SWING_FOOT: &str = "ee1-motion";

/// Settings of a short two-footed walking problem.
#[derive(Debug, Clone)]
pub struct Walk {
    pub horizon: f64,
    pub segment: f64,
    pub dt: f64,
    pub junction: Option<JunctionConfig>,
}

impl Default for Walk {
    fn default() -> Self {
        Self {
            horizon: 1.2,
            segment: 0.4,
            dt: 0.2,
            junction: Some(JunctionConfig::default()),
        }
    }
}

impl Walk {
    /// A spline with smooth, distinct, nonzero coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if the horizon or segment duration is invalid.
    pub fn spline(&self) -> Result<ComSpline, ConstraintError> {
        let mut spline: ComSpline = ComSpline::new(SPLINE, SplineConfig::default());
        spline.init(self.horizon, self.segment)?;

        #[allow(clippy::cast_precision_loss)]
        let x = DVector::from_fn(spline.coefficient_count(), |i, _| {
            0.04 * ((i as f64) * 0.9).sin()
        });
        spline.set_values(&x)?;
        Ok(spline)
    }

    /// Assembles the problem: spline, loads, footholds, and the swing foot's
    /// nodes, constrained by dynamics, swing, and optionally junctions.
    ///
    /// # Errors
    ///
    /// Returns an error if any part does not fit the others.
    pub fn problem(&self) -> Result<Problem, ConstraintError> {
        let spline = self.spline()?;
        let dynamic = DynamicConfig::new(Time::new::<second>(self.dt))?;
        let samples = dynamic.sample_count(spline.total_time());

        let mut loads = ContactLoads::new(LOADS, samples, 2, 0.5);
        #[allow(clippy::cast_precision_loss)]
        let load_values = DVector::from_fn(samples * 2, |i, _| 0.3 + 0.05 * (i % 4) as f64);
        loads.set_values(&load_values)?;

        let footholds = Footholds::new(
            FOOTHOLDS,
            vec![Vector2::new(0.1, 0.12), Vector2::new(-0.05, -0.1)],
        );

        let nodes = EEMotionNodes::new(
            SWING_FOOT,
            (0..6)
                .map(|i| {
                    let s = f64::from(i);
                    MotionNode {
                        pos: Vector3::new(0.06 * s, -0.1 + 0.01 * s * s, 0.02 * s),
                        vel: Vector3::new(0.2, 0.05 * s, 0.0),
                    }
                })
                .collect(),
            vec![true, false, false, false, true, true],
        )?;

        let mut problem = Problem::new();
        problem.add_component(spline.clone())?;
        problem.add_component(loads.clone())?;
        problem.add_component(footholds.clone())?;
        problem.add_component(nodes.clone())?;

        problem.add_constraint(DynamicConstraint::new(
            spline.clone(),
            loads,
            footholds,
            &dynamic,
            PendulumConfig::default(),
        )?)?;
        problem.add_constraint(SwingConstraint::new(&nodes, SwingConfig::default()))?;
        if let Some(junction) = &self.junction {
            problem.add_constraint(SplineJunctionConstraint::new(spline, junction.clone())?)?;
        }
        Ok(problem)
    }
}
