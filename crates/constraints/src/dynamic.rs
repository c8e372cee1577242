use nalgebra::DVector;
use tracing::debug;

use strider_core::{
    Bound, ConstraintSet, Coords2D, EndeffectorId, JacobianBlock, MotionDerivative,
    OptimizationVariables, VariableComponent, VariableError,
};
use strider_dynamics::{LinearInvertedPendulum, PendulumConfig};
use strider_spline::{ComSpline, CubicPolynomial, Polynomial};

use crate::{ConstraintError, ContactLoads, DynamicConfig, Footholds, pull};

/// Makes the CoM spline follow the linear inverted pendulum.
///
/// At every sample time `t_k` and each planar dimension:
///
/// ```text
/// a_spline(t_k) − a_lip(t_k) = 0
/// ```
///
/// where the pendulum sits at the spline's CoM position and is supported by
/// the loads of sample `k` at the footholds. Rows are ordered sample by
/// sample, `x` before `y`.
///
/// # Panics
///
/// Evaluating the constraint panics if the loads of any sample sum to zero.
#[derive(Debug, Clone)]
pub struct DynamicConstraint<P = CubicPolynomial> {
    name: String,
    spline: ComSpline<P>,
    loads: ContactLoads,
    footholds: Footholds,
    pendulum: PendulumConfig,
    times: Vec<f64>,
}

impl<P: Polynomial> DynamicConstraint<P> {
    /// Creates a constraint sampled every [`DynamicConfig::dt`] over the
    /// spline horizon.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is not initialized, or if the loads do
    /// not cover every sample and every foothold.
    pub fn new(
        spline: ComSpline<P>,
        loads: ContactLoads,
        footholds: Footholds,
        config: &DynamicConfig,
        pendulum: PendulumConfig,
    ) -> Result<Self, ConstraintError> {
        if spline.polynomial_count() == 0 {
            return Err(ConstraintError::EmptySpline(spline.name().to_owned()));
        }

        let times = config.sample_times(spline.total_time());
        if loads.samples() != times.len() {
            return Err(ConstraintError::Coverage {
                id: loads.name().to_owned(),
                what: "samples",
                expected: times.len(),
                got: loads.samples(),
            });
        }
        if loads.ee_count() != footholds.ee_count() {
            return Err(ConstraintError::Coverage {
                id: loads.name().to_owned(),
                what: "endeffectors",
                expected: footholds.ee_count(),
                got: loads.ee_count(),
            });
        }

        Ok(Self {
            name: format!("dynamic {}", spline.name()),
            spline,
            loads,
            footholds,
            pendulum,
            times,
        })
    }

    /// Sample times in seconds, in row order.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The pendulum at sample `k`.
    fn pendulum_at(&self, k: usize) -> LinearInvertedPendulum {
        let com = self.spline.com(self.times[k]);
        let mut lip = LinearInvertedPendulum::new(self.pendulum);
        lip.set_current(&com.p, self.loads.loads_at(k), self.footholds.positions());
        lip
    }

    fn row(k: usize, dim: Coords2D) -> usize {
        2 * k + dim.index()
    }

    fn ees(&self) -> impl Iterator<Item = EndeffectorId> {
        (0..self.footholds.ee_count()).map(EndeffectorId)
    }
}

impl<P: Polynomial> ConstraintSet for DynamicConstraint<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> usize {
        2 * self.times.len()
    }

    fn values(&self) -> DVector<f64> {
        let mut g = DVector::zeros(self.rows());
        for (k, &t) in self.times.iter().enumerate() {
            let acc_spline = self.spline.com(t).a;
            let acc_lip = self.pendulum_at(k).acceleration();
            for dim in Coords2D::ALL {
                g[Self::row(k, dim)] = acc_spline[dim.index()] - acc_lip[dim.index()];
            }
        }
        g
    }

    fn bounds(&self) -> Vec<Bound> {
        vec![Bound::ZERO; self.rows()]
    }

    fn fill_jacobian_block(&self, var_set: &str, jac: &mut JacobianBlock) {
        let spline_set = var_set == self.spline.name();
        let load_set = var_set == self.loads.name();
        let foothold_set = var_set == self.footholds.name();
        if !(spline_set || load_set || foothold_set) {
            return;
        }

        for (k, &t) in self.times.iter().enumerate() {
            let lip = self.pendulum_at(k);
            for dim in Coords2D::ALL {
                let row = Self::row(k, dim);

                if spline_set {
                    let jac_row = self.spline.jacobian(t, MotionDerivative::Acc, dim)
                        - &lip.jacobian_of_acc_wrt_base(&self.spline, t, dim);
                    jac.add_row(row, &jac_row);
                }
                if load_set {
                    for ee in self.ees() {
                        let col = self.loads.index(k, ee);
                        jac.add(row, col, -lip.derivative_of_acc_wrt_load(ee, dim));
                    }
                }
                if foothold_set {
                    for ee in self.ees() {
                        let col = self.footholds.index(ee, dim);
                        jac.add(row, col, -lip.derivative_of_acc_wrt_ee_pos(ee));
                    }
                }
            }
        }
    }

    fn init_variable_dependent_quantities(
        &mut self,
        variables: &OptimizationVariables,
    ) -> Result<(), VariableError> {
        self.update(variables)?;
        debug!(
            spline = self.spline.name(),
            samples = self.times.len(),
            ees = self.footholds.ee_count(),
            "initialized dynamic constraint"
        );
        Ok(())
    }

    fn update(&mut self, variables: &OptimizationVariables) -> Result<(), VariableError> {
        pull(&mut self.spline, variables)?;
        pull(&mut self.loads, variables)?;
        pull(&mut self.footholds, variables)
    }
}
