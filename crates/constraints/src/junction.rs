use nalgebra::DVector;
use tracing::debug;

use strider_core::{
    Bound, ConstraintSet, Coords2D, JacobianBlock, JacobianRow, MotionDerivative,
    OptimizationVariables, VariableError,
};
use strider_spline::{ComSpline, CubicPolynomial, LocalTime, Polynomial, PolynomialId};

use crate::{ConstraintError, JunctionConfig, pull};

/// Joins adjacent segments of a CoM spline.
///
/// For every junction between segment `i` and `i + 1`, every configured
/// derivative, and each planar dimension:
///
/// ```text
/// x_i(T_i) − x_{i+1}(0) = 0
/// ```
///
/// Rows are ordered junction by junction, then by derivative, then `x`
/// before `y`.
#[derive(Debug, Clone)]
pub struct SplineJunctionConstraint<P = CubicPolynomial> {
    name: String,
    spline: ComSpline<P>,
    config: JunctionConfig,
}

impl<P: Polynomial> SplineJunctionConstraint<P> {
    /// Creates a constraint over the variable set mirrored by `spline`.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline has not been initialized.
    pub fn new(spline: ComSpline<P>, config: JunctionConfig) -> Result<Self, ConstraintError> {
        if spline.polynomial_count() == 0 {
            return Err(ConstraintError::EmptySpline(spline.name().to_owned()));
        }
        Ok(Self {
            name: format!("junction {}", spline.name()),
            spline,
            config,
        })
    }

    fn junctions(&self) -> usize {
        self.spline.polynomial_count() - 1
    }

    fn row(&self, junction: usize, deriv: usize, dim: Coords2D) -> usize {
        (junction * self.config.derivatives().len() + deriv) * 2 + dim.index()
    }

    /// Jacobian of one row with respect to the spline coefficients.
    fn junction_jacobian(
        &self,
        junction: usize,
        dxdt: MotionDerivative,
        dim: Coords2D,
    ) -> JacobianRow {
        let before = PolynomialId(junction);
        let after = PolynomialId(junction + 1);
        let t_end = LocalTime(self.spline.polynomials()[junction].duration().seconds());

        self.spline
            .jacobian_wrt_coeff_at_polynomial(dxdt, t_end, before, dim)
            - &self
                .spline
                .jacobian_wrt_coeff_at_polynomial(dxdt, LocalTime::START, after, dim)
    }
}

impl<P: Polynomial> ConstraintSet for SplineJunctionConstraint<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> usize {
        self.junctions() * self.config.derivatives().len() * 2
    }

    fn values(&self) -> DVector<f64> {
        let mut g = DVector::zeros(self.rows());
        let polynomials = self.spline.polynomials();

        for i in 0..self.junctions() {
            let t_end = LocalTime(polynomials[i].duration().seconds());
            let end = polynomials[i].point(t_end);
            let start = polynomials[i + 1].point(LocalTime::START);

            for (d, &dxdt) in self.config.derivatives().iter().enumerate() {
                let gap = end.get(dxdt) - start.get(dxdt);
                for dim in Coords2D::ALL {
                    g[self.row(i, d, dim)] = gap[dim.index()];
                }
            }
        }
        g
    }

    fn bounds(&self) -> Vec<Bound> {
        vec![Bound::ZERO; self.rows()]
    }

    fn fill_jacobian_block(&self, var_set: &str, jac: &mut JacobianBlock) {
        if var_set != self.spline.name() {
            return;
        }

        for i in 0..self.junctions() {
            for (d, &dxdt) in self.config.derivatives().iter().enumerate() {
                for dim in Coords2D::ALL {
                    jac.add_row(self.row(i, d, dim), &self.junction_jacobian(i, dxdt, dim));
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
            junctions = self.junctions(),
            rows = self.rows(),
            "initialized junction constraint"
        );
        Ok(())
    }

    fn update(&mut self, variables: &OptimizationVariables) -> Result<(), VariableError> {
        pull(&mut self.spline, variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, Vector2};
    use strider_core::StateLin2d;
    use strider_spline::{PolynomialCoeff, SplineConfig};

    fn spline() -> ComSpline {
        let mut spline = ComSpline::new("com", SplineConfig::default());
        spline.init(1.5, 0.5).unwrap();
        spline
    }

    fn variables(spline: &ComSpline) -> OptimizationVariables {
        let mut variables = OptimizationVariables::new();
        variables
            .add_variable_set(spline.name(), spline.values(), Bound::NO_BOUND)
            .unwrap();
        variables
    }

    #[test]
    fn rejects_uninitialized_spline() {
        let empty = ComSpline::<CubicPolynomial>::new("com", SplineConfig::default());
        let err = SplineJunctionConstraint::new(empty, JunctionConfig::default()).unwrap_err();
        assert_eq!(err, ConstraintError::EmptySpline("com".into()));
    }

    #[test]
    fn gaps_between_segments_are_reported() {
        let mut spline = spline();
        spline
            .polynomial_mut(PolynomialId(1))
            .set_coeff(0, PolynomialCoeff::A, 0.4);
        let variables = variables(&spline);

        let mut junction =
            SplineJunctionConstraint::new(spline, JunctionConfig::default()).unwrap();
        junction.init_variable_dependent_quantities(&variables).unwrap();

        assert_eq!(junction.rows(), 2 * 2 * 2);
        let g = junction.values();
        // segment 1 sits 0.4 above both of its neighbors
        assert_relative_eq!(g[0], -0.4);
        assert_relative_eq!(g[4], 0.4);
        assert_eq!(g.iter().filter(|v| **v != 0.0).count(), 2);
    }

    #[test]
    fn continuous_fit_satisfies_constraint() {
        let mut spline = spline();
        let states: Vec<StateLin2d> = [(0.0, 0.1), (0.2, 0.3), (0.35, 0.1), (0.4, 0.0)]
            .iter()
            .map(|&(p, v)| {
                let mut state = StateLin2d::zeros();
                state.p = Vector2::new(p, -p);
                state.v = Vector2::new(v, 0.5 * v);
                state
            })
            .collect();
        for (i, pair) in states.windows(2).enumerate() {
            spline
                .polynomial_mut(PolynomialId(i))
                .set_boundary(&pair[0], &pair[1]);
        }
        let variables = variables(&spline);

        let mut junction =
            SplineJunctionConstraint::new(spline, JunctionConfig::default()).unwrap();
        junction.init_variable_dependent_quantities(&variables).unwrap();

        for g in junction.values().iter() {
            assert_relative_eq!(*g, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn jacobian_is_exact_for_linear_rows() {
        let spline = spline();
        #[allow(clippy::cast_precision_loss)]
        let x = DVector::from_fn(spline.coefficient_count(), |i, _| (i as f64 * 0.7).sin());
        let mut variables = variables(&spline);
        variables.set_variables("com", &x).unwrap();

        let config = JunctionConfig::new([MotionDerivative::Pos, MotionDerivative::Acc]).unwrap();
        let mut junction = SplineJunctionConstraint::new(spline, config).unwrap();
        junction.init_variable_dependent_quantities(&variables).unwrap();

        let mut block = JacobianBlock::zeros(junction.rows(), x.len());
        junction.fill_jacobian_block("com", &mut block);
        let jac: DMatrix<f64> = block.to_dense();

        assert_relative_eq!(&jac * &x, junction.values(), epsilon = 1e-12);

        let mut untouched = JacobianBlock::zeros(junction.rows(), 4);
        junction.fill_jacobian_block("loads", &mut untouched);
        assert_eq!(untouched.nnz(), 0);
    }
}
