//! The center-of-mass spline.
//!
//! # Coefficient layout
//!
//! All coefficients are flattened into one vector, segment by segment, then
//! dimension by dimension, then lowest power first:
//!
//! ```text
//! index(id, dim, coeff) = id · (2 · COEFF_COUNT) + dim · COEFF_COUNT + power(coeff)
//! ```
//!
//! The same index is used to read values from and write Jacobian entries
//! into the global vector.
//!
//! # Segment lookup
//!
//! A global time exactly on a boundary belongs to the segment that starts
//! there. The end of the horizon belongs to the last segment.
//!
//! Continuity between segments is not enforced by the spline; callers add
//! junction constraints when they need it.


use nalgebra::DVector;
use tracing::debug;

use strider_core::{
    BaseMotion, Coords2D, JacobianRow, LinearApprox, MotionDerivative, StateLin2d, StateLin3d,
    VariableComponent, VariableError,
};

use crate::{
    CubicPolynomial, LocalTime, Polynomial, PolynomialCoeff, PolynomialId, PolynomialXd,
    SegmentDuration, SplineConfig, SplineError,
};

/// Relative slack when splitting a horizon into segments, so a horizon that
/// is an exact multiple of the segment duration does not gain a sliver.
const SPLIT_TOLERANCE: f64 = 1e-9;

/// Number of planar dimensions each segment carries.
const DIMS: usize = 2;

/// The CoM motion as a sequence of planar polynomial segments.
#[derive(Debug, Clone)]
pub struct ComSpline<P = CubicPolynomial> {
    name: String,
    polynomials: Vec<PolynomialXd<P, DIMS>>,
    config: SplineConfig,
}

impl<P: Polynomial> ComSpline<P> {
    /// Creates an empty spline mirroring variable set `name`.
    ///
    /// Call [`init`](Self::init) before querying it.
    pub fn new(name: impl Into<String>, config: SplineConfig) -> Self {
        Self {
            name: name.into(),
            polynomials: Vec::new(),
            config,
        }
    }

    /// Rebuilds the segments to cover `horizon` seconds.
    ///
    /// Every segment lasts `duration_per_polynomial` seconds except the last,
    /// which covers the remainder. All coefficients are reset to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if either time is not finite and positive.
    pub fn init(&mut self, horizon: f64, duration_per_polynomial: f64) -> Result<(), SplineError> {
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(SplineError::InvalidHorizon(horizon));
        }
        let duration = SegmentDuration::from_seconds(duration_per_polynomial)?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = ((horizon / duration_per_polynomial - SPLIT_TOLERANCE).ceil() as usize).max(1);

        self.polynomials.clear();
        let mut t_left = horizon;
        for i in 0..count {
            let segment = if i + 1 == count {
                SegmentDuration::from_seconds(t_left)?
            } else {
                duration
            };
            self.polynomials.push(PolynomialXd::new(segment));
            t_left -= duration_per_polynomial;
        }

        debug!(
            name = %self.name,
            segments = count,
            horizon,
            "initialized CoM spline"
        );
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> &SplineConfig {
        &self.config
    }

    #[must_use]
    pub fn polynomials(&self) -> &[PolynomialXd<P, DIMS>] {
        &self.polynomials
    }

    /// # Panics
    ///
    /// Panics if `id` is not a segment of this spline.
    pub fn polynomial_mut(&mut self, id: PolynomialId) -> &mut PolynomialXd<P, DIMS> {
        &mut self.polynomials[id.0]
    }

    #[must_use]
    pub fn polynomial_count(&self) -> usize {
        self.polynomials.len()
    }

    /// Length of the flat coefficient vector.
    #[must_use]
    pub fn coefficient_count(&self) -> usize {
        self.polynomials.len() * Self::free_coeff_per_polynomial()
    }

    /// Sum of all segment durations.
    #[must_use]
    pub fn total_time(&self) -> f64 {
        self.polynomials.iter().map(|p| p.duration().seconds()).sum()
    }

    /// Global time at which segment `id` starts.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a segment of this spline.
    #[must_use]
    pub fn segment_start(&self, id: PolynomialId) -> f64 {
        assert!(id.0 < self.polynomials.len(), "{id} outside spline");
        self.polynomials[..id.0]
            .iter()
            .map(|p| p.duration().seconds())
            .sum()
    }

    /// Position of a coefficient within the flat coefficient vector.
    ///
    /// # Panics
    ///
    /// Panics if `coeff` is not used by `P`.
    #[must_use]
    pub fn index(&self, id: PolynomialId, dim: Coords2D, coeff: PolynomialCoeff) -> usize {
        assert!(
            coeff.power() < P::COEFF_COUNT,
            "{coeff:?} not used by this polynomial type"
        );
        id.0 * Self::free_coeff_per_polynomial() + dim.index() * P::COEFF_COUNT + coeff.power()
    }

    /// Flattens all coefficients into one vector.
    #[must_use]
    pub fn values(&self) -> DVector<f64> {
        let mut x = DVector::zeros(self.coefficient_count());
        for (i, poly) in self.polynomials.iter().enumerate() {
            for dim in Coords2D::ALL {
                for coeff in P::coeff_ids() {
                    x[self.index(PolynomialId(i), dim, coeff)] = poly.coeff(dim.index(), coeff);
                }
            }
        }
        x
    }

    /// Overwrites all coefficients from a flat vector.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::CoefficientCount`] if the length does not match
    /// [`coefficient_count`](Self::coefficient_count).
    pub fn set_values(&mut self, optimized_coeff: &DVector<f64>) -> Result<(), SplineError> {
        let expected = self.coefficient_count();
        if optimized_coeff.len() != expected {
            return Err(SplineError::CoefficientCount {
                expected,
                got: optimized_coeff.len(),
            });
        }

        self.write_coeffs(optimized_coeff);
        Ok(())
    }

    /// Finds the segment active at `t_global` and the time since it started.
    ///
    /// # Panics
    ///
    /// Panics if the spline has no segments.
    #[must_use]
    pub fn segment_at(&self, t_global: f64) -> (PolynomialId, LocalTime) {
        assert!(!self.polynomials.is_empty(), "CoM spline has no polynomials");
        debug_assert!(
            t_global <= self.total_time() + SPLIT_TOLERANCE,
            "t = {t_global} s beyond spline horizon"
        );

        let mut t_start = 0.0;
        for (i, poly) in self.polynomials.iter().enumerate() {
            let t_end = t_start + poly.duration().seconds();
            if t_global < t_end {
                return (PolynomialId(i), LocalTime(t_global - t_start));
            }
            t_start = t_end;
        }

        let last = self.polynomials.len() - 1;
        let t_last = t_start - self.polynomials[last].duration().seconds();
        (PolynomialId(last), LocalTime(t_global - t_last))
    }

    /// Planar state at `t_global`.
    #[must_use]
    pub fn point(&self, t_global: f64) -> StateLin2d {
        let (id, t_local) = self.segment_at(t_global);
        self.polynomials[id.0].point(t_local)
    }

    /// CoM state at `t_global`, at the configured constant height.
    #[must_use]
    pub fn com(&self, t_global: f64) -> StateLin3d {
        let planar = self.point(t_global);

        let mut com = StateLin3d::zeros();
        com.p.fixed_rows_mut::<2>(0).copy_from(&planar.p);
        com.v.fixed_rows_mut::<2>(0).copy_from(&planar.v);
        com.a.fixed_rows_mut::<2>(0).copy_from(&planar.a);
        com.j.fixed_rows_mut::<2>(0).copy_from(&planar.j);
        com.p.z = self.config.com_height();
        com
    }

    /// Linearizes derivative `dxdt` along `dim` at `t_global` around the
    /// current coefficients `u*`:
    ///
    /// ```text
    /// x(u) ≈ J(u*)·(u − u*) + x(u*)
    /// ```
    #[must_use]
    pub fn linear_approx_wrt_coeff(
        &self,
        t_global: f64,
        dxdt: MotionDerivative,
        dim: Coords2D,
    ) -> LinearApprox {
        LinearApprox {
            jacobian: self.jacobian(t_global, dxdt, dim),
            offset: self.point(t_global).get(dxdt)[dim.index()],
        }
    }

    /// Jacobian of derivative `dxdt` along `dim` at local time `t_poly` of
    /// segment `id`, with respect to all spline coefficients.
    ///
    /// The row stores an entry for every coefficient of segment `id` along
    /// `dim`, including those whose partial is zero, and nothing else.
    /// Junction constraints use this to compare the end of one segment with
    /// the start of the next.
    ///
    /// Local time comes before the segment id:
    ///
    /// ```
    /// use strider_core::{Coords2D, MotionDerivative};
    /// use strider_spline::{ComSpline, LocalTime, PolynomialId, SplineConfig};
    ///
    /// let mut spline: ComSpline = ComSpline::new("com", SplineConfig::default());
    /// spline.init(1.0, 0.5).unwrap();
    /// let row = spline.jacobian_wrt_coeff_at_polynomial(
    ///     MotionDerivative::Pos,
    ///     LocalTime(0.25),
    ///     PolynomialId(1),
    ///     Coords2D::X,
    /// );
    /// assert_eq!(row.nnz(), 4);
    /// ```
    ///
    /// Swapping the two does not compile:
    ///
    /// ```compile_fail
    /// use strider_core::{Coords2D, MotionDerivative};
    /// use strider_spline::{ComSpline, LocalTime, PolynomialId, SplineConfig};
    ///
    /// let mut spline: ComSpline = ComSpline::new("com", SplineConfig::default());
    /// spline.init(1.0, 0.5).unwrap();
    /// let row = spline.jacobian_wrt_coeff_at_polynomial(
    ///     MotionDerivative::Pos,
    ///     PolynomialId(1),
    ///     LocalTime(0.25),
    ///     Coords2D::X,
    /// );
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a segment of this spline.
    #[must_use]
    pub fn jacobian_wrt_coeff_at_polynomial(
        &self,
        dxdt: MotionDerivative,
        t_poly: LocalTime,
        id: PolynomialId,
        dim: Coords2D,
    ) -> JacobianRow {
        assert!(id.0 < self.polynomials.len(), "{id} outside spline");

        let mut jac = JacobianRow::zeros(self.coefficient_count());
        for coeff in P::coeff_ids() {
            let partial = PolynomialXd::<P, DIMS>::derivative_wrt_coeff(dxdt, coeff, t_poly);
            jac.insert(self.index(id, dim, coeff), partial);
        }
        jac
    }

    /// Jacobian of derivative `dxdt` along `dim` at `t_global`.
    #[must_use]
    pub fn jacobian(&self, t_global: f64, dxdt: MotionDerivative, dim: Coords2D) -> JacobianRow {
        let (id, t_local) = self.segment_at(t_global);
        self.jacobian_wrt_coeff_at_polynomial(dxdt, t_local, id, dim)
    }

    fn write_coeffs(&mut self, optimized_coeff: &DVector<f64>) {
        for i in 0..self.polynomials.len() {
            for dim in Coords2D::ALL {
                for coeff in P::coeff_ids() {
                    let value = optimized_coeff[self.index(PolynomialId(i), dim, coeff)];
                    self.polynomials[i].set_coeff(dim.index(), coeff, value);
                }
            }
        }
    }

    fn free_coeff_per_polynomial() -> usize {
        DIMS * P::COEFF_COUNT
    }
}

impl<P: Polynomial> BaseMotion for ComSpline<P> {
    fn total_time(&self) -> f64 {
        ComSpline::total_time(self)
    }

    fn com(&self, t_global: f64) -> StateLin3d {
        ComSpline::com(self, t_global)
    }

    fn jacobian(&self, t_global: f64, dxdt: MotionDerivative, dim: Coords2D) -> JacobianRow {
        ComSpline::jacobian(self, t_global, dxdt, dim)
    }
}

impl<P: Polynomial> VariableComponent for ComSpline<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> DVector<f64> {
        ComSpline::values(self)
    }

    fn set_values(&mut self, values: &DVector<f64>) -> Result<(), VariableError> {
        let expected = self.coefficient_count();
        if values.len() != expected {
            return Err(VariableError::LengthMismatch {
                id: self.name.clone(),
                expected,
                got: values.len(),
            });
        }
        self.write_coeffs(values);
        Ok(())
    }
}
