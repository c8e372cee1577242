use strider_core::{MotionDerivative, StateLin};

use crate::{LocalTime, Polynomial, PolynomialCoeff, SegmentDuration};

/// One polynomial per dimension, all of the same type and sharing one
/// duration.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialXd<P, const N: usize> {
    dims: [P; N],
    duration: SegmentDuration,
}

impl<P: Polynomial, const N: usize> PolynomialXd<P, N> {
    /// Creates a segment with all coefficients zero.
    #[must_use]
    pub fn new(duration: SegmentDuration) -> Self {
        Self {
            dims: std::array::from_fn(|_| P::default()),
            duration,
        }
    }

    #[must_use]
    pub fn duration(&self) -> SegmentDuration {
        self.duration
    }

    /// The polynomial along dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    #[must_use]
    pub fn dim(&self, dim: usize) -> &P {
        &self.dims[dim]
    }

    /// # Panics
    ///
    /// Panics if `dim >= N`.
    pub fn dim_mut(&mut self, dim: usize) -> &mut P {
        &mut self.dims[dim]
    }

    /// # Panics
    ///
    /// Panics if `dim >= N` or `coeff` is not used by `P`.
    #[must_use]
    pub fn coeff(&self, dim: usize, coeff: PolynomialCoeff) -> f64 {
        self.dims[dim].coeff(coeff)
    }

    /// # Panics
    ///
    /// Panics if `dim >= N` or `coeff` is not used by `P`.
    pub fn set_coeff(&mut self, dim: usize, coeff: PolynomialCoeff, value: f64) {
        self.dims[dim].set_coeff(coeff, value);
    }

    /// State of every dimension at local time `t`.
    #[must_use]
    pub fn point(&self, t: LocalTime) -> StateLin<N> {
        let mut state = StateLin::zeros();
        for (i, poly) in self.dims.iter().enumerate() {
            state.set_dim(i, poly.state(t.seconds()));
        }
        state
    }

    /// Fits every dimension between two states over the segment duration.
    pub fn set_boundary(&mut self, start: &StateLin<N>, end: &StateLin<N>) {
        let duration = self.duration.seconds();
        for (i, poly) in self.dims.iter_mut().enumerate() {
            poly.set_boundary(duration, start.dim(i), end.dim(i));
        }
    }

    /// Partial derivative of `dxdt` at `t` with respect to one coefficient of
    /// any dimension; every dimension shares the same basis.
    #[must_use]
    pub fn derivative_wrt_coeff(
        dxdt: MotionDerivative,
        coeff: PolynomialCoeff,
        t: LocalTime,
    ) -> f64 {
        P::derivative_wrt_coeff(dxdt, coeff, t.seconds())
    }
}
