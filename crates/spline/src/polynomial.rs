//! Single-dimension polynomial segments.
//!
//! A polynomial of order `n` evaluates
//!
//! ```text
//! x(t) = A + B·t + C·t² + D·t³ + E·t⁴ + F·t⁵
//! ```
//!
//! truncated to its first `n + 1` coefficients, where `t` is the time since
//! the segment started. Because `x` is linear in the coefficients, the
//! derivative of any motion derivative with respect to one coefficient only
//! depends on `t`.

use std::fmt;

use strider_core::{MotionDerivative, StateLin1d};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies one coefficient of a polynomial, lowest power first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolynomialCoeff {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl PolynomialCoeff {
    pub const ALL: [Self; 6] = [Self::A, Self::B, Self::C, Self::D, Self::E, Self::F];

    /// The power of `t` this coefficient multiplies.
    #[must_use]
    pub const fn power(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
            Self::E => 4,
            Self::F => 5,
        }
    }
}

/// A polynomial segment with a fixed number of coefficients.
pub trait Polynomial: Clone + Default + fmt::Debug {
    /// Number of coefficients, fixed by the polynomial order.
    const COEFF_COUNT: usize;

    /// Coefficients, lowest power first.
    fn coeffs(&self) -> &[f64];

    fn coeffs_mut(&mut self) -> &mut [f64];

    /// Fits the coefficients so the curve passes through `start` at `t = 0`
    /// and `end` at `t = duration`.
    ///
    /// Only as many derivatives as the order can satisfy are matched; the
    /// rest of each state is ignored.
    fn set_boundary(&mut self, duration: f64, start: StateLin1d, end: StateLin1d);

    /// The coefficients this polynomial type uses, lowest power first.
    fn coeff_ids() -> impl Iterator<Item = PolynomialCoeff> {
        PolynomialCoeff::ALL.into_iter().take(Self::COEFF_COUNT)
    }

    /// # Panics
    ///
    /// Panics if `coeff` is not used by this polynomial type.
    fn coeff(&self, coeff: PolynomialCoeff) -> f64 {
        self.coeffs()[coeff.power()]
    }

    /// # Panics
    ///
    /// Panics if `coeff` is not used by this polynomial type.
    fn set_coeff(&mut self, coeff: PolynomialCoeff, value: f64) {
        self.coeffs_mut()[coeff.power()] = value;
    }

    /// Evaluates derivative `dxdt` at local time `t`.
    fn evaluate(&self, dxdt: MotionDerivative, t: f64) -> f64 {
        Self::coeff_ids()
            .map(|c| self.coeff(c) * Self::derivative_wrt_coeff(dxdt, c, t))
            .sum()
    }

    /// Partial derivative of `dxdt` at local time `t` with respect to
    /// coefficient `coeff`.
    fn derivative_wrt_coeff(dxdt: MotionDerivative, coeff: PolynomialCoeff, t: f64) -> f64 {
        let power = coeff.power();
        let order = dxdt.order();
        if power < order {
            return 0.0;
        }
        let scale: usize = (power - order + 1..=power).product();
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let exponent = (power - order) as i32;
        scale as f64 * t.powi(exponent)
    }

    /// Position, velocity, acceleration, and jerk at local time `t`.
    fn state(&self, t: f64) -> StateLin1d {
        StateLin1d {
            p: self.evaluate(MotionDerivative::Pos, t),
            v: self.evaluate(MotionDerivative::Vel, t),
            a: self.evaluate(MotionDerivative::Acc, t),
            j: self.evaluate(MotionDerivative::Jerk, t),
        }
    }
}

/// `x(t) = A + B·t`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearPolynomial {
    coeffs: [f64; 2],
}

impl Polynomial for LinearPolynomial {
    const COEFF_COUNT: usize = 2;

    fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    fn coeffs_mut(&mut self) -> &mut [f64] {
        &mut self.coeffs
    }

    /// Matches position only.
    fn set_boundary(&mut self, duration: f64, start: StateLin1d, end: StateLin1d) {
        self.coeffs = [start.p, (end.p - start.p) / duration];
    }
}

/// `x(t) = A + B·t + C·t² + D·t³`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicPolynomial {
    coeffs: [f64; 4],
}

impl Polynomial for CubicPolynomial {
    const COEFF_COUNT: usize = 4;

    fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    fn coeffs_mut(&mut self) -> &mut [f64] {
        &mut self.coeffs
    }

    /// Matches position and velocity (Hermite interpolation).
    fn set_boundary(&mut self, duration: f64, start: StateLin1d, end: StateLin1d) {
        let t = duration;
        let dp = end.p - start.p;
        self.coeffs = [
            start.p,
            start.v,
            (3.0 * dp - (2.0 * start.v + end.v) * t) / t.powi(2),
            (-2.0 * dp + (start.v + end.v) * t) / t.powi(3),
        ];
    }
}

/// `x(t) = A + B·t + C·t² + D·t³ + E·t⁴ + F·t⁵`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuinticPolynomial {
    coeffs: [f64; 6],
}

impl Polynomial for QuinticPolynomial {
    const COEFF_COUNT: usize = 6;

    fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    fn coeffs_mut(&mut self) -> &mut [f64] {
        &mut self.coeffs
    }

    /// Matches position, velocity, and acceleration.
    fn set_boundary(&mut self, duration: f64, start: StateLin1d, end: StateLin1d) {
        let t = duration;
        let dp = end.p - start.p;
        let (v0, v1) = (start.v, end.v);
        let (a0, a1) = (start.a, end.a);
        self.coeffs = [
            start.p,
            v0,
            0.5 * a0,
            (20.0 * dp - (8.0 * v1 + 12.0 * v0) * t - (3.0 * a0 - a1) * t.powi(2))
                / (2.0 * t.powi(3)),
            (-30.0 * dp + (14.0 * v1 + 16.0 * v0) * t + (3.0 * a0 - 2.0 * a1) * t.powi(2))
                / (2.0 * t.powi(4)),
            (12.0 * dp - 6.0 * (v1 + v0) * t - (a0 - a1) * t.powi(2)) / (2.0 * t.powi(5)),
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn cubic(coeffs: [f64; 4]) -> CubicPolynomial {
        let mut poly = CubicPolynomial::default();
        poly.coeffs_mut().copy_from_slice(&coeffs);
        poly
    }

    #[test]
    fn evaluates_all_derivatives() {
        // x = 1 + 2t + 3t² + 4t³
        let poly = cubic([1.0, 2.0, 3.0, 4.0]);
        let t = 0.5;

        let state = poly.state(t);
        assert_relative_eq!(state.p, 1.0 + 1.0 + 0.75 + 0.5);
        assert_relative_eq!(state.v, 2.0 + 6.0 * t + 12.0 * t * t);
        assert_relative_eq!(state.a, 6.0 + 24.0 * t);
        assert_relative_eq!(state.j, 24.0);
    }

    #[test]
    fn coefficient_partials_match_finite_differences() {
        let base = cubic([0.3, -1.2, 0.7, 2.5]);
        let t = 0.37;
        let eps = 1e-6;

        for dxdt in MotionDerivative::ALL {
            for c in CubicPolynomial::coeff_ids() {
                let mut perturbed = base;
                perturbed.set_coeff(c, base.coeff(c) + eps);
                let numeric = (perturbed.evaluate(dxdt, t) - base.evaluate(dxdt, t)) / eps;
                let analytic = CubicPolynomial::derivative_wrt_coeff(dxdt, c, t);
                assert_relative_eq!(numeric, analytic, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn partials_vanish_below_derivative_order() {
        let acc = MotionDerivative::Acc;
        assert_eq!(QuinticPolynomial::derivative_wrt_coeff(acc, PolynomialCoeff::B, 1.3), 0.0);
        assert_relative_eq!(
            QuinticPolynomial::derivative_wrt_coeff(acc, PolynomialCoeff::C, 1.3),
            2.0
        );
        assert_relative_eq!(
            QuinticPolynomial::derivative_wrt_coeff(acc, PolynomialCoeff::F, 2.0),
            20.0 * 8.0
        );
    }

    #[test]
    fn coefficient_count_is_fixed_by_type() {
        assert_eq!(LinearPolynomial::coeff_ids().count(), 2);
        assert_eq!(CubicPolynomial::default().coeffs().len(), 4);
        assert_eq!(
            QuinticPolynomial::coeff_ids().last(),
            Some(PolynomialCoeff::F)
        );
    }

    #[test]
    #[should_panic]
    fn cubic_has_no_quintic_coefficient() {
        let _ = CubicPolynomial::default().coeff(PolynomialCoeff::E);
    }

    #[test]
    fn linear_boundary_interpolates_position() {
        let mut poly = LinearPolynomial::default();
        poly.set_boundary(2.0, StateLin1d::new(1.0, 0.0, 0.0), StateLin1d::new(3.0, 0.0, 0.0));

        assert_relative_eq!(poly.evaluate(MotionDerivative::Pos, 1.0), 2.0);
        assert_relative_eq!(poly.evaluate(MotionDerivative::Vel, 0.3), 1.0);
    }

    #[test]
    fn cubic_boundary_matches_position_and_velocity() {
        let start = StateLin1d::new(0.2, -0.5, 0.0);
        let end = StateLin1d::new(1.1, 0.8, 0.0);
        let mut poly = CubicPolynomial::default();
        poly.set_boundary(0.6, start, end);

        assert_relative_eq!(poly.state(0.0).p, start.p, epsilon = 1e-12);
        assert_relative_eq!(poly.state(0.0).v, start.v, epsilon = 1e-12);
        assert_relative_eq!(poly.state(0.6).p, end.p, epsilon = 1e-12);
        assert_relative_eq!(poly.state(0.6).v, end.v, epsilon = 1e-12);
    }

    #[test]
    fn quintic_boundary_matches_up_to_acceleration() {
        let start = StateLin1d::new(0.0, 0.3, -1.0);
        let end = StateLin1d::new(0.5, -0.2, 2.0);
        let mut poly = QuinticPolynomial::default();
        poly.set_boundary(0.8, start, end);

        let s0 = poly.state(0.0);
        let s1 = poly.state(0.8);
        for (got, want) in [
            (s0.p, start.p),
            (s0.v, start.v),
            (s0.a, start.a),
            (s1.p, end.p),
            (s1.v, end.v),
            (s1.a, end.a),
        ] {
            assert_relative_eq!(got, want, epsilon = 1e-10);
        }
    }
}
