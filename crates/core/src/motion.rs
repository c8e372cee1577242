//! Motion vocabulary shared by splines, dynamics models, and constraints.

use nalgebra::SVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::JacobianRow;

/// Which time derivative of a motion is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionDerivative {
    Pos,
    Vel,
    Acc,
    Jerk,
}

impl MotionDerivative {
    /// All derivatives, lowest order first.
    pub const ALL: [Self; 4] = [Self::Pos, Self::Vel, Self::Acc, Self::Jerk];

    /// Returns how many times position is differentiated (0 for position).
    #[must_use]
    pub const fn order(self) -> usize {
        match self {
            Self::Pos => 0,
            Self::Vel => 1,
            Self::Acc => 2,
            Self::Jerk => 3,
        }
    }
}

/// Planar coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Coords2D {
    X,
    Y,
}

impl Coords2D {
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// Row index of this axis in a planar vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

/// Spatial coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Coords3D {
    X,
    Y,
    Z,
}

impl Coords3D {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Row index of this axis in a spatial vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl From<Coords2D> for Coords3D {
    fn from(dim: Coords2D) -> Self {
        match dim {
            Coords2D::X => Self::X,
            Coords2D::Y => Self::Y,
        }
    }
}

/// Position, velocity, acceleration, and jerk of a scalar motion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateLin1d {
    pub p: f64,
    pub v: f64,
    pub a: f64,
    pub j: f64,
}

impl StateLin1d {
    /// Creates a state with zero jerk.
    #[must_use]
    pub const fn new(p: f64, v: f64, a: f64) -> Self {
        Self { p, v, a, j: 0.0 }
    }

    /// Returns the requested derivative.
    #[must_use]
    pub const fn get(&self, dxdt: MotionDerivative) -> f64 {
        match dxdt {
            MotionDerivative::Pos => self.p,
            MotionDerivative::Vel => self.v,
            MotionDerivative::Acc => self.a,
            MotionDerivative::Jerk => self.j,
        }
    }
}

/// Position, velocity, acceleration, and jerk of an `N`-dimensional motion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateLin<const N: usize> {
    pub p: SVector<f64, N>,
    pub v: SVector<f64, N>,
    pub a: SVector<f64, N>,
    pub j: SVector<f64, N>,
}

pub type StateLin2d = StateLin<2>;
pub type StateLin3d = StateLin<3>;

impl<const N: usize> StateLin<N> {
    /// Returns a state at rest at the origin.
    #[must_use]
    pub fn zeros() -> Self {
        Self {
            p: SVector::zeros(),
            v: SVector::zeros(),
            a: SVector::zeros(),
            j: SVector::zeros(),
        }
    }

    /// Returns the requested derivative.
    #[must_use]
    pub fn get(&self, dxdt: MotionDerivative) -> SVector<f64, N> {
        match dxdt {
            MotionDerivative::Pos => self.p,
            MotionDerivative::Vel => self.v,
            MotionDerivative::Acc => self.a,
            MotionDerivative::Jerk => self.j,
        }
    }

    /// Returns the scalar state along row `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    #[must_use]
    pub fn dim(&self, dim: usize) -> StateLin1d {
        StateLin1d {
            p: self.p[dim],
            v: self.v[dim],
            a: self.a[dim],
            j: self.j[dim],
        }
    }

    /// Overwrites row `dim` with a scalar state.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    pub fn set_dim(&mut self, dim: usize, state: StateLin1d) {
        self.p[dim] = state.p;
        self.v[dim] = state.v;
        self.a[dim] = state.a;
        self.j[dim] = state.j;
    }
}

impl<const N: usize> Default for StateLin<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

/// A motion driven by optimization coefficients.
///
/// Implementors map a global time to a spatial state and report how each
/// planar derivative depends on their coefficients. Dynamics models consume
/// motions only through this trait.
pub trait BaseMotion {
    /// Total duration covered by the motion, in seconds.
    fn total_time(&self) -> f64;

    /// Returns the state at global time `t_global`.
    fn com(&self, t_global: f64) -> StateLin3d;

    /// Returns the Jacobian of derivative `dxdt` along `dim` at `t_global`
    /// with respect to every coefficient of the motion.
    fn jacobian(&self, t_global: f64, dxdt: MotionDerivative, dim: Coords2D) -> JacobianRow;
}
