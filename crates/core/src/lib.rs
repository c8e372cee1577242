//! Core traits and types for Strider.
//!
//! This crate defines the shared abstractions that splines, dynamics models,
//! and constraints build on:
//!
//! - [`MotionDerivative`], [`Coords2D`], [`StateLin`]: motion vocabulary
//! - [`BaseMotion`]: a motion that can be queried for state and coefficient
//!   Jacobians at any global time
//! - [`JacobianRow`], [`JacobianBlock`], [`LinearApprox`]: sparse derivatives
//! - [`EndeffectorMap`]: per-contact values iterated in a canonical order
//! - [`OptimizationVariables`]: the store of named variable sets
//! - [`VariableComponent`], [`ConstraintSet`], [`Problem`]: the consumers the
//!   solver drives after every iterate

mod endeffectors;
mod jacobian;
mod motion;
mod problem;
mod variables;

pub use endeffectors::{EndeffectorId, EndeffectorLoads, EndeffectorMap, EndeffectorPositions};
pub use jacobian::{JacobianBlock, JacobianRow, LinearApprox};
pub use motion::{
    BaseMotion, Coords2D, Coords3D, MotionDerivative, StateLin, StateLin1d, StateLin2d,
    StateLin3d,
};
pub use problem::{ConstraintSet, Problem, VariableComponent};
pub use variables::{Bound, OptimizationVariables, VariableError, VariableSet};
