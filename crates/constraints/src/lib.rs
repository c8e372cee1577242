//! Constraint sets and variable components for legged motion planning.
//!
//! Variable components mirror one named variable set each:
//!
//! - [`EEMotionNodes`]: endeffector position and velocity nodes
//! - [`ContactLoads`]: per-sample load of every endeffector
//! - [`Footholds`]: planar contact position of every endeffector
//!
//! Constraint sets evaluate rows over those sets and the CoM spline:
//!
//! - [`SwingConstraint`]: swing nodes stay centered between their neighbors
//! - [`SplineJunctionConstraint`]: adjacent spline segments meet
//! - [`DynamicConstraint`]: the spline follows the inverted pendulum
//!
//! Every constraint keeps its own copy of the structures it evaluates and
//! refreshes it from the variable store on each update.

mod config;
mod contact;
mod dynamic;
mod ee_motion;
mod error;
mod junction;
mod swing;

pub use config::{ConfigError, DynamicConfig, JunctionConfig, SwingConfig};
pub use contact::{ContactLoads, Footholds};
pub use dynamic::DynamicConstraint;
pub use ee_motion::{EEMotionNodes, MotionNode};
pub use error::ConstraintError;
pub use junction::SplineJunctionConstraint;
pub use swing::SwingConstraint;

use strider_core::{OptimizationVariables, VariableComponent, VariableError};

/// Overwrites `component` with the current values of its variable set.
fn pull<C>(component: &mut C, variables: &OptimizationVariables) -> Result<(), VariableError>
where
    C: VariableComponent + ?Sized,
{
    let values = variables.get_variables(component.name())?;
    component.set_values(values)
}
