use strider_core::VariableError;
use strider_spline::SplineError;
use thiserror::Error;

use crate::ConfigError;

/// Errors that can occur when assembling constraints and their variables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstraintError {
    #[error(transparent)]
    Variables(#[from] VariableError),

    #[error(transparent)]
    Spline(#[from] SplineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("`{id}` holds {values} values, not a whole number of motion nodes")]
    NodeLayout { id: String, values: usize },

    #[error("`{id}` has {nodes} motion nodes but {contacts} contact flags")]
    ContactSchedule {
        id: String,
        nodes: usize,
        contacts: usize,
    },

    #[error("spline `{0}` has no segments")]
    EmptySpline(String),

    #[error("`{id}` covers {got} {what}, expected {expected}")]
    Coverage {
        id: String,
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
