use nalgebra::DVector;

use crate::{Bound, VariableError};

/// A typed view of one named variable set.
///
/// Components turn their domain structure (spline coefficients, contact
/// loads, ...) into the flat vector stored by
/// [`OptimizationVariables`](crate::OptimizationVariables) and back.
pub trait VariableComponent {
    /// Id of the variable set this component mirrors.
    fn name(&self) -> &str;

    /// Returns the component's current values as a flat vector.
    fn values(&self) -> DVector<f64>;

    /// Overwrites the component from a flat vector.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::LengthMismatch`] if `values` does not match
    /// the component's layout.
    fn set_values(&mut self, values: &DVector<f64>) -> Result<(), VariableError>;

    /// Bound on each variable, unbounded by default.
    fn bounds(&self) -> Vec<Bound> {
        vec![Bound::NO_BOUND; self.values().len()]
    }
}
