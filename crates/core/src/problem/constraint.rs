use nalgebra::DVector;

use crate::{Bound, JacobianBlock, OptimizationVariables, VariableError};

/// A group of constraint rows the solver evaluates together.
///
/// A constraint set caches whatever it needs from the variable store.
/// The owning [`Problem`](crate::Problem) calls
/// [`init_variable_dependent_quantities`](Self::init_variable_dependent_quantities)
/// once the variables it depends on exist, and [`update`](Self::update) after
/// every new iterate; evaluation methods only read that cache.
pub trait ConstraintSet {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Number of constraint rows.
    fn rows(&self) -> usize;

    /// Constraint values at the cached variables.
    fn values(&self) -> DVector<f64>;

    /// One bound per row.
    fn bounds(&self) -> Vec<Bound>;

    /// Writes the derivatives of all rows with respect to variable set
    /// `var_set` into `jac`.
    ///
    /// `jac` spans `rows()` rows and one column per variable of `var_set`.
    /// Sets this constraint does not depend on leave `jac` untouched.
    fn fill_jacobian_block(&self, var_set: &str, jac: &mut JacobianBlock);

    /// Re-derives quantities that depend on the variables' shape or bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable set is missing or malformed.
    fn init_variable_dependent_quantities(
        &mut self,
        variables: &OptimizationVariables,
    ) -> Result<(), VariableError>;

    /// Refreshes cached values after a new iterate was pushed.
    ///
    /// Defaults to re-running the full initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable set is missing or malformed.
    fn update(&mut self, variables: &OptimizationVariables) -> Result<(), VariableError> {
        self.init_variable_dependent_quantities(variables)
    }
}
