//! The consumers a solver drives after every iterate.
//!
//! A [`Problem`] owns the variable store and an ordered list of consumers:
//! [`VariableComponent`]s that mirror variable sets, and [`ConstraintSet`]s
//! that evaluate rows over them. Pushing an iterate updates the store first,
//! then every component, then every constraint, each in registration order.

mod component;
mod constraint;

pub use component::VariableComponent;
pub use constraint::ConstraintSet;

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use tracing::{debug, trace, warn};

use crate::{Bound, JacobianBlock, OptimizationVariables, VariableError};

/// Variables, components, and constraints of one planning problem.
#[derive(Default)]
pub struct Problem {
    variables: OptimizationVariables,
    components: Vec<Box<dyn VariableComponent>>,
    constraints: Vec<Box<dyn ConstraintSet>>,
}

impl Problem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component and a variable set initialized from it.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable set with the component's name exists.
    pub fn add_component<C>(&mut self, component: C) -> Result<(), VariableError>
    where
        C: VariableComponent + 'static,
    {
        self.variables.add_variable_set_with_bounds(
            component.name(),
            component.values(),
            component.bounds(),
        )?;
        self.components.push(Box::new(component));
        Ok(())
    }

    /// Registers a constraint set and initializes it against the current
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the constraint cannot find the variables it needs.
    pub fn add_constraint<C>(&mut self, mut constraint: C) -> Result<(), VariableError>
    where
        C: ConstraintSet + 'static,
    {
        constraint.init_variable_dependent_quantities(&self.variables)?;
        debug!(
            name = constraint.name(),
            rows = constraint.rows(),
            "added constraint set"
        );
        self.constraints.push(Box::new(constraint));
        Ok(())
    }

    #[must_use]
    pub fn variables(&self) -> &OptimizationVariables {
        &self.variables
    }

    /// Returns the component mirroring variable set `name`.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&dyn VariableComponent> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Registered constraint sets, in registration order.
    pub fn constraints(&self) -> impl Iterator<Item = &dyn ConstraintSet> + '_ {
        self.constraints.iter().map(|c| c.as_ref())
    }

    /// Pushes a full iterate into the store and every consumer.
    ///
    /// If a consumer rejects the iterate, the previous iterate is pushed
    /// back so the store and every consumer agree again.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` has the wrong length or a consumer rejects
    /// the new values.
    pub fn push_iterate(&mut self, x: &DVector<f64>) -> Result<(), VariableError> {
        let previous = self.variables.optimization_variables();
        self.variables.set_all_variables(x)?;

        if let Err(err) = self.refresh_consumers() {
            warn!(%err, "iterate rejected, restoring previous iterate");
            self.variables.set_all_variables(&previous)?;
            self.refresh_consumers()?;
            return Err(err);
        }

        trace!(
            components = self.components.len(),
            constraints = self.constraints.len(),
            "updated consumers"
        );
        Ok(())
    }

    fn refresh_consumers(&mut self) -> Result<(), VariableError> {
        for component in &mut self.components {
            let values = self.variables.get_variables(component.name())?;
            component.set_values(values)?;
        }
        for constraint in &mut self.constraints {
            constraint.update(&self.variables)?;
        }
        Ok(())
    }

    /// Total number of constraint rows.
    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.constraints.iter().map(|c| c.rows()).sum()
    }

    /// All constraint values stacked in registration order.
    #[must_use]
    pub fn constraint_values(&self) -> DVector<f64> {
        let mut values = Vec::with_capacity(self.constraint_count());
        for constraint in &self.constraints {
            values.extend(constraint.values().iter());
        }
        DVector::from_vec(values)
    }

    /// Bounds of all constraint rows, aligned with
    /// [`constraint_values`](Self::constraint_values).
    #[must_use]
    pub fn constraint_bounds(&self) -> Vec<Bound> {
        self.constraints.iter().flat_map(|c| c.bounds()).collect()
    }

    /// Assembles the full constraint Jacobian.
    ///
    /// Rows follow [`constraint_values`](Self::constraint_values), columns
    /// follow [`OptimizationVariables::optimization_variables`].
    #[must_use]
    pub fn jacobian(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(
            self.constraint_count(),
            self.variables.optimization_variable_count(),
        );

        let mut row_offset = 0;
        for constraint in &self.constraints {
            let mut col_offset = 0;
            for set in self.variables.var_sets() {
                let mut block = JacobianBlock::zeros(constraint.rows(), set.len());
                constraint.fill_jacobian_block(set.id(), &mut block);
                for (row, col, value) in block.triplets() {
                    coo.push(row_offset + row, col_offset + col, value);
                }
                col_offset += set.len();
            }
            row_offset += constraint.rows();
        }

        CsrMatrix::from(&coo)
    }
}
