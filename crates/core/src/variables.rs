//! The store of optimization variables.
//!
//! [`OptimizationVariables`] holds the authoritative value of every named
//! [`VariableSet`]. The solver sees the concatenation of all sets, in the
//! order they were added, as one flat vector.

mod bound;
mod error;
mod set;

pub use bound::Bound;
pub use error::VariableError;
pub use set::VariableSet;

use nalgebra::DVector;
use tracing::{debug, trace};

/// Holds the current value of all optimization variables.
#[derive(Debug, Clone, Default)]
pub struct OptimizationVariables {
    variable_sets: Vec<VariableSet>,
}

impl OptimizationVariables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every variable set.
    pub fn clear_variables(&mut self) {
        self.variable_sets.clear();
    }

    /// Appends a variable set whose variables all share `bound`.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::DuplicateSet`] if the id is taken.
    pub fn add_variable_set(
        &mut self,
        id: impl Into<String>,
        values: DVector<f64>,
        bound: Bound,
    ) -> Result<(), VariableError> {
        self.push(VariableSet::new(id, values, bound))
    }

    /// Appends a variable set with one bound per variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the bounds do not match the
    /// values in length.
    pub fn add_variable_set_with_bounds(
        &mut self,
        id: impl Into<String>,
        values: DVector<f64>,
        bounds: Vec<Bound>,
    ) -> Result<(), VariableError> {
        self.push(VariableSet::with_bounds(id, values, bounds)?)
    }

    fn push(&mut self, set: VariableSet) -> Result<(), VariableError> {
        if self.set_exists(set.id()) {
            return Err(VariableError::DuplicateSet(set.id().to_owned()));
        }
        debug!(id = set.id(), len = set.len(), "added variable set");
        self.variable_sets.push(set);
        Ok(())
    }

    /// Returns the current values of one set.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::UnknownSet`] if no set has this id.
    pub fn get_variables(&self, id: &str) -> Result<&DVector<f64>, VariableError> {
        self.variable_set(id).map(VariableSet::values)
    }

    /// Returns one set.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::UnknownSet`] if no set has this id.
    pub fn variable_set(&self, id: &str) -> Result<&VariableSet, VariableError> {
        self.variable_sets
            .iter()
            .find(|set| set.id() == id)
            .ok_or_else(|| VariableError::UnknownSet(id.to_owned()))
    }

    /// Overwrites the values of one set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set does not exist or the length differs.
    pub fn set_variables(&mut self, id: &str, values: &DVector<f64>) -> Result<(), VariableError> {
        self.variable_sets
            .iter_mut()
            .find(|set| set.id() == id)
            .ok_or_else(|| VariableError::UnknownSet(id.to_owned()))?
            .set_values(values.as_slice())
    }

    /// Returns all variables concatenated in insertion order.
    #[must_use]
    pub fn optimization_variables(&self) -> DVector<f64> {
        let values: Vec<f64> = self
            .variable_sets
            .iter()
            .flat_map(|set| set.values().iter().copied())
            .collect();
        DVector::from_vec(values)
    }

    /// Returns the bounds of all variables, aligned with
    /// [`optimization_variables`](Self::optimization_variables).
    #[must_use]
    pub fn optimization_variable_bounds(&self) -> Vec<Bound> {
        self.variable_sets
            .iter()
            .flat_map(|set| set.bounds().iter().copied())
            .collect()
    }

    /// Total number of variables across all sets.
    #[must_use]
    pub fn optimization_variable_count(&self) -> usize {
        self.variable_sets.iter().map(VariableSet::len).sum()
    }

    #[must_use]
    pub fn var_sets(&self) -> &[VariableSet] {
        &self.variable_sets
    }

    /// Index of the first variable of set `id` within the flat vector.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::UnknownSet`] if no set has this id.
    pub fn column_offset(&self, id: &str) -> Result<usize, VariableError> {
        let mut offset = 0;
        for set in &self.variable_sets {
            if set.id() == id {
                return Ok(offset);
            }
            offset += set.len();
        }
        Err(VariableError::UnknownSet(id.to_owned()))
    }

    /// Distributes a full iterate over the sets, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::LengthMismatch`] if `x` does not cover exactly
    /// all variables. No set is modified in that case.
    pub fn set_all_variables(&mut self, x: &DVector<f64>) -> Result<(), VariableError> {
        let expected = self.optimization_variable_count();
        if x.len() != expected {
            return Err(VariableError::LengthMismatch {
                id: "all variables".to_owned(),
                expected,
                got: x.len(),
            });
        }

        let mut offset = 0;
        for set in &mut self.variable_sets {
            let n = set.len();
            set.set_values(&x.as_slice()[offset..offset + n])?;
            offset += n;
        }
        trace!(len = expected, "pushed new iterate");
        Ok(())
    }

    fn set_exists(&self, id: &str) -> bool {
        self.variable_sets.iter().any(|set| set.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> OptimizationVariables {
        let mut vars = OptimizationVariables::new();
        vars.add_variable_set("spline", DVector::from_vec(vec![1.0, 2.0, 3.0]), Bound::NO_BOUND)
            .unwrap();
        vars.add_variable_set_with_bounds(
            "load",
            DVector::from_vec(vec![4.0, 5.0]),
            vec![Bound::NON_NEGATIVE, Bound::new(0.0, 1.0)],
        )
        .unwrap();
        vars
    }

    #[test]
    fn concatenates_in_insertion_order() {
        let vars = store();

        assert_eq!(vars.optimization_variable_count(), 5);
        assert_eq!(
            vars.optimization_variables().as_slice(),
            &[1.0, 2.0, 3.0, 4.0, 5.0]
        );

        let bounds = vars.optimization_variable_bounds();
        assert_eq!(bounds[2], Bound::NO_BOUND);
        assert_eq!(bounds[4], Bound::new(0.0, 1.0));

        assert_eq!(vars.column_offset("spline"), Ok(0));
        assert_eq!(vars.column_offset("load"), Ok(3));
        let ids: Vec<_> = vars.var_sets().iter().map(VariableSet::id).collect();
        assert_eq!(ids, vec!["spline", "load"]);
    }

    #[test]
    fn set_all_variables_distributes_iterate() {
        let mut vars = store();
        let x = DVector::from_vec(vec![10.0, 20.0, 30.0, 40.0, 50.0]);

        vars.set_all_variables(&x).unwrap();

        assert_eq!(vars.get_variables("spline").unwrap().as_slice(), &[10.0, 20.0, 30.0]);
        assert_eq!(vars.get_variables("load").unwrap().as_slice(), &[40.0, 50.0]);
        assert_eq!(vars.optimization_variables(), x);
    }

    #[test]
    fn rejects_iterate_of_wrong_length() {
        let mut vars = store();
        let before = vars.optimization_variables();

        let err = vars
            .set_all_variables(&DVector::from_vec(vec![0.0; 4]))
            .unwrap_err();

        assert!(matches!(
            err,
            VariableError::LengthMismatch {
                expected: 5,
                got: 4,
                ..
            }
        ));
        assert_eq!(vars.optimization_variables(), before);
    }

    #[test]
    fn rejects_duplicate_and_unknown_sets() {
        let mut vars = store();

        assert_eq!(
            vars.add_variable_set("load", DVector::zeros(1), Bound::NO_BOUND),
            Err(VariableError::DuplicateSet("load".into()))
        );
        assert_eq!(
            vars.get_variables("nodes").unwrap_err(),
            VariableError::UnknownSet("nodes".into())
        );
        assert!(vars.column_offset("nodes").is_err());
    }

    #[test]
    fn rejects_mismatched_bounds() {
        let mut vars = OptimizationVariables::new();
        let err = vars
            .add_variable_set_with_bounds("x", DVector::zeros(2), vec![Bound::ZERO])
            .unwrap_err();
        assert!(matches!(err, VariableError::LengthMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn set_variables_updates_one_set() {
        let mut vars = store();
        vars.set_variables("load", &DVector::from_vec(vec![0.5, 0.25]))
            .unwrap();
        assert_eq!(vars.get_variables("load").unwrap()[1], 0.25);
        assert!(vars.set_variables("load", &DVector::zeros(3)).is_err());

        vars.clear_variables();
        assert_eq!(vars.optimization_variable_count(), 0);
    }
}
