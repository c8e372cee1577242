use nalgebra::DVector;

use super::{Bound, VariableError};

/// A named, flat block of optimization variables with per-variable bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSet {
    id: String,
    values: DVector<f64>,
    bounds: Vec<Bound>,
}

impl VariableSet {
    /// Creates a set where every variable shares `bound`.
    pub fn new(id: impl Into<String>, values: DVector<f64>, bound: Bound) -> Self {
        let bounds = vec![bound; values.len()];
        Self {
            id: id.into(),
            values,
            bounds,
        }
    }

    /// Creates a set with one bound per variable.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::LengthMismatch`] if `bounds` and `values`
    /// differ in length.
    pub fn with_bounds(
        id: impl Into<String>,
        values: DVector<f64>,
        bounds: Vec<Bound>,
    ) -> Result<Self, VariableError> {
        let id = id.into();
        if bounds.len() != values.len() {
            return Err(VariableError::LengthMismatch {
                id,
                expected: values.len(),
                got: bounds.len(),
            });
        }
        Ok(Self { id, values, bounds })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    #[must_use]
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces the values, keeping the length fixed.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::LengthMismatch`] if the length would change.
    pub fn set_values(&mut self, values: &[f64]) -> Result<(), VariableError> {
        if values.len() != self.len() {
            return Err(VariableError::LengthMismatch {
                id: self.id.clone(),
                expected: self.len(),
                got: values.len(),
            });
        }
        self.values.copy_from_slice(values);
        Ok(())
    }
}
