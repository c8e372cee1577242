use nalgebra::{DVector, Vector2, Vector3};

use strider_core::{
    Bound, Coords2D, EndeffectorId, EndeffectorLoads, EndeffectorPositions, VariableComponent,
    VariableError,
};

fn check_len(id: &str, expected: usize, values: &DVector<f64>) -> Result<(), VariableError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(VariableError::LengthMismatch {
            id: id.to_owned(),
            expected,
            got: values.len(),
        })
    }
}

/// Contact load of every endeffector at every dynamics sample.
///
/// Loads are laid out sample by sample, `index = sample · ees + ee`, and
/// bounded below by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactLoads {
    name: String,
    samples: usize,
    ees: usize,
    values: DVector<f64>,
}

impl ContactLoads {
    /// Creates loads for `samples × ees` entries, all set to `initial`.
    pub fn new(name: impl Into<String>, samples: usize, ees: usize, initial: f64) -> Self {
        Self {
            name: name.into(),
            samples,
            ees,
            values: DVector::from_element(samples * ees, initial),
        }
    }

    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    #[must_use]
    pub fn ee_count(&self) -> usize {
        self.ees
    }

    /// # Panics
    ///
    /// Panics if `sample` or `ee` is out of range.
    #[must_use]
    pub fn index(&self, sample: usize, ee: EndeffectorId) -> usize {
        assert!(
            sample < self.samples && ee.0 < self.ees,
            "no load for {ee} at sample {sample}"
        );
        sample * self.ees + ee.0
    }

    /// Loads of every endeffector at one sample.
    ///
    /// # Panics
    ///
    /// Panics if `sample` is out of range.
    #[must_use]
    pub fn loads_at(&self, sample: usize) -> EndeffectorLoads {
        (0..self.ees)
            .map(EndeffectorId)
            .map(|ee| (ee, self.values[self.index(sample, ee)]))
            .collect()
    }
}

impl VariableComponent for ContactLoads {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> DVector<f64> {
        self.values.clone()
    }

    fn set_values(&mut self, values: &DVector<f64>) -> Result<(), VariableError> {
        check_len(&self.name, self.samples * self.ees, values)?;
        self.values.copy_from(values);
        Ok(())
    }

    fn bounds(&self) -> Vec<Bound> {
        vec![Bound::NON_NEGATIVE; self.values.len()]
    }
}

/// Planar contact position of every endeffector, held for the whole
/// horizon.
///
/// Positions are laid out endeffector by endeffector, `index = ee · 2 + dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct Footholds {
    name: String,
    positions: Vec<Vector2<f64>>,
}

impl Footholds {
    pub fn new(name: impl Into<String>, positions: Vec<Vector2<f64>>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }

    #[must_use]
    pub fn ee_count(&self) -> usize {
        self.positions.len()
    }

    /// # Panics
    ///
    /// Panics if `ee` is out of range.
    #[must_use]
    pub fn index(&self, ee: EndeffectorId, dim: Coords2D) -> usize {
        assert!(ee.0 < self.positions.len(), "no foothold for {ee}");
        ee.0 * 2 + dim.index()
    }

    /// Foothold positions on the ground plane.
    #[must_use]
    pub fn positions(&self) -> EndeffectorPositions {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (EndeffectorId(i), Vector3::new(p.x, p.y, 0.0)))
            .collect()
    }
}

impl VariableComponent for Footholds {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.positions.len() * 2,
            self.positions.iter().flat_map(|p| [p.x, p.y]),
        )
    }

    fn set_values(&mut self, values: &DVector<f64>) -> Result<(), VariableError> {
        check_len(&self.name, self.positions.len() * 2, values)?;
        for (i, p) in self.positions.iter_mut().enumerate() {
            *p = Vector2::new(values[2 * i], values[2 * i + 1]);
        }
        Ok(())
    }
}
