use nalgebra::DVector;
use tracing::debug;

use strider_core::{
    Bound, ConstraintSet, Coords2D, JacobianBlock, MotionDerivative, OptimizationVariables,
    VariableComponent, VariableError,
};

use crate::{EEMotionNodes, SwingConfig};

/// Keeps each swing node centered between its neighbors.
///
/// For every swing node `k` with a predecessor and a successor, starting at
/// [`SwingConfig::node_start`], and each planar dimension:
///
/// ```text
/// p[k] − (p[k−1] + p[k+1]) / 2          = 0
/// v[k] − (p[k+1] − p[k−1]) / t_swing    = 0
/// ```
///
/// Rows are ordered node by node, then `x` before `y`, position before
/// velocity.
#[derive(Debug, Clone)]
pub struct SwingConstraint {
    name: String,
    ee_motion_id: String,
    contacts: Vec<bool>,
    config: SwingConfig,
    nodes: DVector<f64>,
    swing_nodes: Vec<usize>,
}

impl SwingConstraint {
    /// Creates a constraint over the variable set mirrored by `ee_motion`,
    /// using its contact schedule.
    #[must_use]
    pub fn new(ee_motion: &EEMotionNodes, config: SwingConfig) -> Self {
        let id = ee_motion.name().to_owned();
        Self {
            name: format!("swing {id}"),
            ee_motion_id: id,
            contacts: ee_motion.contacts().to_vec(),
            config,
            nodes: DVector::zeros(0),
            swing_nodes: Vec::new(),
        }
    }

    /// Nodes that carry rows, in row order.
    #[must_use]
    pub fn swing_nodes(&self) -> &[usize] {
        &self.swing_nodes
    }

    fn value(&self, node: usize, dxdt: MotionDerivative, dim: Coords2D) -> f64 {
        self.nodes[Self::column(node, dxdt, dim)]
    }

    fn column(node: usize, dxdt: MotionDerivative, dim: Coords2D) -> usize {
        EEMotionNodes::index(node, dxdt, dim.into())
    }

    fn row(k: usize, dim: Coords2D) -> usize {
        4 * k + 2 * dim.index()
    }
}

impl ConstraintSet for SwingConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> usize {
        4 * self.swing_nodes.len()
    }

    fn values(&self) -> DVector<f64> {
        let t = self.config.t_swing_avg();
        let mut g = DVector::zeros(self.rows());

        for (k, &node) in self.swing_nodes.iter().enumerate() {
            for dim in Coords2D::ALL {
                let p_prev = self.value(node - 1, MotionDerivative::Pos, dim);
                let p_next = self.value(node + 1, MotionDerivative::Pos, dim);
                let p = self.value(node, MotionDerivative::Pos, dim);
                let v = self.value(node, MotionDerivative::Vel, dim);

                let row = Self::row(k, dim);
                g[row] = p - (p_prev + p_next) / 2.0;
                g[row + 1] = v - (p_next - p_prev) / t;
            }
        }
        g
    }

    fn bounds(&self) -> Vec<Bound> {
        vec![Bound::ZERO; self.rows()]
    }

    fn fill_jacobian_block(&self, var_set: &str, jac: &mut JacobianBlock) {
        if var_set != self.ee_motion_id {
            return;
        }

        let t = self.config.t_swing_avg();
        let pos = |node, dim: Coords2D| Self::column(node, MotionDerivative::Pos, dim);
        let vel = |node, dim: Coords2D| Self::column(node, MotionDerivative::Vel, dim);

        for (k, &node) in self.swing_nodes.iter().enumerate() {
            for dim in Coords2D::ALL {
                let row = Self::row(k, dim);

                jac.add(row, pos(node, dim), 1.0);
                jac.add(row, pos(node - 1, dim), -0.5);
                jac.add(row, pos(node + 1, dim), -0.5);

                jac.add(row + 1, vel(node, dim), 1.0);
                jac.add(row + 1, pos(node + 1, dim), -1.0 / t);
                jac.add(row + 1, pos(node - 1, dim), 1.0 / t);
            }
        }
    }

    fn init_variable_dependent_quantities(
        &mut self,
        variables: &OptimizationVariables,
    ) -> Result<(), VariableError> {
        self.update(variables)?;

        let last = self.contacts.len().saturating_sub(1);
        let first = self.config.node_start().max(1);
        self.swing_nodes = (first..last).filter(|&i| !self.contacts[i]).collect();

        debug!(
            ee_motion = %self.ee_motion_id,
            swing_nodes = self.swing_nodes.len(),
            "initialized swing constraint"
        );
        Ok(())
    }

    fn update(&mut self, variables: &OptimizationVariables) -> Result<(), VariableError> {
        let values = variables.get_variables(&self.ee_motion_id)?;
        let expected = self.contacts.len() * EEMotionNodes::VALUES_PER_NODE;
        if values.len() != expected {
            return Err(VariableError::LengthMismatch {
                id: self.ee_motion_id.clone(),
                expected,
                got: values.len(),
            });
        }
        self.nodes.clone_from(values);
        Ok(())
    }
}
