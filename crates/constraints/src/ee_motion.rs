use nalgebra::{DVector, Vector3};

use strider_core::{Coords3D, MotionDerivative, VariableComponent, VariableError};

use crate::ConstraintError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and velocity of one endeffector at one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionNode {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
}

/// The motion of one endeffector as a sequence of nodes.
///
/// Each node is flagged as either in contact or in swing. Variables are laid
/// out node by node, position before velocity, `x`, `y`, `z`:
///
/// ```text
/// index(node, dxdt, dim) = node · 6 + order(dxdt) · 3 + dim
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EEMotionNodes {
    name: String,
    nodes: Vec<MotionNode>,
    contacts: Vec<bool>,
}

impl EEMotionNodes {
    /// Number of variables per node.
    pub const VALUES_PER_NODE: usize = 6;

    /// Creates the nodes of variable set `name`.
    ///
    /// # Errors
    ///
    /// Returns an error unless there is exactly one contact flag per node.
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<MotionNode>,
        contacts: Vec<bool>,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        if nodes.len() != contacts.len() {
            return Err(ConstraintError::ContactSchedule {
                id: name,
                nodes: nodes.len(),
                contacts: contacts.len(),
            });
        }
        Ok(Self {
            name,
            nodes,
            contacts,
        })
    }

    /// Creates the nodes of variable set `name` from flat values.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is not a whole number of nodes, or the
    /// contact schedule does not match the node count.
    pub fn from_values(
        name: impl Into<String>,
        values: &DVector<f64>,
        contacts: Vec<bool>,
    ) -> Result<Self, ConstraintError> {
        let name = name.into();
        if values.len() % Self::VALUES_PER_NODE != 0 {
            return Err(ConstraintError::NodeLayout {
                id: name,
                values: values.len(),
            });
        }

        let nodes = values
            .as_slice()
            .chunks_exact(Self::VALUES_PER_NODE)
            .map(|chunk| MotionNode {
                pos: Vector3::new(chunk[0], chunk[1], chunk[2]),
                vel: Vector3::new(chunk[3], chunk[4], chunk[5]),
            })
            .collect();
        Self::new(name, nodes, contacts)
    }

    /// Position of one node variable within the flat vector.
    ///
    /// # Panics
    ///
    /// Panics if `dxdt` is not position or velocity.
    #[must_use]
    pub fn index(node: usize, dxdt: MotionDerivative, dim: Coords3D) -> usize {
        assert!(
            matches!(dxdt, MotionDerivative::Pos | MotionDerivative::Vel),
            "motion nodes store position and velocity only, not {dxdt:?}"
        );
        node * Self::VALUES_PER_NODE + dxdt.order() * 3 + dim.index()
    }

    #[must_use]
    pub fn nodes(&self) -> &[MotionNode] {
        &self.nodes
    }

    /// Contact flag of every node, `true` while the endeffector touches the
    /// ground.
    #[must_use]
    pub fn contacts(&self) -> &[bool] {
        &self.contacts
    }

    #[must_use]
    pub fn is_contact(&self, node: usize) -> bool {
        self.contacts[node]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl VariableComponent for EEMotionNodes {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.nodes.len() * Self::VALUES_PER_NODE,
            self.nodes
                .iter()
                .flat_map(|node| node.pos.iter().chain(node.vel.iter()).copied()),
        )
    }

    fn set_values(&mut self, values: &DVector<f64>) -> Result<(), VariableError> {
        let expected = self.nodes.len() * Self::VALUES_PER_NODE;
        if values.len() != expected {
            return Err(VariableError::LengthMismatch {
                id: self.name.clone(),
                expected,
                got: values.len(),
            });
        }

        for (i, node) in self.nodes.iter_mut().enumerate() {
            for dim in Coords3D::ALL {
                node.pos[dim.index()] = values[Self::index(i, MotionDerivative::Pos, dim)];
                node.vel[dim.index()] = values[Self::index(i, MotionDerivative::Vel, dim)];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_index() {
        let values = DVector::from_iterator(12, (0..12u32).map(f64::from));
        let nodes = EEMotionNodes::from_values("ee0", &values, vec![true, false]).unwrap();

        assert_eq!(nodes.nodes()[1].pos, Vector3::new(6.0, 7.0, 8.0));
        assert_eq!(nodes.nodes()[1].vel.z, 11.0);
        assert_eq!(EEMotionNodes::index(1, MotionDerivative::Vel, Coords3D::Y), 10);
        assert_eq!(nodes.values(), values);
        assert!(!nodes.is_contact(1));
    }

    #[test]
    fn rejects_partial_nodes_and_mismatched_schedules() {
        let err = EEMotionNodes::from_values("ee0", &DVector::zeros(7), vec![true]).unwrap_err();
        assert_eq!(
            err,
            ConstraintError::NodeLayout {
                id: "ee0".into(),
                values: 7
            }
        );

        let err = EEMotionNodes::new("ee0", vec![MotionNode::default(); 3], vec![true]);
        assert!(matches!(
            err,
            Err(ConstraintError::ContactSchedule { nodes: 3, contacts: 1, .. })
        ));
    }

    #[test]
    fn set_values_checks_length() {
        let mut nodes = EEMotionNodes::new("ee0", vec![MotionNode::default(); 2], vec![true; 2])
            .unwrap();
        assert!(nodes.set_values(&DVector::zeros(11)).is_err());

        let values = DVector::from_element(12, 0.5);
        nodes.set_values(&values).unwrap();
        assert_eq!(nodes.nodes()[0].vel, Vector3::repeat(0.5));
    }

    #[test]
    #[should_panic(expected = "position and velocity only")]
    fn acceleration_is_not_a_node_variable() {
        let _ = EEMotionNodes::index(0, MotionDerivative::Acc, Coords3D::X);
    }
}
