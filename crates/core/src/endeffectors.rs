use std::{collections::BTreeMap, fmt};

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one endeffector, such as a foot.
///
/// Identifiers are ordered by their index, which fixes the iteration order of
/// every [`EndeffectorMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndeffectorId(pub usize);

impl fmt::Display for EndeffectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ee{}", self.0)
    }
}

/// One value per endeffector, always iterated in ascending id order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndeffectorMap<T> {
    values: BTreeMap<EndeffectorId, T>,
}

/// Contact load carried by each endeffector.
pub type EndeffectorLoads = EndeffectorMap<f64>;

/// World-frame position of each endeffector.
pub type EndeffectorPositions = EndeffectorMap<Vector3<f64>>;

impl<T> EndeffectorMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets the value for `ee`, returning the previous one.
    pub fn insert(&mut self, ee: EndeffectorId, value: T) -> Option<T> {
        self.values.insert(ee, value)
    }

    /// Returns the value for `ee`.
    ///
    /// # Panics
    ///
    /// Panics if `ee` has no value.
    #[must_use]
    pub fn at(&self, ee: EndeffectorId) -> &T {
        match self.values.get(&ee) {
            Some(value) => value,
            None => panic!("no value stored for endeffector {ee}"),
        }
    }

    #[must_use]
    pub fn get(&self, ee: EndeffectorId) -> Option<&T> {
        self.values.get(&ee)
    }

    #[must_use]
    pub fn contains(&self, ee: EndeffectorId) -> bool {
        self.values.contains_key(&ee)
    }

    /// Endeffector ids in ascending order.
    pub fn ees_ordered(&self) -> impl Iterator<Item = EndeffectorId> + '_ {
        self.values.keys().copied()
    }

    /// `(id, value)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EndeffectorId, &T)> + '_ {
        self.values.iter().map(|(&ee, value)| (ee, value))
    }

    /// Values in ascending id order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for EndeffectorMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(EndeffectorId, T)> for EndeffectorMap<T> {
    fn from_iter<I: IntoIterator<Item = (EndeffectorId, T)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_id_order_regardless_of_insertion() {
        let mut loads = EndeffectorLoads::new();
        loads.insert(EndeffectorId(3), 0.3);
        loads.insert(EndeffectorId(0), 0.0);
        loads.insert(EndeffectorId(1), 0.1);

        let ids: Vec<_> = loads.ees_ordered().map(|ee| ee.0).collect();
        assert_eq!(ids, vec![0, 1, 3]);
        assert_eq!(loads.values().copied().collect::<Vec<_>>(), vec![0.0, 0.1, 0.3]);
    }

    #[test]
    fn collects_and_looks_up() {
        let positions: EndeffectorPositions = [
            (EndeffectorId(1), Vector3::new(1.0, 0.0, 0.0)),
            (EndeffectorId(0), Vector3::new(0.0, 1.0, 0.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions.at(EndeffectorId(0)).y, 1.0);
        assert!(positions.get(EndeffectorId(2)).is_none());
        assert!(!positions.contains(EndeffectorId(5)));
    }

    #[test]
    #[should_panic(expected = "no value stored for endeffector ee7")]
    fn missing_endeffector_is_fatal() {
        let loads = EndeffectorLoads::new();
        let _ = loads.at(EndeffectorId(7));
    }

    #[test]
    fn displays_short_name() {
        assert_eq!(EndeffectorId(2).to_string(), "ee2");
    }
}
