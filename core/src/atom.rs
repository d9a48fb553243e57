use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Represents an atom in a molecule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// The element label exactly as it appeared in the atom record
    pub element: String,
}

impl Atom {
    pub fn new(element: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            element: element.into(),
        }
    }

    /// Returns the position of this atom as a vector
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another atom
    pub fn distance_to(&self, other: &Atom) -> f64 {
        (self.position() - other.position()).norm()
    }
}
