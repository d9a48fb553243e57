use std::fmt;

use itertools::Itertools;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{atom::Atom, bond::Bond};

/// Represents a molecule as read from a mol file.
///
/// `atom_count` and `bond_count` are the counts declared by the file. When the file
/// ends early, `atoms` and `bonds` can be shorter than declared, see
/// [`Molecule::is_complete`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atom_count: usize,
    pub bond_count: usize,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    /// Creates a molecule whose declared counts match the given records
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self {
            atom_count: atoms.len(),
            bond_count: bonds.len(),
            atoms,
            bonds,
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Whether every declared atom and bond is present
    pub fn is_complete(&self) -> bool {
        self.atoms.len() == self.atom_count && self.bonds.len() == self.bond_count
    }

    /// Returns the two atoms joined by `bond`, if both indices refer to parsed atoms.
    pub fn bond_atoms(&self, bond: &Bond) -> Option<(&Atom, &Atom)> {
        let (i, j) = bond.atom_indices(self.atoms.len())?;
        Some((&self.atoms[i], &self.atoms[j]))
    }

    /// Iterates over the bonds whose atoms can be resolved. Bonds pointing outside the
    /// atom list are skipped.
    pub fn resolved_bonds(&self) -> impl Iterator<Item = (&Bond, &Atom, &Atom)> + '_ {
        self.bonds.iter().filter_map(move |bond| match self.bond_atoms(bond) {
            Some((a, b)) => Some((bond, a, b)),
            None => {
                log::warn!(
                    "skipping bond {}-{}: atom index out of range (1..={})",
                    bond.atom1,
                    bond.atom2,
                    self.atoms.len()
                );
                None
            }
        })
    }

    /// Length of a bond in the units of the coordinates
    pub fn bond_length(&self, bond: &Bond) -> Option<f64> {
        self.bond_atoms(bond).map(|(a, b)| a.distance_to(b))
    }

    /// The mean position of all atoms, or `None` for a molecule without atoms
    pub fn centroid(&self) -> Option<Vector3<f64>> {
        if self.atoms.is_empty() {
            return None;
        }

        let sum = self
            .atoms
            .iter()
            .map(Atom::position)
            .fold(Vector3::zeros(), |acc, position| acc + position);
        Some(sum / self.atoms.len() as f64)
    }

    /// Returns the molecular formula in Hill order.
    ///
    /// Carbon comes first and hydrogen second when carbon is present, everything else
    /// is sorted alphabetically. Element labels are used as written.
    pub fn formula(&self) -> String {
        let counts = self
            .atoms
            .iter()
            .map(|atom| atom.element.as_str())
            .counts();
        let has_carbon = counts.contains_key("C");

        counts
            .into_iter()
            .sorted_by_key(|&(element, _)| match element {
                "C" if has_carbon => (0, element),
                "H" if has_carbon => (1, element),
                _ => (2, element),
            })
            .map(|(element, count)| match count {
                1 => element.to_owned(),
                n => format!("{element}{n}"),
            })
            .join("")
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Atom count: {}", self.atom_count)?;
        for atom in &self.atoms {
            writeln!(
                f,
                "{}\t{:.4}\t{:.4}\t{:.4}",
                atom.element, atom.x, atom.y, atom.z
            )?;
        }
        Ok(())
    }
}
