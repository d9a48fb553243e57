use serde::{Deserialize, Serialize};

/// A connection between two atoms of a molecule.
///
/// Atom indices are 1-based, as written in the bond block. They are kept exactly as
/// read and are only checked against the atom list when a bond is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub atom1: i64,
    pub atom2: i64,
    /// Raw bond type code, see [`Bond::order`]
    pub bond_type: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
}

impl Bond {
    pub fn new(atom1: i64, atom2: i64, bond_type: i64) -> Self {
        Self {
            atom1,
            atom2,
            bond_type,
        }
    }

    /// Maps the bond type code to a bond order. Unknown codes are treated as single bonds.
    pub fn order(&self) -> BondOrder {
        match self.bond_type {
            2 => BondOrder::Double,
            3 => BondOrder::Triple,
            _ => BondOrder::Single,
        }
    }

    /// Returns the zero-based indices of both atoms, if both fall within `1..=atom_count`.
    pub fn atom_indices(&self, atom_count: usize) -> Option<(usize, usize)> {
        let resolve = |index: i64| {
            usize::try_from(index)
                .ok()
                .filter(|&index| (1..=atom_count).contains(&index))
                .map(|index| index - 1)
        };

        Some((resolve(self.atom1)?, resolve(self.atom2)?))
    }
}
