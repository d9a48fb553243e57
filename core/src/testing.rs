//! Mol file fixtures shared by tests and benchmarks.

use std::fmt::Write;

use crate::{atom::Atom, bond::Bond};

/// Element labels cycled through by [`synthetic`].
pub const ELEMENTS: &[&str] = &["C", "H", "O", "N", "S", "P", "Cl"];

/// Two atoms and one bond in the free-form whitespace layout.
pub const CARBON_MONOXIDE: &str = "carbon monoxide
  hand written
no comment
2 1
0.0 0.0 0.0 C
1.5 0.0 0.0 O
1 2 1
";

/// Water in fixed-column V2000 layout, including the trailing `M  END` block.
pub const WATER: &str = "water
  RDKit          3D

  3  2  0  0  0  0  0  0  0  0999 V2000
   -0.0002    0.3905    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
   -0.7571   -0.1946    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
    0.7573   -0.1959    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  1  3  1  0
M  END
";

/// Prefixes the given lines with a three line header block. The first given line is
/// therefore the counts line.
pub fn mol(lines: &[&str]) -> String {
    let mut text = String::from("fixture\n  molfile\n\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// Writes a mol file whose counts line matches the given atoms and bonds.
pub fn fixture(atoms: &[Atom], bonds: &[Bond]) -> String {
    let counts = format!("{} {}", atoms.len(), bonds.len());
    let mut text = mol(&[counts.as_str()]);

    for Atom { x, y, z, element } in atoms {
        // infallible for String
        let _ = writeln!(text, "{x} {y} {z} {element}");
    }
    for Bond {
        atom1,
        atom2,
        bond_type,
    } in bonds
    {
        let _ = writeln!(text, "{atom1} {atom2} {bond_type}");
    }

    text
}

/// A deterministic chain-like molecule with `atom_count` atoms and `bond_count` bonds.
pub fn synthetic(atom_count: usize, bond_count: usize) -> String {
    let atoms = (0..atom_count)
        .map(|i| {
            let t = i as f64;
            Atom::new(
                ELEMENTS[i % ELEMENTS.len()],
                1.54 * t,
                (0.5 * t).sin(),
                (0.5 * t).cos(),
            )
        })
        .collect::<Vec<_>>();

    let span = atom_count.max(1) as i64;
    let bonds = (0..bond_count as i64)
        .map(|i| Bond::new(i % span + 1, (i + 1) % span + 1, i % 3 + 1))
        .collect::<Vec<_>>();

    fixture(&atoms, &bonds)
}
