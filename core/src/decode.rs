//! Decoder for the positional mol file layout.
//!
//! A mol file is read strictly by line index: three free-text header lines, a counts
//! line, `atom_count` atom records and then `bond_count` bond records. Anything after
//! the bond block is ignored.

use std::{
    io::{self, BufRead},
    str::FromStr,
};

use crate::{
    atom::Atom,
    bond::Bond,
    error::{Axis, BondField, CountField, DecodeError},
    molecule::Molecule,
};

/// Index of the counts line. Lines before it are the title, program and comment lines.
const COUNTS_LINE: usize = 3;

/// Index of the first atom record.
const FIRST_RECORD_LINE: usize = COUNTS_LINE + 1;

/// Upper bound on the capacity reserved up front from the declared counts. Records
/// beyond this still get appended, the vectors just grow as usual.
pub const MAX_PREALLOCATED_RECORDS: usize = 1 << 16;

/// Decodes a complete mol file held in memory.
pub fn decode(input: &[u8]) -> Result<Molecule, DecodeError> {
    read(input)
}

/// Decodes a mol file from a buffered reader in a single forward pass.
///
/// Declared counts decide how many lines are consumed as atom and bond records. If the
/// input ends early the molecule is returned with fewer atoms or bonds than declared.
/// Only the counts line and the records have to be valid UTF-8.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, DecodeError> {
    let mut molecule = Molecule::default();
    let mut counts_read = false;

    for (i, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|source| DecodeError::InputReadFailure { line: i, source })?;

        let atoms_end = FIRST_RECORD_LINE.saturating_add(molecule.atom_count);
        let bonds_end = atoms_end.saturating_add(molecule.bond_count);

        // header and trailing lines are never interpreted, not even as text
        if i < COUNTS_LINE || (i > COUNTS_LINE && i >= bonds_end) {
            continue;
        }

        let text = std::str::from_utf8(&line)
            .map_err(|error| DecodeError::InputReadFailure {
                line: i,
                source: io::Error::new(io::ErrorKind::InvalidData, error),
            })?
            .trim();

        if i == COUNTS_LINE {
            let (atom_count, bond_count) = parse_counts(text, i)?;
            log::debug!("counts line declares {atom_count} atoms and {bond_count} bonds");

            molecule.atom_count = atom_count;
            molecule.bond_count = bond_count;
            molecule.atoms = Vec::with_capacity(atom_count.min(MAX_PREALLOCATED_RECORDS));
            molecule.bonds = Vec::with_capacity(bond_count.min(MAX_PREALLOCATED_RECORDS));
            counts_read = true;
        } else if i < atoms_end {
            let atom = parse_atom(text, i)?;
            log::trace!("atom {} = {atom:?}", molecule.atoms.len() + 1);
            molecule.atoms.push(atom);
        } else if i < bonds_end {
            let bond = parse_bond(text, i)?;
            log::trace!("bond {} = {bond:?}", molecule.bonds.len() + 1);
            molecule.bonds.push(bond);
        }
    }

    if counts_read && !molecule.is_complete() {
        log::warn!(
            "input ended early: read {}/{} atoms and {}/{} bonds",
            molecule.atoms.len(),
            molecule.atom_count,
            molecule.bonds.len(),
            molecule.bond_count
        );
    }

    log::debug!(
        "decoded {} atoms and {} bonds",
        molecule.atoms.len(),
        molecule.bonds.len()
    );

    Ok(molecule)
}

impl FromStr for Molecule {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s.as_bytes())
    }
}

fn parse_counts(text: &str, line: usize) -> Result<(usize, usize), DecodeError> {
    let fields = text.split_whitespace().collect::<Vec<_>>();
    let &[atoms, bonds, ..] = fields.as_slice() else {
        return Err(DecodeError::TruncatedHeader {
            line,
            found: fields.len(),
        });
    };

    let count = |value: &str, field: CountField| {
        value
            .parse::<usize>()
            .map_err(|_| DecodeError::MalformedHeader {
                line,
                field,
                value: value.to_owned(),
            })
    };

    Ok((count(atoms, CountField::Atoms)?, count(bonds, CountField::Bonds)?))
}

fn parse_atom(text: &str, line: usize) -> Result<Atom, DecodeError> {
    let fields = text.split_whitespace().collect::<Vec<_>>();
    let &[x, y, z, element, ..] = fields.as_slice() else {
        return Err(DecodeError::TruncatedAtomRecord {
            line,
            found: fields.len(),
        });
    };

    let coordinate = |value: &str, axis: Axis| {
        value
            .parse::<f64>()
            .ok()
            // nan and infinities have no json representation
            .filter(|coordinate| coordinate.is_finite())
            .ok_or_else(|| DecodeError::MalformedCoordinate {
                line,
                axis,
                value: value.to_owned(),
            })
    };

    Ok(Atom {
        x: coordinate(x, Axis::X)?,
        y: coordinate(y, Axis::Y)?,
        z: coordinate(z, Axis::Z)?,
        element: element.to_owned(),
    })
}

fn parse_bond(text: &str, line: usize) -> Result<Bond, DecodeError> {
    let fields = text.split_whitespace().collect::<Vec<_>>();
    let &[atom1, atom2, bond_type, ..] = fields.as_slice() else {
        return Err(DecodeError::TruncatedBondRecord {
            line,
            found: fields.len(),
        });
    };

    let integer = |value: &str, field: BondField| {
        value
            .parse::<i64>()
            .map_err(|_| DecodeError::MalformedBond {
                line,
                field,
                value: value.to_owned(),
            })
    };

    Ok(Bond {
        atom1: integer(atom1, BondField::Atom1)?,
        atom2: integer(atom2, BondField::Atom2)?,
        bond_type: integer(bond_type, BondField::BondType)?,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{decode, read};
    use crate::{
        atom::Atom,
        bond::Bond,
        error::{Axis, BondField, CountField, DecodeError},
        molecule::Molecule,
        testing,
    };

    #[test]
    fn carbon_monoxide() {
        let molecule = decode(testing::CARBON_MONOXIDE.as_bytes()).unwrap();

        assert_eq!(molecule.atom_count, 2);
        assert_eq!(molecule.bond_count, 1);
        assert_eq!(
            molecule.atoms(),
            &[Atom::new("C", 0.0, 0.0, 0.0), Atom::new("O", 1.5, 0.0, 0.0)]
        );
        assert_eq!(molecule.bonds(), &[Bond::new(1, 2, 1)]);
    }

    #[test]
    fn water_from_ctfile_layout() {
        let molecule: Molecule = testing::WATER.parse().unwrap();

        assert!(molecule.is_complete());
        assert_eq!(molecule.atoms().len(), 3);
        assert_eq!(molecule.bonds().len(), 2);

        let oxygen = &molecule.atoms()[0];
        assert_eq!(oxygen.element, "O");
        assert_relative_eq!(oxygen.x, -0.0002);
        assert_relative_eq!(oxygen.y, 0.3905);
        assert_relative_eq!(oxygen.z, 0.0);

        assert_eq!(molecule.atoms()[2].element, "H");
        assert_eq!(molecule.bonds()[1], Bond::new(1, 3, 1));
    }

    #[test]
    fn short_input_is_not_an_error() {
        let input = testing::mol(&["2 1", "0.0 0.0 0.0 C"]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atom_count, 2);
        assert_eq!(molecule.bond_count, 1);
        assert_eq!(molecule.atoms().len(), 1);
        assert!(molecule.bonds().is_empty());
        assert!(!molecule.is_complete());
    }

    #[test]
    fn input_without_counts_line_is_empty() {
        let molecule = decode(b"title\nprogram\ncomment\n").unwrap();

        assert_eq!(molecule, Molecule::default());
        assert_eq!(decode(b"").unwrap(), Molecule::default());
    }

    #[test]
    fn header_lines_are_not_interpreted() {
        let input = "  1 0 junk\n\t\n99 99\n1 0\n1.0 2.0 3.0 N\n";
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atom_count, 1);
        assert_eq!(molecule.atoms(), &[Atom::new("N", 1.0, 2.0, 3.0)]);
    }

    #[test]
    fn trailing_lines_are_ignored() {
        let input = testing::mol(&[
            "1 1",
            "0.0 0.0 0.0 C",
            "1 1 1",
            "M  END",
            "not a record at all",
        ]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atoms().len(), 1);
        assert_eq!(molecule.bonds().len(), 1);
    }

    #[test]
    fn extra_fields_and_whitespace() {
        let input = testing::mol(&[
            "\t 2   1  0  0  0  0  0  0  0  0999 V2000  ",
            "   1.0\t-2.5   3e-1 Cl  0  0  0  0",
            "+4 .5 -0 Br",
            "  1\t 2  2  0  0  0  0 ",
        ]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atoms()[0], Atom::new("Cl", 1.0, -2.5, 0.3));
        assert_eq!(molecule.atoms()[1], Atom::new("Br", 4.0, 0.5, 0.0));
        assert_eq!(molecule.bonds(), &[Bond::new(1, 2, 2)]);
    }

    #[test]
    fn element_is_taken_verbatim() {
        let input = testing::mol(&["2 0", "0 0 0 cl", "0 0 0 Xyz123"]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atoms()[0].element, "cl");
        assert_eq!(molecule.atoms()[1].element, "Xyz123");
    }

    #[test]
    fn crlf_line_endings() {
        let input = "t\r\np\r\nc\r\n1 1\r\n0.5 0 0 H\r\n1 1 1\r\n";
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atoms(), &[Atom::new("H", 0.5, 0.0, 0.0)]);
        assert_eq!(molecule.bonds(), &[Bond::new(1, 1, 1)]);
    }

    #[test]
    fn zero_atoms_goes_straight_to_bonds() {
        let input = testing::mol(&["0 1", "7 8 9"]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert!(molecule.atoms().is_empty());
        assert_eq!(molecule.bonds(), &[Bond::new(7, 8, 9)]);
    }

    #[test]
    fn bond_indices_are_not_range_checked() {
        let input = testing::mol(&["1 1", "0 0 0 C", "-1 +42 0"]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.bonds(), &[Bond::new(-1, 42, 0)]);
    }

    #[test]
    fn huge_declared_counts() {
        let input = testing::mol(&["18446744073709551615 18446744073709551615", "0 0 0 C"]);
        let molecule = decode(input.as_bytes()).unwrap();

        assert_eq!(molecule.atom_count, usize::MAX);
        assert_eq!(molecule.atoms().len(), 1);
    }

    #[test]
    fn truncated_header() {
        let input = testing::mol(&["2"]);
        let error = decode(input.as_bytes()).unwrap_err();

        assert!(matches!(
            error,
            DecodeError::TruncatedHeader { line: 3, found: 1 }
        ));

        let error = decode(testing::mol(&["   "]).as_bytes()).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::TruncatedHeader { line: 3, found: 0 }
        ));
    }

    #[test]
    fn malformed_header() {
        let error = decode(testing::mol(&["two 1"]).as_bytes()).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::MalformedHeader { line: 3, field: CountField::Atoms, ref value } if value == "two"
        ));

        let error = decode(testing::mol(&["2 x"]).as_bytes()).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::MalformedHeader { field: CountField::Bonds, .. }
        ));
    }

    #[test]
    fn negative_counts_are_malformed() {
        let error = decode(testing::mol(&["-1 0"]).as_bytes()).unwrap_err();
        assert!(matches!(error, DecodeError::MalformedHeader { .. }));

        let error = decode(testing::mol(&["1.5 0"]).as_bytes()).unwrap_err();
        assert!(matches!(error, DecodeError::MalformedHeader { .. }));
    }

    #[test]
    fn truncated_atom_record() {
        let input = testing::mol(&["1 0", "0.0 0.0 C"]);
        let error = decode(input.as_bytes()).unwrap_err();

        assert!(matches!(
            error,
            DecodeError::TruncatedAtomRecord { line: 4, found: 3 }
        ));
    }

    #[test]
    fn malformed_coordinate() {
        for (record, expected_axis) in [
            ("abc 0.0 0.0 C", Axis::X),
            ("0.0 1,5 0.0 C", Axis::Y),
            ("0.0 0.0 -- C", Axis::Z),
        ] {
            let input = testing::mol(&["2 0", "0 0 0 H", record]);
            let error = decode(input.as_bytes()).unwrap_err();

            match error {
                DecodeError::MalformedCoordinate { line, axis, .. } => {
                    assert_eq!(line, 5);
                    assert_eq!(axis, expected_axis);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn non_finite_coordinates_are_malformed() {
        for (record, expected_axis) in [
            ("nan 0.0 0.0 C", Axis::X),
            ("0.0 inf 0.0 C", Axis::Y),
            ("0.0 0.0 -infinity C", Axis::Z),
            ("NaN inf -inf C", Axis::X),
        ] {
            let input = testing::mol(&["1 0", record]);
            let error = decode(input.as_bytes()).unwrap_err();

            match error {
                DecodeError::MalformedCoordinate { line, axis, .. } => {
                    assert_eq!(line, 4);
                    assert_eq!(axis, expected_axis);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn truncated_bond_record() {
        let input = testing::mol(&["1 1", "0 0 0 C", "1 2"]);
        let error = decode(input.as_bytes()).unwrap_err();

        assert!(matches!(
            error,
            DecodeError::TruncatedBondRecord { line: 5, found: 2 }
        ));
    }

    #[test]
    fn malformed_bond() {
        let error = decode(testing::mol(&["0 1", "1 abc 1"]).as_bytes()).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::MalformedBond { line: 4, field: BondField::Atom2, ref value } if value == "abc"
        ));

        let error = decode(testing::mol(&["0 1", "x 2 1"]).as_bytes()).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::MalformedBond { field: BondField::Atom1, .. }
        ));

        let error = decode(testing::mol(&["0 1", "1 2 1.0"]).as_bytes()).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::MalformedBond { field: BondField::BondType, .. }
        ));
    }

    #[test]
    fn invalid_utf8_in_a_record_is_a_read_failure() {
        let mut input = testing::mol(&["1 0"]).into_bytes();
        input.extend_from_slice(&[0xff, 0xfe, b' ', b'C', b'\n']);

        let error = decode(&input).unwrap_err();
        assert!(matches!(error, DecodeError::InputReadFailure { line: 4, .. }));

        let error = decode(b"t\np\nc\n\xb0 1\n").unwrap_err();
        assert!(matches!(error, DecodeError::InputReadFailure { line: 3, .. }));
    }

    #[test]
    fn header_lines_may_hold_any_bytes() {
        let input = b"title\nprog\nmeasured at 25\xb0C\n1 0\n0 0 0 C\n";
        let molecule = decode(input).unwrap();

        assert_eq!(molecule.atoms(), &[Atom::new("C", 0.0, 0.0, 0.0)]);
    }

    #[test]
    fn trailing_lines_may_hold_any_bytes() {
        let mut input = testing::mol(&["1 1", "0 0 0 C", "1 1 1"]).into_bytes();
        input.extend_from_slice(b"> <NAME>\n\xe9thanol\r\n$$$$\n");

        let molecule = decode(&input).unwrap();
        assert_eq!(molecule.atoms().len(), 1);
        assert_eq!(molecule.bonds(), &[Bond::new(1, 1, 1)]);
    }

    #[test]
    fn reads_from_any_buffered_reader() {
        let reader = std::io::BufReader::new(testing::WATER.as_bytes());
        let molecule = read(reader).unwrap();

        assert_eq!(molecule, decode(testing::WATER.as_bytes()).unwrap());
    }

    #[test]
    fn preserves_record_order() {
        let mut rng = StdRng::seed_from_u64(0x6d6f6c);

        for _ in 0..20 {
            let atom_count = rng.gen_range(0..50);
            let bond_count = rng.gen_range(0..50);
            let atoms = (0..atom_count)
                .map(|i| {
                    Atom::new(
                        testing::ELEMENTS[i % testing::ELEMENTS.len()],
                        rng.gen_range(-50.0..50.0),
                        rng.gen_range(-50.0..50.0),
                        rng.gen_range(-50.0..50.0),
                    )
                })
                .collect::<Vec<_>>();
            let bonds = (0..bond_count)
                .map(|_| {
                    Bond::new(
                        rng.gen_range(1..=atom_count.max(1) as i64),
                        rng.gen_range(1..=atom_count.max(1) as i64),
                        rng.gen_range(1..=3),
                    )
                })
                .collect::<Vec<_>>();
            let input = testing::fixture(&atoms, &bonds);

            let molecule = decode(input.as_bytes()).unwrap();

            assert_eq!(molecule.atom_count, atom_count);
            assert_eq!(molecule.bond_count, bond_count);
            assert_eq!(molecule.atoms(), atoms.as_slice());
            assert_eq!(molecule.bonds(), bonds.as_slice());
        }
    }
}
