//! JSON output format.
//!
//! Field names and order follow the struct definitions: `atom_count`, `bond_count`,
//! `atoms` (`x`, `y`, `z`, `element`) and `bonds` (`atom1`, `atom2`, `bond_type`).

use std::io::Write;

use crate::molecule::Molecule;

/// Pretty-printed JSON with two space indentation
pub fn to_json(molecule: &Molecule) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(molecule)
}

/// Single line JSON without any whitespace
pub fn to_json_compact(molecule: &Molecule) -> Result<String, serde_json::Error> {
    serde_json::to_string(molecule)
}

/// Streams the JSON into `writer`, pretty-printed or compact
pub fn to_writer<W: Write>(
    writer: W,
    molecule: &Molecule,
    pretty: bool,
) -> Result<(), serde_json::Error> {
    if pretty {
        serde_json::to_writer_pretty(writer, molecule)
    } else {
        serde_json::to_writer(writer, molecule)
    }
}

/// Loads a molecule previously written by [`to_json`] or [`to_json_compact`]
pub fn from_json(json: &str) -> Result<Molecule, serde_json::Error> {
    serde_json::from_str(json)
}
