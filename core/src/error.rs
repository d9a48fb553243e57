use std::fmt;

use thiserror::Error;

/// Which of the two counts on the counts line failed to parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CountField {
    Atoms,
    Bonds,
}

/// Coordinate axis of an atom record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Integer field of a bond record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BondField {
    Atom1,
    Atom2,
    BondType,
}

impl fmt::Display for CountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountField::Atoms => write!(f, "atom count"),
            CountField::Bonds => write!(f, "bond count"),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

impl fmt::Display for BondField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondField::Atom1 => write!(f, "first atom index"),
            BondField::Atom2 => write!(f, "second atom index"),
            BondField::BondType => write!(f, "bond type"),
        }
    }
}

/// Everything that can go wrong while decoding a mol file.
///
/// `line` is always the zero-based index of the offending line. The `Truncated*`
/// variants mean a record had too few fields, the `Malformed*` variants mean a
/// field was present but not a valid number.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("counts line has {found} field(s), expected atom and bond counts (line {line})")]
    TruncatedHeader { line: usize, found: usize },

    #[error("invalid {field} '{value}' on counts line (line {line})")]
    MalformedHeader {
        line: usize,
        field: CountField,
        value: String,
    },

    #[error("atom record has {found} field(s), expected at least 4 (line {line})")]
    TruncatedAtomRecord { line: usize, found: usize },

    #[error("invalid {axis} coordinate '{value}' in atom record (line {line})")]
    MalformedCoordinate {
        line: usize,
        axis: Axis,
        value: String,
    },

    #[error("bond record has {found} field(s), expected at least 3 (line {line})")]
    TruncatedBondRecord { line: usize, found: usize },

    #[error("invalid {field} '{value}' in bond record (line {line})")]
    MalformedBond {
        line: usize,
        field: BondField,
        value: String,
    },

    #[error("failed to read input (line {line}): {source}")]
    InputReadFailure {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl DecodeError {
    /// Returns the zero-based index of the line that caused this error
    pub fn line(&self) -> usize {
        match *self {
            DecodeError::TruncatedHeader { line, .. }
            | DecodeError::MalformedHeader { line, .. }
            | DecodeError::TruncatedAtomRecord { line, .. }
            | DecodeError::MalformedCoordinate { line, .. }
            | DecodeError::TruncatedBondRecord { line, .. }
            | DecodeError::MalformedBond { line, .. }
            | DecodeError::InputReadFailure { line, .. } => line,
        }
    }

    /// True if a record was missing fields, as opposed to holding an unparsable value
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecodeError::TruncatedHeader { .. }
                | DecodeError::TruncatedAtomRecord { .. }
                | DecodeError::TruncatedBondRecord { .. }
        )
    }
}
