pub mod atom;
pub mod bond;
pub mod decode;
pub mod error;
pub mod json;
pub mod molecule;
pub mod testing;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use decode::{decode, read};
pub use error::DecodeError;
pub use molecule::Molecule;
