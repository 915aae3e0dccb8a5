pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod classify;
pub mod mol;
pub mod rings;
pub mod traits;

pub use aromaticity::{perceive_aromatic_atoms, set_aromaticity};
pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use classify::{classify, classify_rings, InvalidMoleculeGraph, RingClassification};
pub use mol::Molecule;
pub use rings::{cyclomatic_number, RingSet};
pub use traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount,
};
