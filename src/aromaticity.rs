use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Molecule;
use crate::rings::RingSet;
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};

const SP2_CAPABLE: [u8; 9] = [
    5,  // B
    6,  // C
    7,  // N
    8,  // O
    15, // P
    16, // S
    33, // As
    34, // Se
    52, // Te
];

/// Per-atom aromaticity flags from a simplified Hueckel model: an SSSR
/// ring is aromatic when all atoms are sp2-capable, it contains no
/// triple bond, and the ring pi-electron count is 4n+2.
pub fn perceive_aromatic_atoms<A, B>(mol: &Molecule<A, B>, rings: &RingSet) -> Vec<bool>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let mut aromatic = vec![false; mol.atom_count()];
    for ring in rings.rings() {
        if is_aromatic_ring(mol, ring) {
            for &atom in ring {
                aromatic[atom.index()] = true;
            }
        }
    }
    aromatic
}

/// Perceive and write the flags into the molecule's atoms.
pub fn set_aromaticity(mol: &mut Molecule<Atom, Bond>) {
    let rings = RingSet::sssr(mol);
    let flags = perceive_aromatic_atoms(mol, &rings);
    let atoms: Vec<_> = mol.atoms().collect();
    for idx in atoms {
        mol.atom_mut(idx).is_aromatic = flags[idx.index()];
    }
}

fn is_aromatic_ring<A, B>(mol: &Molecule<A, B>, ring: &[NodeIndex]) -> bool
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    if ring.len() < 3 {
        return false;
    }

    for &atom in ring {
        if !SP2_CAPABLE.contains(&mol.atom(atom).atomic_num()) {
            return false;
        }
    }

    for i in 0..ring.len() {
        if let Some(edge) = mol.bond_between(ring[i], ring[(i + 1) % ring.len()]) {
            if mol.bond(edge).bond_order() == BondOrder::Triple {
                return false;
            }
        }
    }

    let mut pi_total: u8 = 0;
    for &atom in ring {
        match ring_pi_electrons(mol, atom, ring) {
            Some(e) => pi_total = pi_total.saturating_add(e),
            None => return false,
        }
    }

    is_huckel(pi_total)
}

/// Pi electrons one atom contributes to its ring, or `None` when the
/// atom cannot take part in the pi system at all.
fn ring_pi_electrons<A, B>(mol: &Molecule<A, B>, atom: NodeIndex, ring: &[NodeIndex]) -> Option<u8>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let mut ring_double = false;
    let mut ring_delocalized = false;
    let mut exo_double = false;

    for edge in mol.bonds_of(atom) {
        let order = mol.bond(edge).bond_order();
        let (a, b) = mol.bond_endpoints(edge)?;
        let other = if a == atom { b } else { a };
        let in_ring = ring.contains(&other);
        match order {
            BondOrder::Double if in_ring => ring_double = true,
            BondOrder::Double => exo_double = true,
            BondOrder::Aromatic if in_ring => ring_delocalized = true,
            _ => {}
        }
    }

    if ring_double {
        return Some(1);
    }

    let anum = mol.atom(atom).atomic_num();
    if ring_delocalized {
        // No Kekulé assignment to consult; lone-pair donors still
        // contribute the pair (pyrrole NH, furan O), the rest one
        // electron each.
        return Some(match anum {
            8 | 16 | 34 | 52 => 2,
            7 | 15 if mol.atom(atom).hydrogen_count() > 0 => 2,
            _ => 1,
        });
    }

    if exo_double {
        return Some(0);
    }

    match anum {
        7 | 8 | 15 | 16 | 33 | 34 | 52 => Some(2),
        6 if mol.atom(atom).formal_charge() < 0 => Some(2),
        _ => None,
    }
}

fn is_huckel(pi: u8) -> bool {
    pi >= 2 && (pi - 2) % 4 == 0
}
