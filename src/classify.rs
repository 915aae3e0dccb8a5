//! Ring classification: sorts a molecule's SSSR rings into plain rings,
//! isolated aromatic rings, and fused aromatic systems.
//!
//! Aromatic rings that share atoms are folded into a single named
//! "aromatic system" whose membership is the union of the fused rings.
//! Each ring lands in exactly one category; names carry per-category
//! counters (`ring_1`, `aromatic_1`, `aromaticsystem_1`, …) assigned in
//! discovery order, so the same molecule always reports the same names.

use std::collections::HashSet;
use std::fmt;

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::mol::Molecule;
use crate::rings::RingSet;
use crate::traits::HasAromaticity;

/// A ring list referenced an atom that is not a node of the molecule.
///
/// Raised before any classification state is built; the ring position
/// refers to the input ring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMoleculeGraph {
    pub ring: usize,
    pub atom: usize,
}

impl fmt::Display for InvalidMoleculeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ring {} references atom {} outside the molecule",
            self.ring, self.atom
        )
    }
}

impl std::error::Error for InvalidMoleculeGraph {}

/// Result of ring classification.
///
/// `entries` lists `(name, size)` in discovery order; the three
/// category accessors expose `name -> sorted distinct atom indices`
/// mappings in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingClassification {
    entries: Vec<(String, usize)>,
    systems: Vec<(String, Vec<NodeIndex>)>,
    aromatic_rings: Vec<(String, Vec<NodeIndex>)>,
    plain_rings: Vec<(String, Vec<NodeIndex>)>,
}

impl RingClassification {
    /// `(name, size)` pairs in discovery order. A system's size is its
    /// distinct atom count, not the sum of its rings' sizes.
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn systems(&self) -> &[(String, Vec<NodeIndex>)] {
        &self.systems
    }

    pub fn aromatic_rings(&self) -> &[(String, Vec<NodeIndex>)] {
        &self.aromatic_rings
    }

    pub fn plain_rings(&self) -> &[(String, Vec<NodeIndex>)] {
        &self.plain_rings
    }

    pub fn system(&self, name: &str) -> Option<&[NodeIndex]> {
        lookup(&self.systems, name)
    }

    pub fn aromatic_ring(&self, name: &str) -> Option<&[NodeIndex]> {
        lookup(&self.aromatic_rings, name)
    }

    pub fn plain_ring(&self, name: &str) -> Option<&[NodeIndex]> {
        lookup(&self.plain_rings, name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup<'a>(map: &'a [(String, Vec<NodeIndex>)], name: &str) -> Option<&'a [NodeIndex]> {
    map.iter()
        .find(|(n, _)| n == name)
        .map(|(_, atoms)| atoms.as_slice())
}

/// Perceive the SSSR and classify it. See [`classify_rings`].
pub fn classify<A, B>(mol: &Molecule<A, B>) -> Result<RingClassification, InvalidMoleculeGraph>
where
    A: HasAromaticity,
{
    let rings = RingSet::sssr(mol);
    classify_rings(mol, rings.rings())
}

/// Classify `rings` (in the given order, which fixes naming and merge
/// precedence) against the molecule's aromaticity flags.
///
/// An empty ring list yields an empty result.
pub fn classify_rings<A, B>(
    mol: &Molecule<A, B>,
    rings: &[Vec<NodeIndex>],
) -> Result<RingClassification, InvalidMoleculeGraph>
where
    A: HasAromaticity,
{
    validate(mol, rings)?;

    let aromatic: Vec<bool> = mol.atoms().map(|idx| mol.atom(idx).is_aromatic()).collect();
    let mut state = Classifier::new(aromatic);

    for i in 0..rings.len() {
        let category = state.categorize(&rings[i], &rings[i + 1..]);
        state.dispatch(&rings[i], &rings[i + 1..], category);
    }

    Ok(state.finish())
}

fn validate<A, B>(mol: &Molecule<A, B>, rings: &[Vec<NodeIndex>]) -> Result<(), InvalidMoleculeGraph> {
    let atom_count = mol.atom_count();
    for (i, ring) in rings.iter().enumerate() {
        for &atom in ring {
            if atom.index() >= atom_count {
                return Err(InvalidMoleculeGraph {
                    ring: i,
                    atom: atom.index(),
                });
            }
        }
    }
    Ok(())
}

/// Which bucket a ring falls into, decided before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Category {
    /// Fully aromatic and sharing atoms with at least one later aromatic
    /// ring; `partners` holds positions into the not-yet-visited slice.
    Fused { partners: Vec<usize> },
    /// Already folded into a system as a fusion partner; emit nothing.
    Absorbed,
    /// Fully aromatic, standing alone (or joining an existing system).
    Aromatic,
    Plain,
}

/// One in-progress aromatic system. Atom lists accumulate duplicates
/// while rings merge in; `finish` deduplicates exactly once.
#[derive(Debug)]
struct System {
    name: String,
    atoms: Vec<NodeIndex>,
}

struct Classifier {
    aromatic: Vec<bool>,
    systems: Vec<System>,
    aromatic_rings: Vec<(String, Vec<NodeIndex>)>,
    plain_rings: Vec<(String, Vec<NodeIndex>)>,
    absorbed: HashSet<NodeIndex>,
    entries: Vec<(String, usize)>,
    system_count: usize,
    aromatic_count: usize,
    plain_count: usize,
}

impl Classifier {
    fn new(aromatic: Vec<bool>) -> Self {
        Self {
            aromatic,
            systems: Vec::new(),
            aromatic_rings: Vec::new(),
            plain_rings: Vec::new(),
            absorbed: HashSet::new(),
            entries: Vec::new(),
            system_count: 0,
            aromatic_count: 0,
            plain_count: 0,
        }
    }

    fn is_fully_aromatic(&self, ring: &[NodeIndex]) -> bool {
        ring.iter().all(|atom| self.aromatic[atom.index()])
    }

    fn categorize(&self, ring: &[NodeIndex], later: &[Vec<NodeIndex>]) -> Category {
        if self.is_fully_aromatic(ring) && later.iter().any(|r| overlaps(ring, r)) {
            let partners: Vec<usize> = later
                .iter()
                .enumerate()
                .filter(|(_, r)| self.is_fully_aromatic(r) && overlaps(ring, r))
                .map(|(i, _)| i)
                .collect();
            // No aromatic partner means the shared atoms belong to a
            // non-aromatic neighbor; fall through to the checks below.
            if !partners.is_empty() {
                return Category::Fused { partners };
            }
        }

        if ring.iter().all(|atom| self.absorbed.contains(atom)) {
            return Category::Absorbed;
        }

        if self.is_fully_aromatic(ring) {
            return Category::Aromatic;
        }

        Category::Plain
    }

    fn dispatch(&mut self, ring: &[NodeIndex], later: &[Vec<NodeIndex>], category: Category) {
        match category {
            Category::Fused { partners } => {
                for partner in partners {
                    self.fuse(ring, &later[partner]);
                }
            }
            Category::Absorbed => {}
            Category::Aromatic => {
                if !self.merge_into_matching_systems(ring) {
                    self.aromatic_count += 1;
                    let name = format!("aromatic_{}", self.aromatic_count);
                    self.entries.push((name.clone(), ring.len()));
                    self.aromatic_rings.push((name, sorted(ring)));
                }
            }
            Category::Plain => {
                self.plain_count += 1;
                let name = format!("ring_{}", self.plain_count);
                self.entries.push((name.clone(), ring.len()));
                self.plain_rings.push((name, sorted(ring)));
            }
        }
    }

    /// Fuse `ring` with one partner. The first partner seeds a new
    /// system and is marked absorbed; once `ring` belongs to a system,
    /// further partners only re-merge `ring` and stay unabsorbed; they
    /// join the system on their own turn.
    fn fuse(&mut self, ring: &[NodeIndex], partner: &[NodeIndex]) {
        if self.merge_into_matching_systems(ring) {
            return;
        }
        self.system_count += 1;
        let name = format!("aromaticsystem_{}", self.system_count);
        let mut atoms = ring.to_vec();
        atoms.extend_from_slice(partner);
        self.absorbed.extend(partner.iter().copied());
        // Size placeholder; resolved after all rings are seen.
        self.entries.push((name.clone(), 0));
        self.systems.push(System { name, atoms });
    }

    /// Append `ring`'s atoms to every system it overlaps. A ring
    /// touching several in-progress systems updates all of them; the
    /// systems themselves are never merged with each other.
    fn merge_into_matching_systems(&mut self, ring: &[NodeIndex]) -> bool {
        let mut matched = false;
        for system in &mut self.systems {
            if overlaps(ring, &system.atoms) {
                matched = true;
                system.atoms.extend_from_slice(ring);
            }
        }
        matched
    }

    fn finish(mut self) -> RingClassification {
        normalize(&mut self.systems, &mut self.entries);
        debug!(
            systems = self.systems.len(),
            aromatic = self.aromatic_rings.len(),
            plain = self.plain_rings.len(),
            "classified rings"
        );
        RingClassification {
            entries: self.entries,
            systems: self
                .systems
                .into_iter()
                .map(|s| (s.name, s.atoms))
                .collect(),
            aromatic_rings: self.aromatic_rings,
            plain_rings: self.plain_rings,
        }
    }
}

/// Deduplicate each system's accumulated atoms and resolve its entry to
/// the distinct count, in place. Running this on an already-normalized
/// state changes nothing.
fn normalize(systems: &mut [System], entries: &mut [(String, usize)]) {
    for system in systems {
        system.atoms.sort();
        system.atoms.dedup();
        if let Some(entry) = entries.iter_mut().find(|(name, _)| *name == system.name) {
            entry.1 = system.atoms.len();
        }
    }
}

fn overlaps(a: &[NodeIndex], b: &[NodeIndex]) -> bool {
    a.iter().any(|atom| b.contains(atom))
}

fn sorted(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let mut atoms = ring.to_vec();
    atoms.sort();
    atoms.dedup();
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn ring_of(atoms: &[usize]) -> Vec<NodeIndex> {
        atoms.iter().map(|&i| n(i)).collect()
    }

    /// Molecule with the given per-atom flags and no bonds; rings are
    /// fed to `classify_rings` directly.
    fn flagged(flags: &[bool]) -> Molecule<Atom, Bond> {
        let mut mol = Molecule::new();
        for &aromatic in flags {
            mol.add_atom(Atom {
                is_aromatic: aromatic,
                ..Atom::carbon()
            });
        }
        mol
    }

    #[test]
    fn empty_ring_list_yields_empty_result() {
        let mol = flagged(&[true, false]);
        let result = classify_rings(&mol, &[]).unwrap();
        assert!(result.is_empty());
        assert!(result.systems().is_empty());
        assert!(result.aromatic_rings().is_empty());
        assert!(result.plain_rings().is_empty());
    }

    #[test]
    fn categorize_plain_ring() {
        let state = Classifier::new(vec![false; 6]);
        let cat = state.categorize(&ring_of(&[0, 1, 2, 3, 4, 5]), &[]);
        assert_eq!(cat, Category::Plain);
    }

    #[test]
    fn categorize_standalone_aromatic() {
        let state = Classifier::new(vec![true; 6]);
        let cat = state.categorize(&ring_of(&[0, 1, 2, 3, 4, 5]), &[]);
        assert_eq!(cat, Category::Aromatic);
    }

    #[test]
    fn categorize_partially_aromatic_ring_is_plain() {
        let mut flags = vec![true; 6];
        flags[3] = false;
        let state = Classifier::new(flags);
        let cat = state.categorize(&ring_of(&[0, 1, 2, 3, 4, 5]), &[]);
        assert_eq!(cat, Category::Plain);
    }

    #[test]
    fn categorize_fused_pair() {
        let state = Classifier::new(vec![true; 10]);
        let later = vec![ring_of(&[4, 5, 6, 7, 8, 9])];
        let cat = state.categorize(&ring_of(&[0, 1, 2, 3, 4, 5]), &later);
        assert_eq!(cat, Category::Fused { partners: vec![0] });
    }

    #[test]
    fn categorize_overlap_with_nonaromatic_neighbor_falls_through() {
        let mut flags = vec![true; 10];
        for f in flags.iter_mut().skip(6) {
            *f = false;
        }
        let state = Classifier::new(flags);
        // Later ring shares atoms 4,5 but is not fully aromatic.
        let later = vec![ring_of(&[4, 5, 6, 7, 8, 9])];
        let cat = state.categorize(&ring_of(&[0, 1, 2, 3, 4, 5]), &later);
        assert_eq!(cat, Category::Aromatic);
    }

    #[test]
    fn categorize_absorbed_ring_is_skipped() {
        let mut state = Classifier::new(vec![true; 10]);
        state.absorbed.extend(ring_of(&[4, 5, 6, 7, 8, 9]));
        let cat = state.categorize(&ring_of(&[4, 5, 6, 7, 8, 9]), &[]);
        assert_eq!(cat, Category::Absorbed);
    }

    #[test]
    fn fusion_creates_one_system_and_absorbs_partner() {
        let mol = flagged(&[true; 10]);
        let rings = [ring_of(&[0, 1, 2, 3, 4, 5]), ring_of(&[4, 5, 6, 7, 8, 9])];
        let result = classify_rings(&mol, &rings).unwrap();

        assert_eq!(result.entries(), &[("aromaticsystem_1".to_string(), 10)]);
        assert_eq!(
            result.system("aromaticsystem_1").unwrap(),
            ring_of(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).as_slice()
        );
        assert!(result.aromatic_rings().is_empty());
        assert!(result.plain_rings().is_empty());
    }

    #[test]
    fn counters_start_at_one_and_never_reset() {
        let mol = flagged(&[false; 12]);
        let rings = [
            ring_of(&[0, 1, 2, 3]),
            ring_of(&[4, 5, 6, 7]),
            ring_of(&[8, 9, 10, 11]),
        ];
        let result = classify_rings(&mol, &rings).unwrap();
        let names: Vec<&str> = result.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["ring_1", "ring_2", "ring_3"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut systems = vec![System {
            name: "aromaticsystem_1".to_string(),
            atoms: ring_of(&[0, 1, 2, 3, 4, 5, 4, 5, 6, 7, 8, 9]),
        }];
        let mut entries = vec![("aromaticsystem_1".to_string(), 0)];

        normalize(&mut systems, &mut entries);
        assert_eq!(entries[0].1, 10);
        let first = systems[0].atoms.clone();

        normalize(&mut systems, &mut entries);
        assert_eq!(entries[0].1, 10);
        assert_eq!(systems[0].atoms, first);
    }

    #[test]
    fn out_of_range_atom_fails_fast() {
        let mol = flagged(&[true, true, true]);
        let rings = [ring_of(&[0, 1, 2]), ring_of(&[1, 2, 7])];
        let err = classify_rings(&mol, &rings).unwrap_err();
        assert_eq!(err, InvalidMoleculeGraph { ring: 1, atom: 7 });
        assert_eq!(
            err.to_string(),
            "ring 1 references atom 7 outside the molecule"
        );
    }

    #[test]
    fn memberships_are_sorted() {
        let mol = flagged(&[false; 6]);
        let rings = [ring_of(&[5, 3, 1, 0, 2, 4])];
        let result = classify_rings(&mol, &rings).unwrap();
        assert_eq!(
            result.plain_ring("ring_1").unwrap(),
            ring_of(&[0, 1, 2, 3, 4, 5]).as_slice()
        );
    }
}
