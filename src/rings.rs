use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::mol::Molecule;

/// The smallest set of smallest rings (SSSR) of a molecule.
///
/// Rings are stored as atom-index cycles in a deterministic order:
/// smallest first, ties broken lexicographically on the normalized
/// cycle. That order is what downstream classification iterates, so two
/// perceptions of the same molecule always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingSet {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingSet {
    pub fn sssr<A, B>(mol: &Molecule<A, B>) -> Self {
        let expected = cyclomatic_number(mol);
        if expected == 0 {
            return Self::default();
        }

        let paths = ShortestPaths::compute(mol);
        let mut candidates = candidate_cycles(mol, &paths);
        candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        candidates.dedup();

        let rings = independent_subset(mol, &candidates, expected);
        debug!(expected, found = rings.len(), "perceived sssr");

        Self { rings }
    }

    /// Wrap a ring decomposition computed elsewhere.
    pub fn from_rings(rings: Vec<Vec<NodeIndex>>) -> Self {
        Self { rings }
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(&atom))
    }
}

/// Number of independent rings: E - V + C.
pub fn cyclomatic_number<A, B>(mol: &Molecule<A, B>) -> usize {
    let v = mol.atom_count();
    let e = mol.bond_count();
    let c = connected_components(mol.graph());
    (e + c).saturating_sub(v)
}

const UNREACHABLE: u32 = u32::MAX;

/// All-pairs BFS shortest paths: distances plus one predecessor tree per
/// source, built in a single traversal each.
struct ShortestPaths {
    dist: Vec<Vec<u32>>,
    pred: Vec<Vec<Option<NodeIndex>>>,
}

impl ShortestPaths {
    fn compute<A, B>(mol: &Molecule<A, B>) -> Self {
        let n = mol.atom_count();
        let mut dist = vec![vec![UNREACHABLE; n]; n];
        let mut pred = vec![vec![None; n]; n];

        for src_idx in 0..n {
            let src = NodeIndex::new(src_idx);
            dist[src_idx][src_idx] = 0;
            let mut queue = VecDeque::from([src]);
            while let Some(cur) = queue.pop_front() {
                let d = dist[src_idx][cur.index()];
                for nb in mol.neighbors(cur) {
                    if dist[src_idx][nb.index()] == UNREACHABLE {
                        dist[src_idx][nb.index()] = d + 1;
                        pred[src_idx][nb.index()] = Some(cur);
                        queue.push_back(nb);
                    }
                }
            }
        }

        Self { dist, pred }
    }

    fn distance(&self, src: NodeIndex, dst: NodeIndex) -> u32 {
        self.dist[src.index()][dst.index()]
    }

    fn path(&self, src: NodeIndex, dst: NodeIndex) -> Option<Vec<NodeIndex>> {
        if self.distance(src, dst) == UNREACHABLE {
            return None;
        }
        let mut path = vec![dst];
        let mut cur = dst;
        while cur != src {
            cur = self.pred[src.index()][cur.index()]?;
            path.push(cur);
        }
        path.reverse();
        Some(path)
    }
}

/// Horton's candidate set: for every bond (u, v) and every vertex w, the
/// cycle formed by the shortest paths w->u and w->v plus the bond,
/// provided the two paths meet only at w.
fn candidate_cycles<A, B>(mol: &Molecule<A, B>, paths: &ShortestPaths) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut candidates = Vec::new();

    for edge in mol.bonds() {
        let Some((u, v)) = mol.bond_endpoints(edge) else {
            continue;
        };
        for w_idx in 0..n {
            let w = NodeIndex::new(w_idx);
            let du = paths.distance(w, u);
            let dv = paths.distance(w, v);
            if du == UNREACHABLE || dv == UNREACHABLE {
                continue;
            }
            if du as usize + dv as usize + 1 < 3 {
                continue;
            }
            let (Some(path_u), Some(path_v)) = (paths.path(w, u), paths.path(w, v)) else {
                continue;
            };
            if shares_internal_vertex(&path_u, &path_v) {
                continue;
            }

            let mut cycle = path_u;
            cycle.extend(path_v[1..].iter().rev());
            candidates.push(normalize_cycle(&cycle));
        }
    }

    candidates
}

fn shares_internal_vertex(path_u: &[NodeIndex], path_v: &[NodeIndex]) -> bool {
    if path_u.len() < 2 || path_v.len() < 2 {
        return false;
    }
    path_u[1..].iter().any(|node| path_v[1..].contains(node))
}

/// Bit set over the molecule's bond indices; cycles are vectors over
/// GF(2) in this space.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EdgeBits {
    words: Vec<u64>,
}

impl EdgeBits {
    fn of_ring<A, B>(mol: &Molecule<A, B>, ring: &[NodeIndex]) -> Self {
        let mut bits = Self {
            words: vec![0; mol.bond_count().div_ceil(64)],
        };
        let len = ring.len();
        for i in 0..len {
            if let Some(edge) = mol.bond_between(ring[i], ring[(i + 1) % len]) {
                bits.set(edge.index());
            }
        }
        bits
    }

    fn set(&mut self, bit: usize) {
        self.words[bit / 64] |= 1 << (bit % 64);
    }

    fn get(&self, bit: usize) -> bool {
        self.words[bit / 64] & (1 << (bit % 64)) != 0
    }

    fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    fn lowest_set(&self) -> Option<usize> {
        self.words
            .iter()
            .position(|&w| w != 0)
            .map(|i| i * 64 + self.words[i].trailing_zeros() as usize)
    }

    fn xor_assign(&mut self, other: &Self) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
    }
}

/// Greedily pick candidates whose edge vectors are linearly independent
/// over GF(2), smallest first, until the cyclomatic count is reached.
fn independent_subset<A, B>(
    mol: &Molecule<A, B>,
    candidates: &[Vec<NodeIndex>],
    expected: usize,
) -> Vec<Vec<NodeIndex>> {
    let mut basis: Vec<EdgeBits> = Vec::with_capacity(expected);
    let mut chosen = Vec::with_capacity(expected);

    for ring in candidates {
        if chosen.len() == expected {
            break;
        }
        let mut bits = EdgeBits::of_ring(mol, ring);
        for row in &basis {
            if let Some(pivot) = row.lowest_set() {
                if bits.get(pivot) {
                    bits.xor_assign(row);
                }
            }
        }
        if bits.is_zero() {
            continue;
        }
        basis.push(bits);
        chosen.push(ring.clone());
    }

    chosen
}

/// Rotate the cycle so the smallest atom index leads, then fix the
/// direction so the second element is the smaller neighbor. Makes equal
/// cycles compare equal regardless of traversal.
fn normalize_cycle(cycle: &[NodeIndex]) -> Vec<NodeIndex> {
    let len = cycle.len();
    if len == 0 {
        return Vec::new();
    }
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut normalized: Vec<NodeIndex> = (0..len).map(|i| cycle[(start + i) % len]).collect();
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}
