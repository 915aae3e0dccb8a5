/// Atom payload for a molecular graph node.
///
/// Stores the intrinsic properties the perception passes read: element,
/// suppressed hydrogen count, formal charge, and the aromaticity flag.
/// The flag is written by aromaticity perception, or set directly by a
/// caller that already knows which atoms are aromatic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …).
    pub atomic_num: u8,
    /// Number of virtual (suppressed) hydrogens on this atom.
    pub hydrogen_count: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Whether this atom belongs to an aromatic ring.
    pub is_aromatic: bool,
}

impl Atom {
    pub fn new(atomic_num: u8) -> Self {
        Self {
            atomic_num,
            ..Self::default()
        }
    }

    pub fn carbon() -> Self {
        Self::new(6)
    }

    /// An atom pre-flagged aromatic, for callers that skip perception.
    pub fn aromatic(atomic_num: u8) -> Self {
        Self {
            atomic_num,
            is_aromatic: true,
            ..Self::default()
        }
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.hydrogen_count = count;
        self
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}
