#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    /// Delocalized bond inside an aromatic ring. This crate never
    /// kekulizes; a caller drawing an aromatic ring states it directly.
    Aromatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bond {
    pub order: BondOrder,
}

impl Bond {
    pub fn single() -> Self {
        Self {
            order: BondOrder::Single,
        }
    }

    pub fn double() -> Self {
        Self {
            order: BondOrder::Double,
        }
    }

    pub fn triple() -> Self {
        Self {
            order: BondOrder::Triple,
        }
    }

    pub fn aromatic() -> Self {
        Self {
            order: BondOrder::Aromatic,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}
