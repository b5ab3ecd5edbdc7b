use std::fmt;

use sf_folding::Base;

/// The nucleotide pair assigned to a base pair: 5'-residue then 3'-residue.
///
/// AU and UA are the "grey" colors; GC shifts the level down the tree by +1
/// and CG by -1, grey colors leave it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairColor { AU, UA, GC, CG }

impl PairColor {
    pub const ALL: [PairColor; 4] = [PairColor::AU, PairColor::UA, PairColor::GC, PairColor::CG];

    pub fn is_grey(&self) -> bool {
        matches!(self, PairColor::AU | PairColor::UA)
    }

    pub fn level_shift(&self) -> i64 {
        match self {
            PairColor::GC => 1,
            PairColor::CG => -1,
            PairColor::AU | PairColor::UA => 0,
        }
    }

    pub fn five_prime(&self) -> Base {
        match self {
            PairColor::AU => Base::A,
            PairColor::UA => Base::U,
            PairColor::GC => Base::G,
            PairColor::CG => Base::C,
        }
    }

    pub fn three_prime(&self) -> Base {
        match self {
            PairColor::AU => Base::U,
            PairColor::UA => Base::A,
            PairColor::GC => Base::C,
            PairColor::CG => Base::G,
        }
    }

    pub fn from_bases(a: Base, b: Base) -> Option<PairColor> {
        match (a, b) {
            (Base::A, Base::U) => Some(PairColor::AU),
            (Base::U, Base::A) => Some(PairColor::UA),
            (Base::G, Base::C) => Some(PairColor::GC),
            (Base::C, Base::G) => Some(PairColor::CG),
            _ => None,
        }
    }
}

impl fmt::Display for PairColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.five_prime(), self.three_prime())
    }
}

/// The color a node contributes as a parent: either a concrete pair color
/// or the synthetic root. Modelling the root explicitly keeps the fixed
/// compatibility table total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentColor {
    Root,
    Paired(PairColor),
}

impl ParentColor {
    /// The colors a paired child may take under this parent. Fixed domain
    /// knowledge; the row order also fixes the sampling branch order.
    pub fn palette(&self) -> &'static [PairColor] {
        use PairColor::*;
        match self {
            ParentColor::Root => &[GC, UA, CG, AU],
            ParentColor::Paired(AU) => &[AU, GC, CG],
            ParentColor::Paired(UA) => &[UA, GC, CG],
            ParentColor::Paired(GC) => &[UA, GC, AU],
            ParentColor::Paired(CG) => &[UA, CG, AU],
        }
    }

    pub fn is_grey(&self) -> bool {
        matches!(self, ParentColor::Paired(c) if c.is_grey())
    }

    pub fn level_shift(&self) -> i64 {
        match self {
            ParentColor::Root => 0,
            ParentColor::Paired(c) => c.level_shift(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residues_round_trip() {
        for c in PairColor::ALL {
            assert_eq!(PairColor::from_bases(c.five_prime(), c.three_prime()), Some(c));
        }
        assert_eq!(PairColor::from_bases(Base::G, Base::U), None);
        assert_eq!(PairColor::from_bases(Base::A, Base::A), None);
    }

    #[test]
    fn test_level_shifts() {
        assert_eq!(PairColor::GC.level_shift(), 1);
        assert_eq!(PairColor::CG.level_shift(), -1);
        assert_eq!(PairColor::AU.level_shift(), 0);
        assert_eq!(PairColor::UA.level_shift(), 0);
        assert_eq!(ParentColor::Root.level_shift(), 0);
    }

    #[test]
    fn test_palettes() {
        use PairColor::*;
        assert_eq!(ParentColor::Root.palette(), &[GC, UA, CG, AU]);
        assert_eq!(ParentColor::Paired(AU).palette(), &[AU, GC, CG]);
        assert_eq!(ParentColor::Paired(UA).palette(), &[UA, GC, CG]);
        assert_eq!(ParentColor::Paired(GC).palette(), &[UA, GC, AU]);
        assert_eq!(ParentColor::Paired(CG).palette(), &[UA, CG, AU]);
    }

    #[test]
    fn test_grey() {
        assert!(PairColor::AU.is_grey());
        assert!(PairColor::UA.is_grey());
        assert!(!PairColor::GC.is_grey());
        assert!(!ParentColor::Root.is_grey());
        assert!(ParentColor::Paired(PairColor::UA).is_grey());
    }
}
