use std::ops::Deref;
use std::convert::TryFrom;

use crate::error::StructureError;
use crate::dotbracket::{DotBracket, DotBracketVec};

/// A secondary structure as a partner lookup: `table[i]` holds the pairing
/// partner of position `i`, or `None` when `i` is unpaired.
///
/// Instances are only built through checked constructors, so every stored
/// pair is mutual and non-crossing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable(Vec<Option<usize>>);

impl PairTable {
    /// Builds a table from a pair list. Pairs must be pairwise disjoint and
    /// in-bounds; crossing pairs cannot be expressed in dot-bracket form and
    /// are rejected when converting back, not here.
    pub fn from_pairs(n: usize, pairs: &[(usize, usize)]) -> Self {
        let mut table = vec![None; n];
        for &(i, j) in pairs {
            debug_assert!(i < j && j < n, "invalid pair ({}, {})", i, j);
            debug_assert!(table[i].is_none() && table[j].is_none(), "duplicate index");
            table[i] = Some(j);
            table[j] = Some(i);
        }
        PairTable(table)
    }

    /// All base pairs `(i, j)` with `i < j`, in increasing order of `i`.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| p.filter(|&j| j > i).map(|j| (i, j)))
            .collect()
    }
}

impl Deref for PairTable {
    type Target = [Option<usize>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let dbv = DotBracketVec::try_from(s)?;
        PairTable::try_from(&dbv)
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(db: &DotBracketVec) -> Result<Self, Self::Error> {
        let mut stack: Vec<usize> = Vec::new();
        let mut table = vec![None; db.len()];

        for (i, dot) in db.iter().enumerate() {
            match dot {
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j);
                    table[j] = Some(i);
                }
                DotBracket::Unpaired => {}
            }
        }

        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }

        Ok(PairTable(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pair_table() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt[0], Some(5));
        assert_eq!(pt[1], Some(4));
        assert_eq!(pt[2], None);
        assert_eq!(pt[3], None);
        assert_eq!(pt[4], Some(1));
        assert_eq!(pt[5], Some(0));
    }

    #[test]
    fn test_unmatched_open() {
        let err = PairTable::try_from("(()").unwrap_err();
        assert_eq!(err, StructureError::UnmatchedOpen(0));
    }

    #[test]
    fn test_unmatched_close() {
        let err = PairTable::try_from("())").unwrap_err();
        assert_eq!(err, StructureError::UnmatchedClose(2));
    }

    #[test]
    fn test_invalid_character() {
        let err = PairTable::try_from("(x)").unwrap_err();
        assert_eq!(err, StructureError::InvalidCharacter('x', 1));
    }

    #[test]
    fn test_pairs_and_from_pairs() {
        let pt = PairTable::try_from("(.(...).)").unwrap();
        let pairs = pt.pairs();
        assert_eq!(pairs, vec![(0, 8), (2, 6)]);
        assert_eq!(PairTable::from_pairs(9, &pairs), pt);
    }

    #[test]
    fn test_dot_bracket_round_trip() {
        for s in ["", "....", "((((((....))))))", "((..))((..))", "(.(...).)"] {
            let pt = PairTable::try_from(s).unwrap();
            assert_eq!(DotBracketVec::from(&pt).to_string(), s);
        }
    }
}
