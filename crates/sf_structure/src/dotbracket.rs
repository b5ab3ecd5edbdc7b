use std::fmt;
use std::ops::Deref;
use std::convert::TryFrom;

use crate::pair_table::PairTable;
use crate::error::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotBracket {
    Unpaired, // '.'
    Open,     // '('
    Close,    // ')'
}

impl TryFrom<char> for DotBracket {
    type Error = StructureError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            _ => Err(StructureError::InvalidCharacter(c, 0)),
        }
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
        }
    }
}

/// A secondary structure in its canonical textual form.
///
/// Parsing only checks the alphabet; balance is checked when converting
/// to a [`PairTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl Deref for DotBracketVec {
    type Target = [DotBracket];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut vec = Vec::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            let db = DotBracket::try_from(c)
                .map_err(|_| StructureError::InvalidCharacter(c, i))?;
            vec.push(db);
        }
        Ok(DotBracketVec(vec))
    }
}

impl From<&PairTable> for DotBracketVec {
    fn from(pt: &PairTable) -> Self {
        let mut vec = Vec::with_capacity(pt.len());
        for (i, &partner) in pt.iter().enumerate() {
            vec.push(match partner {
                None => DotBracket::Unpaired,
                Some(j) if j > i => DotBracket::Open,
                Some(_) => DotBracket::Close,
            });
        }
        DotBracketVec(vec)
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for db in &self.0 {
            write!(f, "{}", char::from(*db))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_bracket_char_round_trip() {
        for c in ['.', '(', ')'] {
            assert_eq!(char::from(DotBracket::try_from(c).unwrap()), c);
        }
    }

    #[test]
    fn test_dot_bracket_rejects_invalid_char() {
        assert!(DotBracket::try_from('x').is_err());
        assert!(DotBracket::try_from('[').is_err());
    }

    #[test]
    fn test_dot_bracket_vec_from_str() {
        let dbv = DotBracketVec::try_from("(.).").unwrap();
        assert_eq!(dbv.len(), 4);
        assert_eq!(dbv[0], DotBracket::Open);
        assert_eq!(dbv[3], DotBracket::Unpaired);
        assert_eq!(format!("{}", dbv), "(.).");
    }

    #[test]
    fn test_dot_bracket_vec_reports_position() {
        let err = DotBracketVec::try_from("(.x)").unwrap_err();
        assert_eq!(err, StructureError::InvalidCharacter('x', 2));
    }

    #[test]
    fn test_dot_bracket_vec_from_pair_table() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(format!("{}", DotBracketVec::from(&pt)), "((..))");
    }
}
