use std::fmt;
use std::ops::Deref;
use std::convert::TryFrom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    InvalidChar(char),
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::InvalidChar(c) => {
                write!(f, "Unsupported nucleotide '{}'", c)
            }
        }
    }
}

impl std::error::Error for SequenceError {}

/// A single RNA residue. The alphabet is strict uppercase {A, C, G, U};
/// nothing else parses.
#[derive(Clone, Copy, Hash, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Base { A, C, G, U }

impl TryFrom<char> for Base {
    type Error = SequenceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'U' => Ok(Base::U),
            _ => Err(SequenceError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
        };
        write!(f, "{}", c)
    }
}

/// An immutable nucleotide sequence.
#[derive(Clone, Hash, Debug, Eq, PartialEq)]
pub struct NucleotideVec(pub Vec<Base>);

impl Deref for NucleotideVec {
    type Target = [Base];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&str> for NucleotideVec {
    type Error = SequenceError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut vec = Vec::with_capacity(s.len());
        for c in s.chars() {
            vec.push(Base::try_from(c)?);
        }
        Ok(NucleotideVec(vec))
    }
}

impl fmt::Display for NucleotideVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in &self.0 {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_round_trip() {
        for c in ['A', 'C', 'G', 'U'] {
            assert_eq!(Base::try_from(c).unwrap().to_string(), c.to_string());
        }
    }

    #[test]
    fn test_strict_alphabet() {
        assert_eq!(Base::try_from('T'), Err(SequenceError::InvalidChar('T')));
        assert_eq!(Base::try_from('a'), Err(SequenceError::InvalidChar('a')));
        assert_eq!(Base::try_from('N'), Err(SequenceError::InvalidChar('N')));
    }

    #[test]
    fn test_nucleotide_vec_from_str() {
        let seq = NucleotideVec::try_from("GACU").unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq[0], Base::G);
        assert_eq!(seq.to_string(), "GACU");
    }
}
