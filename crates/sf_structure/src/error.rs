use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    UnmatchedOpen(usize),           // '(' at this position is never closed
    UnmatchedClose(usize),          // ')' at this position has no matching '('
    InvalidCharacter(char, usize),  // anything other than '.', '(' or ')'
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::UnmatchedOpen(i) => {
                write!(f, "Unbalanced structure: '(' at position {} is never closed", i)
            }
            StructureError::UnmatchedClose(i) => {
                write!(f, "Unbalanced structure: ')' at position {} has no matching '('", i)
            }
            StructureError::InvalidCharacter(c, i) => {
                write!(f, "Invalid structure character '{}' at position {}", c, i)
            }
        }
    }
}

impl std::error::Error for StructureError {}
