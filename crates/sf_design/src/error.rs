use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    LengthMismatch { sequence: usize, structure: usize },
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignError::LengthMismatch { sequence, structure } => {
                write!(
                    f,
                    "Sequence length ({}) and structure length ({}) do not match",
                    sequence, structure
                )
            }
        }
    }
}

impl std::error::Error for DesignError {}
