use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldingError {
    UnknownPairingRules(String),
    UnknownEnergyModel(String),
    LengthMismatch { sequence: usize, structure: usize },
}

impl fmt::Display for FoldingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldingError::UnknownPairingRules(name) => {
                write!(f, "Unknown pairing rules '{}' (expected Nussinov or Watson)", name)
            }
            FoldingError::UnknownEnergyModel(name) => {
                write!(f, "Unknown energy model '{}' (expected Unitary)", name)
            }
            FoldingError::LengthMismatch { sequence, structure } => {
                write!(
                    f,
                    "Sequence length ({}) and structure length ({}) do not match",
                    sequence, structure
                )
            }
        }
    }
}

impl std::error::Error for FoldingError {}
