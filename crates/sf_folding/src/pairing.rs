use std::fmt;
use std::str::FromStr;

use crate::error::FoldingError;
use crate::nucleotides::{Base, NucleotideVec};

/// The set of admitted base pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingRules {
    /// Watson-Crick plus the GU/UG wobble pairs.
    #[default]
    Nussinov,
    /// Watson-Crick only.
    Watson,
}

impl PairingRules {
    pub fn admits(&self, a: Base, b: Base) -> bool {
        use Base::*;
        match (a, b) {
            (A, U) | (U, A) | (G, C) | (C, G) => true,
            (G, U) | (U, G) => matches!(self, PairingRules::Nussinov),
            _ => false,
        }
    }
}

impl FromStr for PairingRules {
    type Err = FoldingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Nussinov" => Ok(PairingRules::Nussinov),
            "Watson" => Ok(PairingRules::Watson),
            _ => Err(FoldingError::UnknownPairingRules(s.to_string())),
        }
    }
}

impl fmt::Display for PairingRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingRules::Nussinov => write!(f, "Nussinov"),
            PairingRules::Watson => write!(f, "Watson"),
        }
    }
}

/// The internal energy model. Only the unitary model exists for now; the
/// enum is the hook for weighted variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyModel {
    #[default]
    Unitary,
}

impl EnergyModel {
    /// Energy contribution of the pair `(a, b)`: -1 when admitted, 0
    /// otherwise.
    pub fn pair_energy(&self, rules: PairingRules, a: Base, b: Base) -> i32 {
        match self {
            EnergyModel::Unitary => {
                if rules.admits(a, b) { -1 } else { 0 }
            }
        }
    }
}

impl FromStr for EnergyModel {
    type Err = FoldingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unitary" => Ok(EnergyModel::Unitary),
            _ => Err(FoldingError::UnknownEnergyModel(s.to_string())),
        }
    }
}

impl fmt::Display for EnergyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyModel::Unitary => write!(f, "Unitary"),
        }
    }
}

/// A sequence and a structure may only be combined when their lengths agree.
pub fn validate_lengths(seq: &NucleotideVec, structure_len: usize) -> Result<(), FoldingError> {
    if seq.len() != structure_len {
        return Err(FoldingError::LengthMismatch {
            sequence: seq.len(),
            structure: structure_len,
        });
    }
    Ok(())
}
