mod error;
mod nucleotides;
mod pairing;
mod unitary;
mod stacking;

pub use error::*;
pub use nucleotides::*;
pub use pairing::*;
pub use unitary::*;
pub use stacking::*;
