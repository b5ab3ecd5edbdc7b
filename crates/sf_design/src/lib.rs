mod error;
mod color;
mod assignments;
mod design;
mod separability;
mod compatible;

pub use error::*;
pub use color::*;
pub use assignments::*;
pub use design::*;
pub use separability::*;
pub use compatible::*;
