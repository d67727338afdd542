//! Domain models for the medtrack system.

mod intake;
mod medication;
mod patient;
mod posology;

pub use intake::*;
pub use medication::*;
pub use patient::*;
pub use posology::*;
