//! Fixed-tick battle simulation.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
