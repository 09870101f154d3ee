//! Battle replays: frame timelines rebuilt from stored logs.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
