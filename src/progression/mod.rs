//! Step-driven progression: battles, areas, item boxes and history.

pub mod engine;
pub mod types;

pub use engine::*;
pub use types::*;
