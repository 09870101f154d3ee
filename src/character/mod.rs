//! Character model, stat resolution, and persistence.

pub mod manager;
pub mod stats;
pub mod types;

pub use manager::*;
pub use stats::*;
pub use types::*;
