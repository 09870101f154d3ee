//! Areas: names, monster themes and progression through them.
//!
//! Each area has four themed monsters met in order as the walker nears the
//! boss. Beating the boss opens the next area.

mod data;
mod progression;

pub use data::*;
pub use progression::{Advance, AreaState};
