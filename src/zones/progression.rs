//! Position within the area sequence.

use serde::{Deserialize, Serialize};

use super::data::area_name;

/// Outcome of advancing through an area by one step threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// `steps_in_area` before the increment, restored if the battle is void.
    pub previous_steps: u64,
    pub is_boss: bool,
}

/// Which area the walker is in and how far they have come in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaState {
    pub current_area: u32,
    pub steps_in_area: u64,
}

impl Default for AreaState {
    fn default() -> Self {
        Self::new()
    }
}

impl AreaState {
    pub fn new() -> Self {
        Self {
            current_area: 1,
            steps_in_area: 0,
        }
    }

    pub fn area_name(&self) -> String {
        area_name(self.current_area)
    }

    /// Adds `step_threshold` steps. The battle is a boss battle only on the
    /// increment that crosses `boss_threshold`.
    pub fn advance(&mut self, step_threshold: u64, boss_threshold: u64) -> Advance {
        let previous_steps = self.steps_in_area;
        self.steps_in_area += step_threshold;
        Advance {
            previous_steps,
            is_boss: self.steps_in_area >= boss_threshold && previous_steps < boss_threshold,
        }
    }

    /// Boss defeated: on to the next area.
    pub fn clear_area(&mut self) {
        self.current_area += 1;
        self.steps_in_area = 0;
    }

    /// Lost a battle: the area is kept, progress within it is not.
    pub fn lose_progress(&mut self) {
        self.steps_in_area = 0;
    }

    /// The battle never resolved: undo the increment.
    pub fn void(&mut self, advance: Advance) {
        self.steps_in_area = advance.previous_steps;
    }
}
