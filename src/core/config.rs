//! Tunable thresholds for the progression engine.

use super::constants::*;

/// Step-economy configuration for a [`ProgressionEngine`](crate::progression::ProgressionEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Steps consumed per regular battle
    pub step_threshold: u64,

    /// Steps-in-area needed to trigger the area boss
    pub boss_threshold: u64,

    /// Maximum number of history entries kept
    pub max_log_entries: usize,

    /// Chance of finding an item box per roll
    pub item_box_chance: f64,

    /// Steps covered by one item-box roll
    pub item_box_step_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_threshold: STEP_THRESHOLD,
            boss_threshold: BOSS_THRESHOLD,
            max_log_entries: MAX_LOG_ENTRIES,
            item_box_chance: ITEM_BOX_CHANCE,
            item_box_step_interval: ITEM_BOX_STEP_INTERVAL,
        }
    }
}

impl EngineConfig {
    /// Config with item boxes disabled, for battle-only runs.
    pub fn without_item_boxes() -> Self {
        Self {
            item_box_chance: 0.0,
            ..Default::default()
        }
    }

    /// Number of item-box rolls covering a delta of `steps`.
    pub fn item_box_rolls(&self, steps: u64) -> u64 {
        if self.item_box_step_interval == 0 {
            return 0;
        }
        steps.div_ceil(self.item_box_step_interval)
    }
}
