//! Hooks into the skill and quest subsystems.
//!
//! Both subsystems live outside this crate; the engine only reports events.

/// Receives a point whenever the character levels up.
pub trait SkillHooks: Send + Sync {
    fn award_skill_point(&self);
}

/// Receives the cumulative lifetime step count after each step update.
pub trait QuestHooks: Send + Sync {
    fn update_progress(&self, lifetime_steps: u64);
}

/// Hooks that ignore every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl SkillHooks for NoHooks {
    fn award_skill_point(&self) {}
}

impl QuestHooks for NoHooks {
    fn update_progress(&self, _lifetime_steps: u64) {}
}
