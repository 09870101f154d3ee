use crate::core::constants::SIMULATION_FRAMERATE;

/// One combatant as drawn in a replay frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantFrame {
    pub name: String,
    pub current_hp: f64,
    pub max_hp: f64,
    pub current_mana: f64,
    pub max_mana: f64,
    /// Fill of the attack bar, 0 right after an attack and 1 when ready.
    pub attack_cooldown: f64,
    pub attack_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    /// Battle seconds.
    pub timestamp: f64,
    pub player: CombatantFrame,
    pub monsters: Vec<CombatantFrame>,
}

impl ReplayFrame {
    pub fn monster_mut(&mut self, name: &str) -> Option<&mut CombatantFrame> {
        self.monsters.iter_mut().find(|m| m.name == name)
    }
}

/// A frame timeline and a cursor into it, advanced by the host's render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub frames: Vec<ReplayFrame>,
    pub current_frame_index: usize,
    pub is_complete: bool,
}

impl Replay {
    pub fn new(frames: Vec<ReplayFrame>) -> Self {
        Self {
            frames,
            current_frame_index: 0,
            is_complete: false,
        }
    }

    pub fn current_frame(&self) -> Option<&ReplayFrame> {
        self.frames.get(self.current_frame_index)
    }

    /// Moves forward by `dt` seconds of playback at 30 frames per second.
    pub fn advance(&mut self, dt: f64) {
        let Some(last) = self.frames.len().checked_sub(1) else {
            self.is_complete = true;
            return;
        };
        let step = (dt.max(0.0) * SIMULATION_FRAMERATE).floor() as usize;
        self.current_frame_index = self.current_frame_index.saturating_add(step).min(last);
        self.is_complete = self.current_frame_index >= last;
    }

    /// Seconds of battle the replay covers.
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|f| f.timestamp).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
