// Step economy
pub const STEP_THRESHOLD: u64 = 500;
pub const BOSS_THRESHOLD: u64 = 10_000;
pub const ITEM_BOX_STEP_INTERVAL: u64 = 100;
pub const ITEM_BOX_CHANCE: f64 = 0.05;

// History
pub const MAX_LOG_ENTRIES: usize = 20;

// Combat simulation
pub const SIMULATION_FRAMERATE: f64 = 30.0;
pub const TICK_SECONDS: f64 = 1.0 / SIMULATION_FRAMERATE;
pub const MAX_BATTLE_ITERATIONS: u32 = 1000;

// Monster scaling
pub const MONSTER_BASE_HEALTH: f64 = 10.0;
pub const MONSTER_HEALTH_PER_LEVEL: f64 = 3.0;
pub const MONSTER_HEALTH_VARIATION: f64 = 0.3;
pub const MONSTER_ATTACK_SPEED: f64 = 1.0;
pub const BOSS_LEVEL_PER_AREA: u32 = 5;

// Experience
pub const BASE_EXP_REWARD: u64 = 10;
pub const EXP_PER_MONSTER_LEVEL: u64 = 5;
pub const EXP_CURVE_BASE: f64 = 100.0;
pub const EXP_CURVE_GROWTH: f64 = 1.5;

// Attribute modifiers
pub const STRENGTH_ATTACK_POWER_BONUS: f64 = 0.05;
pub const DEXTERITY_ATTACK_SPEED_BONUS: f64 = 0.03;
pub const VITALITY_HEALTH_BONUS: f64 = 0.10;
pub const WILLPOWER_MANA_BONUS: f64 = 0.15;
pub const INTELLIGENCE_CAST_CHANCE_BONUS: f64 = 2.0;

// Replay
pub const REPLAY_FRAME_INTERVAL: f64 = 0.1;
pub const REPLAY_TAIL_SECONDS: f64 = 2.0;
pub const REPLAY_PLACEHOLDER_MANA: f64 = 100.0;
pub const REPLAY_DEFAULT_MONSTER_HP: f64 = 8.0;
pub const REPLAY_DEFAULT_PLAYER_HP: f64 = 10.0;

// Character defaults
pub const DEFAULT_CHARACTER_NAME: &str = "Joko";
pub const PLAYER_FALLBACK_NAME: &str = "Player";
pub const SYSTEM_ACTOR: &str = "system";
