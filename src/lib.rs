//! Walkquest - pedometer-driven idle RPG engine.
//!
//! Steps walked become battles, area progress and item boxes. This crate holds
//! the progression engine, the combat simulator and the replay builder; step
//! counting and presentation are provided by the host.

pub mod character;
pub mod combat;
pub mod core;
pub mod hooks;
pub mod items;
pub mod progression;
pub mod replay;
pub mod simulator;
pub mod steps;
pub mod utils;
pub mod zones;

pub use character::{CharacterManager, PlayerStats};
pub use combat::{simulate_battle, BattleOutcome, BattleResult, MonsterSpec};
pub use core::config::EngineConfig;
pub use progression::{BattleLogEntry, ProgressReport, ProgressionEngine};
pub use replay::{create_replay, Replay};
pub use steps::{ManualStepSource, StepSource, StepUpdate};
pub use utils::persistence::{FileStore, KeyValueStore, MemoryStore, StorageError};
