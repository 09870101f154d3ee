//! Balance constants and engine configuration.

pub mod config;
pub mod constants;

pub use config::EngineConfig;
pub use constants::*;
