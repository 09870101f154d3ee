//! Walk simulator for Monte Carlo balance analysis.
//!
//! Each run drives a real [`ProgressionEngine`](crate::progression::ProgressionEngine)
//! over an in-memory store, feeding it steps in chunks the way a pedometer
//! would, and reports:
//! - Win, loss and stalemate rates
//! - Areas reached and bosses beaten
//! - Item boxes found and gear equipped

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
