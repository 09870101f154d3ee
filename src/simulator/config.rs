//! Simulation configuration.

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated walkers
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Total steps each walker takes
    pub steps_per_run: u64,

    /// Steps between pedometer updates
    pub steps_per_update: u64,

    /// Whether walkers open their item boxes and equip upgrades
    pub simulate_loot: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            steps_per_run: 100_000,
            steps_per_update: 2_000,
            simulate_loot: true,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// A month of modest walking: 5k steps a day.
    pub fn casual_walker(num_runs: u32) -> Self {
        Self {
            num_runs,
            steps_per_run: 150_000,
            ..Default::default()
        }
    }
}
