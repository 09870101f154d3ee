//! Runs simulated walkers through the real progression engine.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::character::CharacterManager;
use crate::items::Item;
use crate::progression::{ProgressReport, ProgressionEngine};
use crate::steps::ManualStepSource;
use crate::utils::persistence::{KeyValueStore, MemoryStore};

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => StdRng::from_entropy(),
        };

        let stats = simulate_single_run(config, rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Area {}, Level {}, Battles {}, Wins {}, Losses {}, Bosses {}, Boxes {}",
                run_idx + 1,
                config.num_runs,
                stats.final_area,
                stats.final_level,
                stats.battles,
                stats.victories,
                stats.defeats,
                stats.bosses_defeated,
                stats.item_boxes
            );
        }
        all_runs.push(stats);
    }

    SimReport::from_runs(all_runs)
}

/// One walker, from a fresh character to `steps_per_run` steps.
pub fn simulate_single_run(config: &SimConfig, rng: StdRng) -> RunStats {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let steps = Arc::new(ManualStepSource::new());
    let characters = Arc::new(CharacterManager::without_hooks(store.clone()));
    let engine = ProgressionEngine::with_rng(store, steps.clone(), rng)
        .with_character_manager(characters.clone());

    let mut stats = RunStats::default();
    engine.start_session();

    let chunk = config.steps_per_update.max(1);
    let mut walked = 0;
    while walked < config.steps_per_run {
        let step = chunk.min(config.steps_per_run - walked);
        walked += step;

        if let Some(report) = engine.on_step_update(steps.walk(step)) {
            stats.record(&report);
        }

        if config.simulate_loot {
            while let Some(item) = engine.open_item_box() {
                if equip_if_upgrade(&characters, &item) {
                    stats.items_equipped += 1;
                }
            }
        }
    }
    engine.end_session();

    let character = characters.character();
    stats.final_area = engine.current_area();
    stats.final_level = character.level;
    stats.steps = walked;
    stats
}

/// Equips `item` if its slot is empty or it beats the equipped item's primary stat.
fn equip_if_upgrade(characters: &CharacterManager, item: &Item) -> bool {
    let primary = item.category.stat_pool()[0];
    let better = match characters.equipment().get(item.category) {
        Some(current) => item.stat(primary) > current.stat(primary),
        None => true,
    };
    better && characters.equip(&item.id).is_ok()
}

impl RunStats {
    fn record(&mut self, report: &ProgressReport) {
        self.battles += report.battles as u64;
        self.victories += report.victories as u64;
        self.defeats += report.defeats as u64;
        self.inconclusive += report.inconclusive as u64;
        self.bosses_defeated += report.bosses_defeated as u64;
        self.item_boxes += report.item_boxes_found as u64;
        self.experience += report.experience_gained;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            num_runs: 3,
            seed: Some(42),
            steps_per_run: 20_000,
            steps_per_update: 1_500,
            simulate_loot: true,
            verbosity: 0,
        }
    }

    #[test]
    fn test_single_run_accounts_for_every_battle() {
        let config = small_config();
        let stats = simulate_single_run(&config, StdRng::seed_from_u64(7));
        assert_eq!(stats.steps, 20_000);
        assert_eq!(stats.battles, stats.victories + stats.defeats + stats.inconclusive);
        // thirteen updates of 1500 steps, then one of 500
        assert_eq!(stats.battles, 40);
        assert!(stats.final_area >= 1);
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let a = run_simulation(&small_config());
        let b = run_simulation(&small_config());
        assert_eq!(a.run_stats, b.run_stats);
        assert_eq!(a.num_runs, 3);
    }
}
