//! Progression engine integration tests
//!
//! Drives the engine through whole walks and checks the step economy:
//! battle counts, boss crossings, loss resets and the bounded history.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use walkquest::character::{Character, StatKind, CHARACTER_KEY};
use walkquest::progression::STEPS_IN_AREA_KEY;
use walkquest::utils::persistence::save_json;
use walkquest::{
    BattleOutcome, EngineConfig, KeyValueStore, ManualStepSource, MemoryStore, ProgressionEngine,
};

fn create_test_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Wins every battle in the early areas.
fn champion() -> Character {
    let mut c = Character::new("champion".to_string(), 0);
    c.set_base_stat(StatKind::Health, 10_000.0);
    c.set_base_stat(StatKind::Damage, 1_000.0);
    c.set_base_stat(StatKind::AttackSpeed, 10.0);
    c
}

/// Falls to the first blow.
fn weakling() -> Character {
    let mut c = Character::new("weakling".to_string(), 0);
    c.set_base_stat(StatKind::Health, 0.01);
    c.set_base_stat(StatKind::Damage, 0.0);
    c
}

fn engine_for(
    character: &Character,
    steps_in_area: u64,
    seed: u64,
) -> ProgressionEngine<ChaCha8Rng> {
    let store = Arc::new(MemoryStore::new());
    save_json(store.as_ref(), CHARACTER_KEY, character).unwrap();
    store
        .set(STEPS_IN_AREA_KEY, &steps_in_area.to_string())
        .unwrap();
    ProgressionEngine::with_rng(store, Arc::new(ManualStepSource::new()), create_test_rng(seed))
        .with_config(EngineConfig::without_item_boxes())
}

fn battle_count(engine: &ProgressionEngine<ChaCha8Rng>) -> usize {
    engine.history().iter().filter(|e| !e.is_item_box).count()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_boss_crossing_mid_walk_moves_later_battles_to_next_area() {
    let engine = engine_for(&champion(), 9_500, 1);
    let report = engine.process_steps(1_500);

    assert_eq!(report.battles, 3);
    let history = engine.history();
    // most recent first: the boss is the oldest of the three
    assert!(history[2].is_boss);
    assert_eq!(history[2].area, 1);
    assert_eq!(history[2].outcome(), BattleOutcome::Victory);
    for entry in &history[..2] {
        assert!(!entry.is_boss);
        assert_eq!(entry.area, 2);
        assert_eq!(entry.area_name, "Slime Bog");
    }
    assert_eq!(engine.current_area(), 2);
    assert_eq!(engine.steps_in_area(), 1_000);
}

#[test]
fn test_losing_the_boss_keeps_the_area() {
    let engine = engine_for(&weakling(), 9_500, 2);
    engine.process_steps(500);

    let boss = engine.history_entry(0).unwrap();
    assert!(boss.is_boss);
    assert!(!boss.success);
    assert_eq!(engine.current_area(), 1);
    assert_eq!(engine.steps_in_area(), 0);
}

#[test]
fn test_fresh_walker_meets_zombies_first() {
    let engine = engine_for(&champion(), 0, 5);
    engine.process_steps(500);
    let entry = engine.history_entry(0).unwrap();
    assert_eq!(entry.monsters[0].id, "Zombie");
    assert_eq!(entry.monsters[0].level, 1);
    assert_eq!(entry.area_name, "Crypt of the Damned");
}

#[test]
fn test_monsters_get_tougher_through_the_area() {
    let engine = engine_for(&champion(), 0, 6);
    engine.process_steps(9_500);
    let ids: Vec<String> = engine
        .history()
        .iter()
        .rev()
        .map(|e| e.monsters[0].id.clone())
        .collect();
    assert_eq!(ids.first().map(String::as_str), Some("Zombie"));
    assert_eq!(ids.last().map(String::as_str), Some("Vampire"));
    assert!(ids.iter().any(|id| id == "Skeleton"));
    assert!(ids.iter().any(|id| id == "Ghoul"));
}

#[test]
fn test_champion_levels_up_from_battles() {
    let engine = engine_for(&champion(), 0, 7);
    engine.process_steps(5_000);
    let character = engine.characters().character();
    assert!(character.level > 1);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_passes_never_interleave() {
    let config = EngineConfig {
        max_log_entries: 1_000,
        item_box_chance: 0.5,
        ..Default::default()
    };
    let engine = Arc::new(engine_for(&champion(), 0, 11).with_config(config.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.process_steps(1_500))
        })
        .collect();
    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let battles: u32 = reports.iter().map(|r| r.battles).sum();
    let boxes: u32 = reports.iter().map(|r| r.item_boxes_found).sum();
    assert_eq!(battles, 24);
    assert_eq!(battle_count(&engine), battles as usize);
    assert_eq!(engine.history().len(), (battles + boxes) as usize);

    // 12_000 steps in area 1 cross the boss once
    assert_eq!(engine.current_area(), 2);
    assert_eq!(engine.steps_in_area(), 2_000);
    assert_eq!(engine.steps_in_area() % config.step_threshold, 0);
    assert!(engine.steps_in_area() < config.boss_threshold);

    // every pass ran whole: battle step counts climb by one threshold at a time
    let mut step_counts: Vec<(u32, u64)> = engine
        .history()
        .iter()
        .rev()
        .filter(|e| !e.is_item_box)
        .map(|e| (e.area, e.step_count))
        .collect();
    let boss = step_counts.iter().position(|&(area, _)| area == 2).unwrap();
    assert_eq!(step_counts[boss - 1], (1, 10_000));
    for (i, (_, steps)) in step_counts.drain(boss..).enumerate() {
        assert_eq!(steps, (i as u64 + 1) * 500);
    }
    for (i, &(_, steps)) in step_counts.iter().enumerate() {
        assert_eq!(steps, (i as u64 + 1) * 500);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_small_deltas_never_fight(d in 0u64..500, seed in any::<u64>()) {
        let engine = engine_for(&Character::new("t".to_string(), 0), 0, seed);
        let report = engine.process_steps(d);
        prop_assert_eq!(report.battles, 0);
        prop_assert_eq!(battle_count(&engine), 0);
        prop_assert_eq!(engine.steps_in_area(), 0);
    }

    #[test]
    fn prop_one_battle_per_threshold(d in 500u64..8_000, seed in any::<u64>()) {
        let engine = engine_for(&Character::new("t".to_string(), 0), 0, seed);
        let report = engine.process_steps(d);
        prop_assert_eq!(report.battles as u64, d / 500);
        prop_assert_eq!(
            report.battles,
            report.victories + report.defeats + report.inconclusive
        );
    }

    #[test]
    fn prop_champion_progress_is_whole_thresholds(
        start in 0u64..19,
        d in 0u64..9_000,
        seed in any::<u64>(),
    ) {
        let start = start * 500;
        let engine = engine_for(&champion(), start, seed);
        engine.process_steps(d);

        let walked = start + (d / 500) * 500;
        let expected = if walked >= 10_000 { walked - 10_000 } else { walked };
        prop_assert_eq!(engine.steps_in_area(), expected);
        prop_assert_eq!(engine.steps_in_area() % 500, 0);
    }

    #[test]
    fn prop_boss_fires_once_per_crossing(
        start in 0u64..20,
        d in 0u64..9_500,
        seed in any::<u64>(),
    ) {
        let start = start * 500;
        let engine = engine_for(&champion(), start, seed);
        let report = engine.process_steps(d);

        let crossed = start + (d / 500) * 500 >= 10_000;
        let bosses = engine.history().iter().filter(|e| e.is_boss).count();
        prop_assert_eq!(bosses, usize::from(crossed));
        prop_assert_eq!(report.bosses_defeated, u32::from(crossed));
    }

    #[test]
    fn prop_loss_always_resets_progress(start in 0u64..20, seed in any::<u64>()) {
        let engine = engine_for(&weakling(), start * 500, seed);
        engine.process_steps(500);
        let entry = engine.history_entry(0).unwrap();
        prop_assert!(!entry.success);
        prop_assert_eq!(engine.steps_in_area(), 0);
        prop_assert_eq!(engine.current_area(), 1);
    }

    #[test]
    fn prop_history_is_bounded_fifo(
        walks in prop::collection::vec(0u64..3_000, 1..12),
        seed in any::<u64>(),
    ) {
        let engine = engine_for(&champion(), 0, seed);
        let mut recorded = 0usize;
        for d in &walks {
            recorded += engine.process_steps(*d).battles as usize;
        }

        let history = engine.history();
        prop_assert!(history.len() <= 20);
        prop_assert_eq!(history.len(), recorded.min(20));
        // newest entries sit at the front
        for pair in history.windows(2) {
            let newer = &pair[0];
            let older = &pair[1];
            prop_assert!(
                newer.area > older.area
                    || (newer.area == older.area && newer.step_count > older.step_count)
            );
        }
    }
}
