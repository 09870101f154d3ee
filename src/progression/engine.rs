//! The step-driven progression state machine.
//!
//! Every [`STEP_THRESHOLD`](crate::core::constants::STEP_THRESHOLD) steps of a
//! delta buys one battle in the current area. Crossing the boss threshold
//! summons the area boss instead; beating it opens the next area. Losing a
//! battle costs the progress made within the area, never the area itself.
//! Along the way, every hundred steps may turn up an item box.
//!
//! All state lives behind one mutex, so passes never interleave.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::types::{BattleLogEntry, History, ProgressReport, ProgressUpdate};
use crate::character::CharacterManager;
use crate::combat::{simulate_battle, BattleOutcome, MonsterSpec};
use crate::core::config::EngineConfig;
use crate::core::constants::{BASE_EXP_REWARD, EXP_PER_MONSTER_LEVEL};
use crate::hooks::{NoHooks, QuestHooks};
use crate::items::{Item, ItemBox, ItemGenerator, LootTable};
use crate::steps::{StepSource, StepUpdate};
use crate::utils::persistence::{load_json, load_json_or_default, save_json_logged, KeyValueStore};
use crate::zones::{area_name, boss_monster, normal_monster, AreaState};

pub const LOGS_KEY: &str = "walk_battle_logs";
pub const AREA_KEY: &str = "walk_current_area";
pub const STEPS_IN_AREA_KEY: &str = "walk_steps_in_area";
pub const LAST_STEPS_KEY: &str = "walk_last_steps";
pub const BOXES_KEY: &str = "walk_reward_boxes";

/// Handle returned by [`ProgressionEngine::subscribe`].
pub type SubscriptionId = u64;

/// Experience for defeating a monster of `level`.
pub fn battle_experience(level: u32) -> u64 {
    (level.max(1) as u64 - 1) * EXP_PER_MONSTER_LEVEL + BASE_EXP_REWARD
}

struct EngineState<R> {
    area: AreaState,
    history: History,
    boxes: VecDeque<ItemBox>,
    /// Lifetime step count already turned into progress.
    baseline: u64,
    session_active: bool,
    rng: R,
}

/// Converts walked steps into battles, area progress and item boxes.
pub struct ProgressionEngine<R = StdRng> {
    state: Mutex<EngineState<R>>,
    store: Arc<dyn KeyValueStore>,
    steps: Arc<dyn StepSource>,
    characters: Arc<CharacterManager>,
    items: Arc<dyn ItemGenerator>,
    quests: Arc<dyn QuestHooks>,
    config: EngineConfig,
    listeners: Mutex<Vec<(SubscriptionId, Sender<ProgressUpdate>)>>,
    next_subscription: AtomicU64,
}

impl ProgressionEngine<StdRng> {
    /// Engine with an entropy-seeded RNG, the standard loot table and no
    /// skill or quest hooks.
    pub fn new(store: Arc<dyn KeyValueStore>, steps: Arc<dyn StepSource>) -> Self {
        Self::with_rng(store, steps, StdRng::from_entropy())
    }
}

impl<R: RngCore + Send> ProgressionEngine<R> {
    /// Loads saved progress from `store`.
    ///
    /// The step baseline is the last persisted one, or the current lifetime
    /// count on first run, so steps taken before install never count.
    pub fn with_rng(store: Arc<dyn KeyValueStore>, steps: Arc<dyn StepSource>, rng: R) -> Self {
        let config = EngineConfig::default();
        let kv = store.as_ref();

        let mut history: History = load_json_or_default(kv, LOGS_KEY);
        history.truncate(config.max_log_entries);

        let area = AreaState {
            current_area: load_json::<u32>(kv, AREA_KEY).unwrap_or(1).max(1),
            steps_in_area: load_json::<u64>(kv, STEPS_IN_AREA_KEY).unwrap_or(0),
        };
        let boxes: VecDeque<ItemBox> = load_json_or_default::<Vec<ItemBox>>(kv, BOXES_KEY).into();

        let lifetime = steps.lifetime();
        let baseline = load_json::<u64>(kv, LAST_STEPS_KEY)
            .map(|b| b.min(lifetime))
            .unwrap_or(lifetime);
        save_json_logged(kv, LAST_STEPS_KEY, &baseline);

        tracing::debug!(
            area = area.current_area,
            steps_in_area = area.steps_in_area,
            history = history.len(),
            boxes = boxes.len(),
            baseline,
            "loaded walk progress"
        );

        Self {
            state: Mutex::new(EngineState {
                area,
                history,
                boxes,
                baseline,
                session_active: false,
                rng,
            }),
            characters: Arc::new(CharacterManager::without_hooks(store.clone())),
            store,
            steps,
            items: Arc::new(LootTable),
            quests: Arc::new(NoHooks),
            config,
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_character_manager(mut self, characters: Arc<CharacterManager>) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_item_generator(mut self, items: Arc<dyn ItemGenerator>) -> Self {
        self.items = items;
        self
    }

    pub fn with_quest_hooks(mut self, quests: Arc<dyn QuestHooks>) -> Self {
        self.quests = quests;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn characters(&self) -> &CharacterManager {
        &self.characters
    }

    fn lock(&self) -> MutexGuard<'_, EngineState<R>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Turns `new_steps` into item-box rolls and battles.
    ///
    /// Subscribers are notified once when the pass completes, even if it ran
    /// no battle.
    pub fn process_steps(&self, new_steps: u64) -> ProgressReport {
        let (report, update) = {
            let mut state = self.lock();
            let report = self.run_pass(&mut state, new_steps);
            (report, self.snapshot(&state))
        };
        self.notify(update);
        report
    }

    /// Processes steps walked since the baseline and starts listening to
    /// step updates.
    pub fn start_session(&self) -> Option<ProgressReport> {
        let lifetime = self.steps.lifetime();
        let (report, update) = {
            let mut state = self.lock();
            state.session_active = true;
            let report = self.catch_up(&mut state, lifetime);
            (report, self.snapshot(&state))
        };
        if report.is_some() {
            self.notify(update);
        }
        report
    }

    /// Stops listening to step updates. Steps walked until now are treated as
    /// already counted.
    pub fn end_session(&self) {
        let lifetime = self.steps.lifetime();
        let mut state = self.lock();
        state.session_active = false;
        state.baseline = lifetime;
        save_json_logged(self.store.as_ref(), LAST_STEPS_KEY, &lifetime);
    }

    pub fn session_active(&self) -> bool {
        self.lock().session_active
    }

    /// Handles a step source `update`. Ignored outside a session.
    pub fn on_step_update(&self, update: StepUpdate) -> Option<ProgressReport> {
        let (report, snapshot) = {
            let mut state = self.lock();
            if !state.session_active {
                return None;
            }
            let report = self.catch_up(&mut state, update.lifetime);
            (report, self.snapshot(&state))
        };
        if report.is_some() {
            self.notify(snapshot);
        }
        self.quests.update_progress(update.lifetime);
        report
    }

    /// Processes `lifetime - baseline` if positive, then moves the baseline.
    fn catch_up(&self, state: &mut EngineState<R>, lifetime: u64) -> Option<ProgressReport> {
        let delta = lifetime.saturating_sub(state.baseline);
        let report = (delta > 0).then(|| self.run_pass(state, delta));
        state.baseline = lifetime;
        save_json_logged(self.store.as_ref(), LAST_STEPS_KEY, &lifetime);
        report
    }

    fn run_pass(&self, state: &mut EngineState<R>, new_steps: u64) -> ProgressReport {
        let mut report = ProgressReport {
            steps: new_steps,
            ..Default::default()
        };

        self.roll_item_boxes(state, new_steps, &mut report);

        let threshold = self.config.step_threshold;
        let mut remaining = new_steps;
        while threshold > 0 && remaining >= threshold {
            remaining -= threshold;
            self.run_battle(state, &mut report);
        }

        report.area = state.area.current_area;
        report
    }

    /// One roll per item-box interval of the delta: offsets 0, 100, 200, ...
    fn roll_item_boxes(
        &self,
        state: &mut EngineState<R>,
        new_steps: u64,
        report: &mut ProgressReport,
    ) {
        if self.config.item_box_chance <= 0.0 {
            return;
        }

        let mut found = false;
        for roll in 0..self.config.item_box_rolls(new_steps) {
            if state.rng.gen::<f64>() >= self.config.item_box_chance {
                continue;
            }
            let area = state.area.current_area;
            let offset = roll * self.config.item_box_step_interval;
            state.boxes.push_back(ItemBox { area });
            let step_count = state.area.steps_in_area + offset;
            state.history.record(
                BattleLogEntry::item_box(area, step_count, Utc::now().timestamp()),
                self.config.max_log_entries,
            );
            report.item_boxes_found += 1;
            found = true;
            tracing::info!(area, offset, "found an item box");
        }

        if found {
            self.persist_boxes(state);
            self.persist_history(state);
        }
    }

    fn run_battle(&self, state: &mut EngineState<R>, report: &mut ProgressReport) {
        let advance = state
            .area
            .advance(self.config.step_threshold, self.config.boss_threshold);
        let area = state.area.current_area;
        let steps_in_area = state.area.steps_in_area;

        let monster = if advance.is_boss {
            boss_monster(area)
        } else {
            normal_monster(area, steps_in_area, self.config.boss_threshold)
        };
        let specs = [monster];

        let player = self.characters.player_stats();
        let result = simulate_battle(&player, &specs, &mut state.rng);
        let outcome = result.outcome;

        tracing::debug!(
            area,
            steps_in_area,
            monster = %specs[0].id,
            level = specs[0].level,
            boss = advance.is_boss,
            ?outcome,
            duration = result.duration,
            "battle finished"
        );

        let entry = BattleLogEntry::from_battle(
            area,
            steps_in_area,
            &specs,
            result,
            advance.is_boss,
            Utc::now().timestamp(),
        );
        state.history.record(entry, self.config.max_log_entries);
        report.battles += 1;

        match outcome {
            BattleOutcome::Victory => {
                report.victories += 1;
                let exp = self.award_experience(&specs[0]);
                report.experience_gained += exp;
                if advance.is_boss {
                    state.area.clear_area();
                    report.bosses_defeated += 1;
                    tracing::info!(
                        cleared = %area_name(area),
                        next = %state.area.area_name(),
                        "area boss defeated"
                    );
                }
            }
            BattleOutcome::Defeat => {
                report.defeats += 1;
                state.area.lose_progress();
            }
            BattleOutcome::Inconclusive => {
                report.inconclusive += 1;
                state.area.void(advance);
            }
        }

        self.persist_history(state);
        self.persist_area(state);
    }

    fn award_experience(&self, monster: &MonsterSpec) -> u64 {
        let exp = battle_experience(monster.level);
        self.characters.add_experience(exp);
        exp
    }

    /// Full battle and item-box history, most recent first.
    pub fn history(&self) -> Vec<BattleLogEntry> {
        self.lock().history.entries().to_vec()
    }

    pub fn history_entry(&self, idx: usize) -> Option<BattleLogEntry> {
        self.lock().history.get(idx).cloned()
    }

    pub fn current_area(&self) -> u32 {
        self.lock().area.current_area
    }

    pub fn steps_in_area(&self) -> u64 {
        self.lock().area.steps_in_area
    }

    pub fn current_area_name(&self) -> String {
        self.lock().area.area_name()
    }

    pub fn baseline(&self) -> u64 {
        self.lock().baseline
    }

    pub fn pending_item_boxes(&self) -> usize {
        self.lock().boxes.len()
    }

    pub fn item_boxes(&self) -> Vec<ItemBox> {
        self.lock().boxes.iter().copied().collect()
    }

    /// Opens the oldest unopened box into the inventory. `None` when no box is
    /// waiting.
    pub fn open_item_box(&self) -> Option<Item> {
        let (item, update) = {
            let mut state = self.lock();
            let item_box = state.boxes.pop_front()?;
            self.persist_boxes(&state);

            let item = self
                .items
                .generate_random_item(item_box.item_level(), &mut state.rng);
            tracing::info!(
                area = item_box.area,
                item = %item.name,
                rarity = item.rarity.name(),
                "opened item box"
            );
            self.characters.add_to_inventory(item.clone());
            (item, self.snapshot(&state))
        };
        self.notify(update);
        Some(item)
    }

    /// Forgets all walk progress: history, boxes and area. Steps walked so far
    /// are treated as counted. Calling it twice is the same as once.
    pub fn reset(&self) {
        let lifetime = self.steps.lifetime();
        let update = {
            let mut state = self.lock();
            state.history.clear();
            state.boxes.clear();
            state.area = AreaState::new();
            state.baseline = lifetime;

            let kv = self.store.as_ref();
            for key in [LOGS_KEY, AREA_KEY, STEPS_IN_AREA_KEY, BOXES_KEY] {
                if let Err(e) = kv.remove(key) {
                    tracing::warn!(key, error = %e, "failed to clear stored value");
                }
            }
            save_json_logged(kv, LAST_STEPS_KEY, &lifetime);
            self.snapshot(&state)
        };
        tracing::info!("walk progress reset");
        self.notify(update);
    }

    /// Registers a listener for state updates.
    pub fn subscribe(&self) -> (SubscriptionId, Receiver<ProgressUpdate>) {
        let (tx, rx) = mpsc::channel();
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, tx));
        (id, rx)
    }

    /// Removes a listener. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    fn snapshot(&self, state: &EngineState<R>) -> ProgressUpdate {
        ProgressUpdate {
            current_area: state.area.current_area,
            steps_in_area: state.area.steps_in_area,
            history: state.history.entries().to_vec(),
            pending_item_boxes: state.boxes.len(),
        }
    }

    /// Sends to every listener, dropping those whose receiver is gone.
    fn notify(&self, update: ProgressUpdate) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.retain(|(_, tx)| tx.send(update.clone()).is_ok());
    }

    fn persist_history(&self, state: &EngineState<R>) {
        save_json_logged(self.store.as_ref(), LOGS_KEY, &state.history);
    }

    fn persist_area(&self, state: &EngineState<R>) {
        let kv = self.store.as_ref();
        save_json_logged(kv, AREA_KEY, &state.area.current_area);
        save_json_logged(kv, STEPS_IN_AREA_KEY, &state.area.steps_in_area);
    }

    fn persist_boxes(&self, state: &EngineState<R>) {
        let boxes: Vec<ItemBox> = state.boxes.iter().copied().collect();
        save_json_logged(self.store.as_ref(), BOXES_KEY, &boxes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, StatKind, CHARACTER_KEY};
    use crate::steps::ManualStepSource;
    use crate::utils::persistence::{save_json, MemoryStore};
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::AtomicUsize;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    /// A character who wins every battle in the first few areas.
    fn champion() -> Character {
        let mut c = Character::new("champion".to_string(), 0);
        c.set_base_stat(StatKind::Health, 10_000.0);
        c.set_base_stat(StatKind::Damage, 1_000.0);
        c.set_base_stat(StatKind::AttackSpeed, 10.0);
        c
    }

    /// A character who can neither hurt nor be hurt.
    fn stalemate() -> Character {
        let mut c = Character::new("stalemate".to_string(), 0);
        c.set_base_stat(StatKind::Damage, 0.0);
        c.set_base_stat(StatKind::Armor, 1_000.0);
        c
    }

    /// A character who cannot survive a single hit.
    fn weakling() -> Character {
        let mut c = Character::new("weakling".to_string(), 0);
        c.set_base_stat(StatKind::Health, 0.01);
        c.set_base_stat(StatKind::Damage, 0.0);
        c
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        steps: Arc<ManualStepSource>,
        engine: ProgressionEngine<ChaCha8Rng>,
    }

    fn fixture(character: Character, config: EngineConfig) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        save_json(store.as_ref(), CHARACTER_KEY, &character).unwrap();
        let steps = Arc::new(ManualStepSource::new());
        let engine = ProgressionEngine::with_rng(store.clone(), steps.clone(), create_test_rng())
            .with_config(config);
        Fixture { store, steps, engine }
    }

    #[test]
    fn test_battle_experience() {
        assert_eq!(battle_experience(1), 10);
        assert_eq!(battle_experience(4), 25);
        // Boss of area 1 is level 5: (1×5−1)×5+10
        assert_eq!(battle_experience(5), 30);
    }

    #[test]
    fn test_small_delta_runs_no_battle_but_notifies() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        let (_, rx) = f.engine.subscribe();

        let report = f.engine.process_steps(499);
        assert_eq!(report.battles, 0);
        assert!(f.engine.history().is_empty());
        assert_eq!(f.engine.steps_in_area(), 0);
        let update = rx.try_recv().unwrap();
        assert!(update.history.is_empty());
        assert_eq!(update.history, f.engine.history());
    }

    #[test]
    fn test_update_carries_full_history_most_recent_first() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        let (_, rx) = f.engine.subscribe();

        f.engine.process_steps(1_500);
        let update = rx.try_recv().unwrap();
        assert_eq!(update.history.len(), 3);
        assert_eq!(update.history, f.engine.history());
        assert_eq!(update.history[0].step_count, 1_500);
        assert_eq!(update.steps_in_area, 1_500);
    }

    #[test]
    fn test_battles_consume_whole_thresholds() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        let report = f.engine.process_steps(1_499);
        assert_eq!(report.battles, 2);
        assert_eq!(report.victories, 2);
        assert_eq!(f.engine.steps_in_area(), 1_000);
        assert_eq!(f.engine.history().len(), 2);
        assert_eq!(report.experience_gained, 20);
    }

    #[test]
    fn test_victories_award_experience() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        f.engine.process_steps(500);
        assert_eq!(f.engine.characters().character().experience, 10);
    }

    #[test]
    fn test_boss_crossing_advances_area() {
        let store = Arc::new(MemoryStore::new());
        save_json(store.as_ref(), CHARACTER_KEY, &champion()).unwrap();
        store.set(STEPS_IN_AREA_KEY, "9500").unwrap();
        let steps = Arc::new(ManualStepSource::new());
        let f = Fixture {
            engine: ProgressionEngine::with_rng(store.clone(), steps.clone(), create_test_rng())
                .with_config(EngineConfig::without_item_boxes()),
            store,
            steps,
        };

        let report = f.engine.process_steps(1_500);
        assert_eq!(report.battles, 3);
        assert_eq!(report.bosses_defeated, 1);
        assert_eq!(f.engine.current_area(), 2);
        assert_eq!(f.engine.steps_in_area(), 1_000);

        let history = f.engine.history();
        let oldest = &history[2];
        assert!(oldest.is_boss);
        assert_eq!(oldest.monsters[0].id, "Boss of Crypt of the Damned");
        assert_eq!(oldest.monsters[0].level, 5);
        assert_eq!(history[1].area_name, "Slime Bog");
        assert_eq!(history[1].monsters[0].id, "Slime");
        assert_eq!(history[0].monsters[0].id, "Slime");
    }

    #[test]
    fn test_defeat_resets_area_progress_only() {
        let f = fixture(weakling(), EngineConfig::without_item_boxes());
        let report = f.engine.process_steps(1_000);
        assert_eq!(report.defeats, 2);
        assert_eq!(f.engine.steps_in_area(), 0);
        assert_eq!(f.engine.current_area(), 1);
        assert_eq!(f.engine.characters().character().experience, 0);
        assert!(f.engine.history().iter().all(|e| !e.success));
    }

    #[test]
    fn test_inconclusive_battle_voids_the_increment() {
        let f = fixture(stalemate(), EngineConfig::without_item_boxes());
        f.engine.process_steps(500);
        let entry = f.engine.history_entry(0).unwrap();
        assert_eq!(entry.outcome(), BattleOutcome::Inconclusive);
        assert!(!entry.success);
        assert_eq!(f.engine.steps_in_area(), 0);
        assert_eq!(f.engine.characters().character().experience, 0);
    }

    #[test]
    fn test_history_is_capped() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        f.engine.process_steps(500 * 25);
        assert_eq!(f.engine.history().len(), 20);
    }

    #[test]
    fn test_item_boxes_found_and_opened() {
        let config = EngineConfig {
            item_box_chance: 1.0,
            ..Default::default()
        };
        let f = fixture(champion(), config);

        let report = f.engine.process_steps(250);
        assert_eq!(report.item_boxes_found, 3);
        assert_eq!(f.engine.pending_item_boxes(), 3);
        let history = f.engine.history();
        assert!(history.iter().all(|e| e.is_item_box));
        assert_eq!(history[0].step_count, 200);

        let item = f.engine.open_item_box().unwrap();
        assert_eq!(item.level, 1);
        assert_eq!(f.engine.pending_item_boxes(), 2);
        assert_eq!(f.engine.characters().inventory().len(), 1);
    }

    #[test]
    fn test_open_item_box_when_empty() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        assert!(f.engine.open_item_box().is_none());
    }

    #[test]
    fn test_state_survives_restart() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        f.engine.process_steps(1_000);

        let reloaded =
            ProgressionEngine::with_rng(f.store.clone(), f.steps.clone(), create_test_rng());
        assert_eq!(reloaded.steps_in_area(), 1_000);
        assert_eq!(reloaded.history(), f.engine.history());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        f.engine.process_steps(1_000);
        f.steps.walk(700);

        f.engine.reset();
        f.engine.reset();
        assert!(f.engine.history().is_empty());
        assert_eq!(f.engine.current_area(), 1);
        assert_eq!(f.engine.steps_in_area(), 0);
        assert_eq!(f.engine.baseline(), 700);
        assert!(f.store.get(LOGS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_session_never_double_counts() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        assert!(f.engine.start_session().is_none());

        let update = f.steps.walk(500);
        let report = f.engine.on_step_update(update).unwrap();
        assert_eq!(report.battles, 1);
        assert!(f.engine.on_step_update(update).is_none());

        f.engine.end_session();
        assert_eq!(f.engine.baseline(), 500);

        // Walked while the session was closed: only counted on the next start.
        let background = f.steps.walk(500);
        assert!(f.engine.on_step_update(background).is_none());
        assert_eq!(f.engine.history().len(), 1);

        f.steps.walk(500);
        let report = f.engine.start_session().unwrap();
        assert_eq!(report.steps, 1_000);
        assert_eq!(report.battles, 2);
        assert_eq!(f.engine.history().len(), 3);
        assert_eq!(f.engine.baseline(), 1_500);
    }

    #[test]
    fn test_quest_hook_gets_lifetime() {
        struct LastSeen(AtomicU64);
        impl QuestHooks for LastSeen {
            fn update_progress(&self, lifetime_steps: u64) {
                self.0.store(lifetime_steps, Ordering::SeqCst);
            }
        }

        let quests = Arc::new(LastSeen(AtomicU64::new(0)));
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        let engine = f.engine.with_quest_hooks(quests.clone());
        engine.start_session();
        engine.on_step_update(f.steps.walk(120));
        assert_eq!(quests.0.load(Ordering::SeqCst), 120);
    }

    #[test]
    fn test_unsubscribe_stops_updates() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        let (id, rx) = f.engine.subscribe();
        assert!(f.engine.unsubscribe(id));
        assert!(!f.engine.unsubscribe(id));
        f.engine.process_steps(10);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let f = fixture(champion(), EngineConfig::without_item_boxes());
        let (_, rx) = f.engine.subscribe();
        drop(rx);
        f.engine.process_steps(10);
        assert!(f.engine.listeners.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_item_generator_is_used() {
        struct Counting(AtomicUsize);
        impl ItemGenerator for Counting {
            fn generate_random_item(&self, level: u32, rng: &mut dyn RngCore) -> Item {
                self.0.fetch_add(1, Ordering::SeqCst);
                LootTable.generate_random_item(level, rng)
            }
        }

        let generator = Arc::new(Counting(AtomicUsize::new(0)));
        let f = fixture(
            champion(),
            EngineConfig {
                item_box_chance: 1.0,
                ..Default::default()
            },
        );
        let engine = f.engine.with_item_generator(generator.clone());
        engine.process_steps(100);
        engine.open_item_box();
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);
    }
}
