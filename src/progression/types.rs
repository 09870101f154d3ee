use serde::{Deserialize, Serialize};

use crate::combat::{BattleOutcome, BattleResult, HealthVariation, LogKind, LogLine, MonsterSpec};
use crate::zones::area_name;

/// A monster as recorded in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterRecord {
    pub id: String,
    pub level: u32,
    #[serde(default)]
    pub suffix: HealthVariation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<u32>,
}

/// One history entry: a battle, or an item box found on the way.
///
/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleLogEntry {
    pub area: u32,
    pub area_name: String,
    /// `steps_in_area` when the entry was triggered.
    pub step_count: u64,
    pub success: bool,
    /// Absent on entries written before outcomes were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BattleOutcome>,
    #[serde(default)]
    pub monsters: Vec<MonsterRecord>,
    pub logs: Vec<LogLine>,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub is_item_box: bool,
    /// Unix seconds.
    #[serde(default)]
    pub recorded_at: i64,
}

impl BattleLogEntry {
    pub fn from_battle(
        area: u32,
        step_count: u64,
        specs: &[MonsterSpec],
        result: BattleResult,
        is_boss: bool,
        recorded_at: i64,
    ) -> Self {
        let monsters = specs
            .iter()
            .map(|spec| MonsterRecord {
                id: spec.id.clone(),
                level: spec.level,
                suffix: result.suffix_of(&spec.id),
                max_hp: result.max_hp_of(&spec.id),
            })
            .collect();

        Self {
            area,
            area_name: area_name(area),
            step_count,
            success: result.success,
            outcome: Some(result.outcome),
            monsters,
            logs: result.logs,
            is_boss,
            is_item_box: false,
            recorded_at,
        }
    }

    pub fn item_box(area: u32, step_count: u64, recorded_at: i64) -> Self {
        Self {
            area,
            area_name: area_name(area),
            step_count,
            success: true,
            outcome: Some(BattleOutcome::Victory),
            monsters: Vec::new(),
            logs: vec![LogLine::system(
                LogKind::ItemBox,
                0.0,
                0.0,
                0.0,
                "You found an item box!",
            )],
            is_boss: false,
            is_item_box: true,
            recorded_at,
        }
    }

    /// The recorded outcome, or one inferred from `success` for old entries.
    pub fn outcome(&self) -> BattleOutcome {
        match self.outcome {
            Some(outcome) => outcome,
            None if self.success => BattleOutcome::Victory,
            None => BattleOutcome::Defeat,
        }
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        if self.is_item_box {
            return format!("{}: found an item box", self.area_name);
        }
        let foes: Vec<String> = self
            .monsters
            .iter()
            .map(|m| format!("{} (Lv {})", m.id, m.level))
            .collect();
        let result = match self.outcome() {
            BattleOutcome::Victory => "won",
            BattleOutcome::Defeat => "lost",
            BattleOutcome::Inconclusive => "drew",
        };
        format!(
            "{}{}: {} against {}",
            self.area_name,
            if self.is_boss { " [BOSS]" } else { "" },
            result,
            foes.join(", ")
        )
    }
}

/// Bounded history, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<BattleLogEntry>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `entry` at the front, dropping the oldest entries beyond `cap`.
    pub fn record(&mut self, entry: BattleLogEntry, cap: usize) {
        self.0.insert(0, entry);
        self.0.truncate(cap);
    }

    /// Drops the oldest entries beyond `cap`.
    pub fn truncate(&mut self, cap: usize) {
        self.0.truncate(cap);
    }

    pub fn entries(&self) -> &[BattleLogEntry] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<&BattleLogEntry> {
        self.0.get(idx)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// What one `process_steps` pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressReport {
    /// Steps handed to the pass
    pub steps: u64,
    pub battles: u32,
    pub victories: u32,
    pub defeats: u32,
    pub inconclusive: u32,
    pub bosses_defeated: u32,
    pub item_boxes_found: u32,
    pub experience_gained: u64,
    /// Area after the pass
    pub area: u32,
}

/// Sent to subscribers after each state change.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub current_area: u32,
    pub steps_in_area: u64,
    /// Full history, most recent first.
    pub history: Vec<BattleLogEntry>,
    pub pending_item_boxes: usize,
}
